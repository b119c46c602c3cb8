//! Default tuning values for the plaza simulation.
//!
//! These are only the defaults `SimConfig` is built from; the simulation
//! itself always reads the values carried by its config.

// =====================================================
// Letter damage
// =====================================================

/// Damage removed per second while a letter heals
pub const HEALING_RATE: f32 = 0.4;

/// Damage added per second while an agent is in range of its letter
pub const DAMAGE_RATE: f32 = 0.8;

/// Seconds a fully damaged letter lingers before healing starts
pub const LINGER_DURATION: f32 = 3.0;

/// Seconds the scene background stays white after a word swap
pub const FLASH_DURATION: f32 = 0.2;

// =====================================================
// Agents
// =====================================================

/// Number of roaming agents
pub const AGENT_COUNT: usize = 12;

/// Horizontal distance to a word anchor within which an agent damages letters
pub const ATTACK_RANGE: f32 = 20.0;

/// Seconds on one target before an agent is forced onto another word
pub const RETARGET_TIMEOUT: f32 = 7.0;

/// Chance that an ordinary reselection also switches word
pub const WORD_SWITCH_PROBABILITY: f64 = 0.3;

/// Weighted slot draws attempted before falling back to a uniform pick
pub const MAX_WEIGHTED_DRAWS: u32 = 8;

/// Agent speed range, world units per tick
pub const SPEED_MIN: f32 = 0.5;
pub const SPEED_MAX: f32 = 1.0;

/// Spawn area half extents around the origin
pub const SPAWN_HALF_WIDTH: f32 = 150.0;
pub const SPAWN_HALF_DEPTH: f32 = 40.0;

/// Seconds between z-wobble direction flips
pub const WOBBLE_FLIP_INTERVAL: f32 = 2.0;

/// Per-tick z displacement scale
pub const WOBBLE_AMPLITUDE: f32 = 0.2;

/// Bobbing animation
pub const BOB_FREQUENCY: f32 = 5.0;
pub const BOB_AMPLITUDE: f32 = 2.0;
pub const BOB_BASE_HEIGHT: f32 = 10.0;

// =====================================================
// Frame pacing
// =====================================================

/// Largest delta a single tick may consume (tab backgrounding, debugger stops)
pub const MAX_DELTA_SECONDS: f32 = 0.1;

// =====================================================
// Scene
// =====================================================

/// Grey-pink sky restored after a flash (sRGB)
pub const SKY_COLOR: [u8; 3] = [0xD3, 0xB8, 0xBF];
