//! Plaza Street Scene - Simulation Core Library
//!
//! Headless logic behind the painted-street scene:
//! - Letter damage model (damage, linger, heal, word swap)
//! - Roaming agents with contention-aware weighted targeting
//! - Per-frame tick orchestration with clamped delta time
//! - Renderer contract: damage values, word text, agent transforms, events
//! - Bevy plugin and C-ABI bridge for hosts

pub mod agent;
pub mod bridge;
pub mod config;
pub mod constants;
pub mod engine;
pub mod logging;
pub mod text;

pub use config::{ConfigError, SimConfig, SlotConfig};
pub use engine::{SceneSnapshotMsg, SimEvent, Simulation};
