//! Roaming agents that walk to word anchors and erode letters.
//!
//! Movement is deliberately crude: a constant per-tick step toward the
//! target anchor (it overshoots and jitters around the anchor), a z-axis
//! wobble that flips every couple of seconds, and a bobbing height.

pub mod targeting;

use bevy::math::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::config::SimConfig;

pub use targeting::{ContentionMap, Target, TargetingPolicy};

/// Fixed heading chosen at spawn. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Forward,
    Backward,
    Right,
    Left,
}

impl Facing {
    /// Rotation about the vertical axis, radians
    pub fn angle(self) -> f32 {
        match self {
            Facing::Forward => 0.0,
            Facing::Backward => PI,
            Facing::Right => FRAC_PI_2,
            Facing::Left => -FRAC_PI_2,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => Facing::Forward,
            1 => Facing::Backward,
            2 => Facing::Right,
            _ => Facing::Left,
        }
    }
}

/// What the renderer needs to place an agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTransform {
    pub position: [f32; 3],
    pub facing_angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: usize,
    pub position: Vec3,
    /// World units per tick, fixed at spawn
    pub speed: f32,
    pub target_slot: usize,
    pub target_letter: usize,
    /// Drives bobbing and wobble; only ever increases
    pub phase: f32,
    pub wobble_direction: f32,
    pub wobble_time: f32,
    /// Seconds since the current target was acquired
    pub target_timer: f32,
    pub facing: Facing,
}

impl Agent {
    pub fn spawn<R: Rng + ?Sized>(id: usize, config: &SimConfig, rng: &mut R) -> Self {
        let x = sample(rng, -config.spawn_half_width, config.spawn_half_width);
        let z = sample(rng, -config.spawn_half_depth, config.spawn_half_depth);

        Self {
            id,
            position: Vec3::new(x, config.bob_base_height, z),
            speed: sample(rng, config.speed_min, config.speed_max),
            target_slot: rng.gen_range(0..config.slots.len().max(1)),
            target_letter: 0,
            phase: rng.gen_range(0.0..TAU),
            wobble_direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            wobble_time: 0.0,
            target_timer: 0.0,
            facing: Facing::random(rng),
        }
    }

    /// Step toward `anchor_x` and advance the wobble/bob animation.
    ///
    /// Returns the horizontal distance to the anchor measured before the
    /// step, which is what the damage range check uses.
    pub fn step_movement(&mut self, anchor_x: f32, dt: f32, config: &SimConfig) -> f32 {
        let dx = anchor_x - self.position.x;
        self.position.x += sign(dx) * self.speed;

        self.wobble_time += dt;
        if self.wobble_time > config.wobble_flip_interval {
            self.wobble_direction = -self.wobble_direction;
            self.wobble_time = 0.0;
        }
        self.position.z += self.wobble_direction * config.wobble_amplitude * self.phase.sin();

        self.phase += dt * config.bob_frequency;
        self.position.y = config.bob_base_height + config.bob_amplitude * self.phase.sin();

        dx
    }

    /// Adopt a new target and restart the retarget clock
    pub fn retarget(&mut self, target: Target) {
        self.target_slot = target.slot;
        self.target_letter = target.letter;
        self.target_timer = 0.0;
    }

    pub fn target(&self) -> Target {
        Target {
            slot: self.target_slot,
            letter: self.target_letter,
        }
    }

    pub fn transform(&self) -> AgentTransform {
        AgentTransform {
            position: self.position.to_array(),
            facing_angle: self.facing.angle(),
        }
    }
}

/// Sign of `v`, with 0 for 0 (`f32::signum` returns 1 for +0.0)
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
