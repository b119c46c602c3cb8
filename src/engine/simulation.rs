use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentTransform, Target, TargetingPolicy};
use crate::config::{ConfigError, SimConfig};
use crate::engine::messages::{
    AgentStateMsg, LetterStateMsg, SceneSnapshotMsg, SimEvent, SlotStateMsg,
};
use crate::text::{WordSlot, WordSwap};

/// The whole plaza simulation: word slots, agents and the tick loop.
///
/// Hosts call `tick` once per rendered frame and then read damage values,
/// agent transforms and events to draw the frame.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    policy: TargetingPolicy,
    slots: Vec<WordSlot>,
    agents: Vec<Agent>,
    rng: Xoshiro256PlusPlus,
    seed: u64,
    events: Vec<SimEvent>,
    flash_remaining: f32,
    overlay_dirty: bool,
    elapsed_seconds: f32,
    tick_count: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected simulation config");
            return Err(e);
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let policy = TargetingPolicy::new(&config)?;

        let slots: Vec<WordSlot> = config
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| WordSlot::new(i, slot))
            .collect();
        let agents: Vec<Agent> = (0..config.agent_count)
            .map(|id| Agent::spawn(id, &config, &mut rng))
            .collect();

        info!(
            seed,
            slots = slots.len(),
            agents = agents.len(),
            "plaza simulation created"
        );

        Ok(Self {
            config,
            policy,
            slots,
            agents,
            rng,
            seed,
            events: Vec::new(),
            flash_remaining: 0.0,
            overlay_dirty: true,
            elapsed_seconds: 0.0,
            tick_count: 0,
        })
    }

    /// Advance the simulation by one frame. Returns how many words swapped.
    pub fn tick(&mut self, delta_seconds: f32) -> usize {
        let dt = self.clamp_delta(delta_seconds);
        self.elapsed_seconds += dt;
        self.tick_count += 1;
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);

        self.update_agents(dt);

        let mut swaps = 0;
        for slot in 0..self.slots.len() {
            if self.slots[slot].is_fully_damaged() {
                self.swap_word(slot);
                swaps += 1;
            }
        }

        let (linger, healing) = (self.config.linger_duration, self.config.healing_rate);
        for slot in &mut self.slots {
            slot.tick(dt, linger, healing);
        }

        self.overlay_dirty = swaps > 0 || self.slots.iter().any(WordSlot::has_damage);
        swaps
    }

    /// Clamp to `[0, max_delta_seconds]`; NaN and infinities count as no time
    pub fn clamp_delta(&self, delta_seconds: f32) -> f32 {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            delta_seconds.min(self.config.max_delta_seconds)
        } else {
            0.0
        }
    }

    fn update_agents(&mut self, dt: f32) {
        for index in 0..self.agents.len() {
            if !self.is_valid_target(self.agents[index].target()) {
                debug!(agent = index, "stale target, reselecting");
                self.reselect(index, false);
            }

            let anchor_x = self.slots[self.agents[index].target_slot].anchor_x();
            let agent = &mut self.agents[index];
            let dx = agent.step_movement(anchor_x, dt, &self.config);

            agent.target_timer += dt;
            if agent.target_timer > self.config.retarget_timeout {
                agent.target_timer = 0.0;
                self.reselect(index, true);
                continue;
            }

            if dx.abs() < self.config.attack_range {
                let target = agent.target();
                let amount = self.config.damage_rate * dt;
                if self.slots[target.slot].apply_damage(target.letter, amount) {
                    self.reselect(index, false);
                }
            }
        }
    }

    fn is_valid_target(&self, target: Target) -> bool {
        self.slots
            .get(target.slot)
            .is_some_and(|slot| target.letter < slot.letter_count())
    }

    fn reselect(&mut self, index: usize, force_new_word: bool) -> Target {
        let target = self.policy.pick(
            index,
            &self.agents,
            &self.slots,
            force_new_word,
            &mut self.rng,
        );
        debug!(
            agent = index,
            slot = target.slot,
            letter = target.letter,
            forced = force_new_word,
            "agent retargeted"
        );
        self.agents[index].retarget(target);
        target
    }

    /// Pick a fresh target for one agent (also resets its retarget clock)
    pub fn pick_new_target(&mut self, agent_id: usize, force_new_word: bool) -> Option<Target> {
        if agent_id >= self.agents.len() {
            return None;
        }
        Some(self.reselect(agent_id, force_new_word))
    }

    /// Replace a slot's word, chase its agents elsewhere and start the flash
    pub fn swap_word(&mut self, slot: usize) -> Option<WordSwap> {
        let swap = self.slots.get_mut(slot)?.swap_word(&mut self.rng);
        info!(
            slot,
            previous = %swap.previous_word,
            new = %swap.new_word,
            "word fully damaged, swapped"
        );

        for index in 0..self.agents.len() {
            if self.agents[index].target_slot == slot {
                self.reselect(index, true);
            }
        }

        self.flash_remaining = self.config.flash_duration;
        self.overlay_dirty = true;
        self.events.push(SimEvent::WordSwapped(swap.clone()));
        Some(swap)
    }

    /// Damage a letter directly, outside the agent loop
    pub fn apply_damage(&mut self, slot: usize, letter: usize, amount: f32) -> bool {
        self.slots
            .get_mut(slot)
            .is_some_and(|s| s.apply_damage(letter, amount))
    }

    pub fn is_word_fully_damaged(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(WordSlot::is_fully_damaged)
    }

    // =====================================================
    // Renderer contract
    // =====================================================

    pub fn letter_damage(&self, slot: usize, letter: usize) -> Option<f32> {
        self.slots.get(slot)?.letter(letter).map(|l| l.damage)
    }

    pub fn active_word_text(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(WordSlot::active_word)
    }

    pub fn agent_transform(&self, agent_id: usize) -> Option<AgentTransform> {
        self.agents.get(agent_id).map(Agent::transform)
    }

    /// Events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_remaining > 0.0
    }

    /// Sky color for this frame: white during a swap flash
    pub fn background_color(&self) -> [u8; 3] {
        if self.is_flashing() {
            [0xFF, 0xFF, 0xFF]
        } else {
            self.config.sky_color
        }
    }

    /// True when the damage overlay should be re-rasterized this frame
    pub fn overlay_dirty(&self) -> bool {
        self.overlay_dirty
    }

    pub fn snapshot(&self) -> SceneSnapshotMsg {
        SceneSnapshotMsg {
            tick: self.tick_count,
            elapsed_seconds: self.elapsed_seconds,
            flashing: self.is_flashing(),
            background: self.background_color(),
            overlay_dirty: self.overlay_dirty,
            slots: self
                .slots
                .iter()
                .map(|slot| SlotStateMsg {
                    slot: slot.index(),
                    active_index: slot.active_index(),
                    word: slot.active_word().to_string(),
                    anchor_x: slot.anchor_x(),
                    letters: slot
                        .active_word()
                        .chars()
                        .zip(slot.letters())
                        .map(|(character, l)| LetterStateMsg {
                            character,
                            damage: l.damage,
                            healing: l.healing,
                            linger_time: l.linger_time,
                            phase: l.phase(),
                        })
                        .collect(),
                })
                .collect(),
            agents: self
                .agents
                .iter()
                .map(|a| AgentStateMsg {
                    id: a.id,
                    position: a.position.to_array(),
                    facing_angle: a.facing.angle(),
                    speed: a.speed,
                    target_slot: a.target_slot,
                    target_letter: a.target_letter,
                })
                .collect(),
        }
    }

    // =====================================================
    // Accessors
    // =====================================================

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn slots(&self) -> &[WordSlot] {
        &self.slots
    }

    pub fn slot(&self, slot: usize) -> Option<&WordSlot> {
        self.slots.get(slot)
    }

    /// Direct letter access for hosts staging a scene
    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut WordSlot> {
        self.slots.get_mut(slot)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, agent_id: usize) -> Option<&Agent> {
        self.agents.get(agent_id)
    }

    /// Direct agent access for hosts staging a scene
    pub fn agent_mut(&mut self, agent_id: usize) -> Option<&mut Agent> {
        self.agents.get_mut(agent_id)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_seconds
    }

    pub fn current_tick(&self) -> u64 {
        self.tick_count
    }
}
