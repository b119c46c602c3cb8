//! Target selection for agents.
//!
//! Agents prefer letters nobody else is working on, occasionally wander to
//! another word, and are pushed to a different word when their current one
//! has nothing left to damage. Slots are chosen with weights proportional to
//! their letter counts so longer words attract more attention.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::Agent;
use crate::config::{ConfigError, SimConfig};
use crate::text::WordSlot;

/// A (slot, letter) pair an agent is working on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub slot: usize,
    pub letter: usize,
}

/// Letters currently claimed by other agents, grouped by slot
#[derive(Debug, Default, Clone)]
pub struct ContentionMap {
    claimed: HashMap<usize, HashSet<usize>>,
}

impl ContentionMap {
    /// Claims of every agent except `exclude`
    pub fn from_agents(agents: &[Agent], exclude: usize) -> Self {
        let mut map = Self::default();
        for agent in agents.iter().filter(|a| a.id != exclude) {
            map.claim(agent.target());
        }
        map
    }

    pub fn claim(&mut self, target: Target) {
        self.claimed
            .entry(target.slot)
            .or_default()
            .insert(target.letter);
    }

    pub fn is_contested(&self, slot: usize, letter: usize) -> bool {
        self.claimed
            .get(&slot)
            .is_some_and(|letters| letters.contains(&letter))
    }
}

/// Weighted, contention-aware target picker
#[derive(Debug, Clone)]
pub struct TargetingPolicy {
    slot_weights: WeightedIndex<usize>,
    slot_count: usize,
    word_switch_probability: f64,
    max_weighted_draws: u32,
}

impl TargetingPolicy {
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let weights = config.slot_weights();
        Ok(Self {
            slot_count: weights.len(),
            slot_weights: WeightedIndex::new(&weights)?,
            word_switch_probability: config.word_switch_probability,
            max_weighted_draws: config.max_weighted_draws,
        })
    }

    /// Draw a slot index proportionally to letter counts
    pub fn weighted_slot<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.slot_weights.sample(rng)
    }

    /// Weighted draw that avoids `current`, resampling a few times before
    /// falling back to a uniform pick among the other slots. A single-slot
    /// phrase keeps its only slot.
    pub fn pick_other_slot<R: Rng + ?Sized>(&self, current: usize, rng: &mut R) -> usize {
        if self.slot_count <= 1 {
            return 0;
        }

        for _ in 0..self.max_weighted_draws {
            let slot = self.weighted_slot(rng);
            if slot != current {
                return slot;
            }
        }

        if current < self.slot_count {
            let pick = rng.gen_range(0..self.slot_count - 1);
            if pick >= current {
                pick + 1
            } else {
                pick
            }
        } else {
            rng.gen_range(0..self.slot_count)
        }
    }

    /// Choose the next target for `agents[index]`.
    ///
    /// The agent's recorded slot and letter are treated as hints only; a slot
    /// index that no longer exists is replaced by a fresh weighted draw.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        index: usize,
        agents: &[Agent],
        slots: &[WordSlot],
        force_new_word: bool,
        rng: &mut R,
    ) -> Target {
        let Some(agent) = agents.get(index) else {
            return Target { slot: 0, letter: 0 };
        };
        let contention = ContentionMap::from_agents(agents, agent.id);
        let current = agent.target_slot;

        let switch_word = force_new_word || rng.gen_bool(self.word_switch_probability);
        if !switch_word {
            let slot = if current < slots.len() {
                current
            } else {
                self.weighted_slot(rng)
            };
            if let Some(letter) = choose_letter(&slots[slot], &contention, rng) {
                return Target { slot, letter };
            }
            debug!(
                agent = agent.id,
                slot, "nothing left to damage, moving to another word"
            );
        }

        let slot = self.pick_other_slot(current, rng);
        let letter = slots
            .get(slot)
            .and_then(|s| choose_letter(s, &contention, rng))
            .unwrap_or(0);
        Target { slot, letter }
    }
}

/// Uncontested damageable letter if any, else any damageable letter
pub fn choose_letter<R: Rng + ?Sized>(
    slot: &WordSlot,
    contention: &ContentionMap,
    rng: &mut R,
) -> Option<usize> {
    let damageable: Vec<usize> = slot.damageable_letters().collect();
    let uncontested: Vec<usize> = damageable
        .iter()
        .copied()
        .filter(|&letter| !contention.is_contested(slot.index(), letter))
        .collect();

    uncontested
        .choose(rng)
        .or_else(|| damageable.choose(rng))
        .copied()
}
