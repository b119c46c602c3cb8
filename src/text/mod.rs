//! Letter damage model.
//!
//! Every painted letter runs a small state machine:
//! Pristine -> Damaging -> Lingering (full, timed) -> Healing -> Pristine.
//! A slot whose letters are all fully damaged swaps to another candidate
//! word and starts over with a fresh letter array.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SlotConfig;

/// Damage state of a single letter cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LetterState {
    /// 0 = pristine, 1 = fully destroyed
    pub damage: f32,
    pub healing: bool,
    /// Seconds spent at full damage before healing
    pub linger_time: f32,
}

/// Where a letter sits in its damage cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterPhase {
    Pristine,
    Damaging,
    Lingering,
    Healing,
}

impl LetterState {
    pub fn phase(&self) -> LetterPhase {
        if self.healing {
            LetterPhase::Healing
        } else if self.damage >= 1.0 {
            LetterPhase::Lingering
        } else if self.damage > 0.0 {
            LetterPhase::Damaging
        } else {
            LetterPhase::Pristine
        }
    }

    /// Agents may only chip at letters that are neither full nor healing
    pub fn is_damageable(&self) -> bool {
        !self.healing && self.damage < 1.0
    }

    pub fn is_full(&self) -> bool {
        self.damage >= 1.0
    }

    /// Add damage, clamped to 1. Returns true when this call completed the letter.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.is_damageable() || !amount.is_finite() || amount <= 0.0 {
            return false;
        }
        self.damage = (self.damage + amount).min(1.0);
        if self.damage >= 1.0 {
            self.damage = 1.0;
            self.linger_time = 0.0;
            true
        } else {
            false
        }
    }

    /// Advance linger and healing by `dt` seconds
    pub fn tick(&mut self, dt: f32, linger_duration: f32, healing_rate: f32) {
        if self.damage >= 1.0 && !self.healing {
            self.linger_time += dt;
            if self.linger_time >= linger_duration {
                self.healing = true;
            }
        }

        if self.healing {
            self.damage -= healing_rate * dt;
            if self.damage <= 0.0 {
                self.damage = 0.0;
                self.healing = false;
                self.linger_time = 0.0;
            }
        }
    }
}

/// Record of a word swap, handed to the renderer as an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSwap {
    pub slot: usize,
    pub previous_index: usize,
    pub new_index: usize,
    pub previous_word: String,
    pub new_word: String,
}

/// One of the fixed word positions in the phrase
#[derive(Debug, Clone, PartialEq)]
pub struct WordSlot {
    index: usize,
    candidates: Vec<String>,
    letter_count: usize,
    anchor_x: f32,
    active_index: usize,
    letters: Vec<LetterState>,
}

impl WordSlot {
    /// Build a slot from an already validated config entry
    pub fn new(index: usize, config: &SlotConfig) -> Self {
        Self {
            index,
            candidates: config.candidates.clone(),
            letter_count: config.letter_count,
            anchor_x: config.anchor_x,
            active_index: 0,
            letters: vec![LetterState::default(); config.letter_count],
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn anchor_x(&self) -> f32 {
        self.anchor_x
    }

    pub fn letter_count(&self) -> usize {
        self.letter_count
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn active_word(&self) -> &str {
        &self.candidates[self.active_index]
    }

    pub fn letters(&self) -> &[LetterState] {
        &self.letters
    }

    pub fn letter(&self, letter: usize) -> Option<&LetterState> {
        self.letters.get(letter)
    }

    pub fn letter_mut(&mut self, letter: usize) -> Option<&mut LetterState> {
        self.letters.get_mut(letter)
    }

    /// Damage one letter. Out-of-range indices and non-damageable letters are no-ops.
    pub fn apply_damage(&mut self, letter: usize, amount: f32) -> bool {
        self.letters
            .get_mut(letter)
            .is_some_and(|state| state.apply_damage(amount))
    }

    pub fn tick(&mut self, dt: f32, linger_duration: f32, healing_rate: f32) {
        for letter in &mut self.letters {
            letter.tick(dt, linger_duration, healing_rate);
        }
    }

    /// True iff every letter sits at full damage, regardless of linger progress
    pub fn is_fully_damaged(&self) -> bool {
        self.letters.iter().all(LetterState::is_full)
    }

    pub fn has_damage(&self) -> bool {
        self.letters.iter().any(|l| l.damage > 0.0)
    }

    /// Indices of letters an agent can still damage
    pub fn damageable_letters(&self) -> impl Iterator<Item = usize> + '_ {
        self.letters
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_damageable())
            .map(|(i, _)| i)
    }

    /// Switch to a different candidate and reset every letter
    pub fn swap_word<R: Rng + ?Sized>(&mut self, rng: &mut R) -> WordSwap {
        let previous_index = self.active_index;
        let new_index = if self.candidates.len() > 1 {
            // Draw from the other candidates only
            let pick = rng.gen_range(0..self.candidates.len() - 1);
            if pick >= previous_index {
                pick + 1
            } else {
                pick
            }
        } else {
            0
        };

        self.active_index = new_index;
        self.letters = vec![LetterState::default(); self.letter_count];

        WordSwap {
            slot: self.index,
            previous_index,
            new_index,
            previous_word: self.candidates[previous_index].clone(),
            new_word: self.candidates[new_index].clone(),
        }
    }
}
