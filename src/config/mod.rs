//! Simulation configuration.
//!
//! `SimConfig` is an immutable parameter set handed to `Simulation::new`.
//! It round-trips through JSON so hosts can ship overrides in a file
//! (see `config/plaza.json`); anything missing falls back to `constants`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::*;

/// Configuration rejected at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no word slots configured")]
    NoSlots,

    #[error("slot {slot} has no candidate words")]
    NoCandidates { slot: usize },

    #[error("slot {slot} has a letter count of zero")]
    ZeroLetters { slot: usize },

    #[error("slot {slot} candidate {word:?} has {actual} letters, expected {expected}")]
    CandidateLength {
        slot: usize,
        word: String,
        expected: usize,
        actual: usize,
    },

    #[error("parameter {name} is invalid: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("speed range is inverted: min {min} > max {max}")]
    InvertedSpeedRange { min: f32, max: f32 },

    #[error("slot weights rejected: {0}")]
    Weights(#[from] rand::distributions::WeightedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One word position in the painted phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Interchangeable words, each exactly `letter_count` characters
    pub candidates: Vec<String>,
    pub letter_count: usize,
    /// World x the agents walk toward for this slot
    pub anchor_x: f32,
}

impl SlotConfig {
    pub fn new(candidates: &[&str], letter_count: usize, anchor_x: f32) -> Self {
        Self {
            candidates: candidates.iter().map(|w| w.to_string()).collect(),
            letter_count,
            anchor_x,
        }
    }
}

/// The three slots of the plaza phrase
pub fn default_slots() -> Vec<SlotConfig> {
    vec![
        SlotConfig::new(&["BLACK ", "WORDS ", "SHIT  "], 6, -150.0),
        SlotConfig::new(&["LIVES", "DONT ", "WILL "], 5, 0.0),
        SlotConfig::new(&[" MATTER", "SHATTER", " HAPPEN"], 7, 150.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub slots: Vec<SlotConfig>,
    pub agent_count: usize,

    pub healing_rate: f32,
    pub damage_rate: f32,
    pub linger_duration: f32,
    pub attack_range: f32,
    pub retarget_timeout: f32,
    pub word_switch_probability: f64,
    pub max_weighted_draws: u32,

    pub speed_min: f32,
    pub speed_max: f32,
    pub spawn_half_width: f32,
    pub spawn_half_depth: f32,

    pub wobble_flip_interval: f32,
    pub wobble_amplitude: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    pub bob_base_height: f32,

    pub flash_duration: f32,
    pub max_delta_seconds: f32,
    pub sky_color: [u8; 3],

    /// Fixed seed for reproducible runs; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            agent_count: AGENT_COUNT,
            healing_rate: HEALING_RATE,
            damage_rate: DAMAGE_RATE,
            linger_duration: LINGER_DURATION,
            attack_range: ATTACK_RANGE,
            retarget_timeout: RETARGET_TIMEOUT,
            word_switch_probability: WORD_SWITCH_PROBABILITY,
            max_weighted_draws: MAX_WEIGHTED_DRAWS,
            speed_min: SPEED_MIN,
            speed_max: SPEED_MAX,
            spawn_half_width: SPAWN_HALF_WIDTH,
            spawn_half_depth: SPAWN_HALF_DEPTH,
            wobble_flip_interval: WOBBLE_FLIP_INTERVAL,
            wobble_amplitude: WOBBLE_AMPLITUDE,
            bob_frequency: BOB_FREQUENCY,
            bob_amplitude: BOB_AMPLITUDE,
            bob_base_height: BOB_BASE_HEIGHT,
            flash_duration: FLASH_DURATION,
            max_delta_seconds: MAX_DELTA_SECONDS,
            sky_color: SKY_COLOR,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Default config with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Letter counts of every slot, in slot order
    pub fn slot_weights(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.letter_count).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }

        for (slot, cfg) in self.slots.iter().enumerate() {
            if cfg.letter_count == 0 {
                return Err(ConfigError::ZeroLetters { slot });
            }
            if cfg.candidates.is_empty() {
                return Err(ConfigError::NoCandidates { slot });
            }
            for word in &cfg.candidates {
                let actual = word.chars().count();
                if actual != cfg.letter_count {
                    return Err(ConfigError::CandidateLength {
                        slot,
                        word: word.clone(),
                        expected: cfg.letter_count,
                        actual,
                    });
                }
            }
            if !cfg.anchor_x.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name: "anchor_x",
                    value: cfg.anchor_x as f64,
                });
            }
        }

        non_negative("healing_rate", self.healing_rate)?;
        non_negative("damage_rate", self.damage_rate)?;
        non_negative("linger_duration", self.linger_duration)?;
        non_negative("attack_range", self.attack_range)?;
        non_negative("retarget_timeout", self.retarget_timeout)?;
        non_negative("speed_min", self.speed_min)?;
        non_negative("speed_max", self.speed_max)?;
        non_negative("spawn_half_width", self.spawn_half_width)?;
        non_negative("spawn_half_depth", self.spawn_half_depth)?;
        non_negative("wobble_flip_interval", self.wobble_flip_interval)?;
        non_negative("wobble_amplitude", self.wobble_amplitude)?;
        non_negative("bob_frequency", self.bob_frequency)?;
        non_negative("bob_amplitude", self.bob_amplitude)?;
        non_negative("flash_duration", self.flash_duration)?;

        if !self.bob_base_height.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "bob_base_height",
                value: self.bob_base_height as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.word_switch_probability) {
            return Err(ConfigError::InvalidParameter {
                name: "word_switch_probability",
                value: self.word_switch_probability,
            });
        }
        if !self.max_delta_seconds.is_finite() || self.max_delta_seconds <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_delta_seconds",
                value: self.max_delta_seconds as f64,
            });
        }
        if self.speed_min > self.speed_max {
            return Err(ConfigError::InvertedSpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value: value as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.slot_weights(), vec![6, 5, 7]);
        assert_eq!(config.agent_count, 12);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_default_anchor_positions() {
        let anchors: Vec<f32> = SimConfig::default()
            .slots
            .iter()
            .map(|s| s.anchor_x)
            .collect();
        assert_eq!(anchors, vec![-150.0, 0.0, 150.0]);
    }

    #[test]
    fn test_rejects_empty_slots() {
        let config = SimConfig {
            slots: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoSlots)));
    }

    #[test]
    fn test_rejects_slot_without_candidates() {
        let mut config = SimConfig::default();
        config.slots[1].candidates.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoCandidates { slot: 1 })
        ));
    }

    #[test]
    fn test_rejects_zero_letters() {
        let mut config = SimConfig::default();
        config.slots[2] = SlotConfig::new(&[""], 0, 150.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLetters { slot: 2 })
        ));
    }

    #[test]
    fn test_rejects_candidate_length_mismatch() {
        let mut config = SimConfig::default();
        config.slots[0].candidates.push("TOOLONGWORD".into());
        match config.validate() {
            Err(ConfigError::CandidateLength {
                slot,
                expected,
                actual,
                ..
            }) => {
                assert_eq!(slot, 0);
                assert_eq!(expected, 6);
                assert_eq!(actual, 11);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let config = SimConfig {
            healing_rate: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "healing_rate",
                ..
            })
        ));

        let config = SimConfig {
            word_switch_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            max_delta_seconds: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            damage_rate: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let config = SimConfig {
            speed_min: 2.0,
            speed_max: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedSpeedRange { .. })
        ));
    }

    #[test]
    fn test_json_partial_override() {
        let config = SimConfig::from_json(r#"{"agent_count": 3, "seed": 7}"#).unwrap();
        assert_eq!(config.agent_count, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.slots.len(), 3);
        assert!((config.healing_rate - HEALING_RATE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let result = SimConfig::from_json(r#"{"slots": []}"#);
        assert!(matches!(result, Err(ConfigError::NoSlots)));

        let result = SimConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SimConfig::seeded(99);
        let restored = SimConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, r#"{{"linger_duration": 1.5}}"#).unwrap();
        let config = SimConfig::load(temp.path()).unwrap();
        assert!((config.linger_duration - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SimConfig::load("does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
