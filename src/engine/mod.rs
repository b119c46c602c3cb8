//! Simulation engine: tick orchestration
//!
//! Owns the word slots and agents and advances them once per frame:
//!   1. agents move, time out, damage and retarget
//!   2. fully damaged words swap (flash + forced retarget)
//!   3. letters linger and heal
//!
//! Hosts drive it through `Simulation::tick` directly, through the Bevy
//! `PlazaSimPlugin`, or over the C ABI in `bridge`.

pub mod messages;
pub mod plugin;
pub mod simulation;

pub use messages::*;
pub use plugin::{PlazaSimPlugin, SimulationResource, WordSwappedEvent};
pub use simulation::Simulation;

// =====================================================
// Tests
// =====================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::text::LetterPhase;

    fn test_sim() -> Simulation {
        Simulation::new(SimConfig::seeded(42)).unwrap()
    }

    fn quiet_sim() -> Simulation {
        Simulation::new(SimConfig {
            agent_count: 0,
            ..SimConfig::seeded(42)
        })
        .unwrap()
    }

    #[test]
    fn test_simulation_creation() {
        let sim = test_sim();
        assert_eq!(sim.slot_count(), 3);
        assert_eq!(sim.agent_count(), 12);
        assert_eq!(sim.seed(), 42);
        assert_eq!(sim.active_word_text(0), Some("BLACK "));
        assert_eq!(sim.active_word_text(1), Some("LIVES"));
        assert_eq!(sim.active_word_text(2), Some(" MATTER"));
        assert_eq!(sim.current_tick(), 0);
    }

    #[test]
    fn test_rejects_degenerate_config() {
        let config = SimConfig {
            slots: vec![],
            ..Default::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_tick_counts() {
        let mut sim = test_sim();
        sim.tick(1.0 / 60.0);
        sim.tick(1.0 / 60.0);
        assert_eq!(sim.current_tick(), 2);
        assert!((sim.elapsed() - 2.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut sim = test_sim();
        sim.tick(3600.0);
        assert!((sim.elapsed() - 0.1).abs() < 1e-6);
        sim.tick(-5.0);
        sim.tick(f32::NAN);
        sim.tick(f32::INFINITY);
        assert!((sim.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let mut a = test_sim();
        let mut b = test_sim();
        for _ in 0..600 {
            a.tick(1.0 / 60.0);
            b.tick(1.0 / 60.0);
        }
        assert_eq!(a.snapshot().to_json(), b.snapshot().to_json());
    }

    #[test]
    fn test_renderer_queries_out_of_range() {
        let sim = test_sim();
        assert_eq!(sim.letter_damage(3, 0), None);
        assert_eq!(sim.letter_damage(0, 6), None);
        assert_eq!(sim.letter_damage(0, 5), Some(0.0));
        assert!(sim.active_word_text(7).is_none());
        assert!(sim.agent_transform(12).is_none());
        assert!(sim.agent_transform(11).is_some());
    }

    #[test]
    fn test_swap_raises_event_and_flash() {
        let mut sim = quiet_sim();
        for letter in 0..5 {
            sim.apply_damage(1, letter, 1.0);
        }
        assert!(sim.is_word_fully_damaged(1));

        assert_eq!(sim.tick(0.016), 1);
        assert!(sim.is_flashing());
        assert_eq!(sim.background_color(), [0xFF, 0xFF, 0xFF]);
        assert_ne!(sim.active_word_text(1), Some("LIVES"));

        let events = sim.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            SimEvent::WordSwapped(swap) => {
                assert_eq!(swap.slot, 1);
                assert_eq!(swap.previous_word, "LIVES");
            }
        }
        assert!(sim.drain_events().is_empty());

        // 200ms of simulated time ends the flash
        for _ in 0..3 {
            sim.tick(0.1);
        }
        assert!(!sim.is_flashing());
        assert_eq!(sim.background_color(), [0xD3, 0xB8, 0xBF]);
    }

    #[test]
    fn test_overlay_dirty_tracks_damage() {
        let mut sim = quiet_sim();
        sim.tick(0.016);
        assert!(!sim.overlay_dirty());

        sim.apply_damage(0, 2, 0.3);
        sim.tick(0.016);
        assert!(sim.overlay_dirty());
    }

    #[test]
    fn test_letters_linger_then_heal_through_tick() {
        let mut sim = quiet_sim();
        sim.apply_damage(2, 3, 1.0);

        for _ in 0..29 {
            sim.tick(0.1);
        }
        let letter = sim.slot(2).unwrap().letter(3).unwrap();
        assert_eq!(letter.phase(), LetterPhase::Lingering);

        for _ in 0..2 {
            sim.tick(0.1);
        }
        let letter = sim.slot(2).unwrap().letter(3).unwrap();
        assert_eq!(letter.phase(), LetterPhase::Healing);

        for _ in 0..30 {
            sim.tick(0.1);
        }
        let letter = sim.slot(2).unwrap().letter(3).unwrap();
        assert_eq!(letter.phase(), LetterPhase::Pristine);
        assert_eq!(letter.linger_time, 0.0);
    }

    #[test]
    fn test_agents_erode_text_over_time() {
        let mut sim = test_sim();
        let mut saw_damage = false;
        for _ in 0..3600 {
            sim.tick(1.0 / 60.0);
            saw_damage |= sim.slots().iter().any(|s| s.has_damage());
            for slot in sim.slots() {
                for letter in slot.letters() {
                    assert!((0.0..=1.0).contains(&letter.damage));
                }
            }
        }
        assert!(saw_damage);
    }

    #[test]
    fn test_snapshot_json() {
        let mut sim = test_sim();
        sim.tick(0.016);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.slots.len(), 3);
        assert_eq!(snapshot.agents.len(), 12);
        assert_eq!(snapshot.slots[0].letters.len(), 6);
        assert_eq!(snapshot.slots[0].letters[0].character, 'B');

        let json = snapshot.to_json();
        assert!(json.contains("\"slots\""));
        let restored = SceneSnapshotMsg::from_json(&json).unwrap();
        assert_eq!(restored.tick, 1);
        assert_eq!(restored.agents.len(), 12);
    }
}
