use serde::{Deserialize, Serialize};

use crate::text::{LetterPhase, WordSwap};

// =====================================================
// Events
// =====================================================

/// Things the renderer reacts to once, rather than polling every frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A fully damaged word was replaced; redraw the overlay and flash the sky
    WordSwapped(WordSwap),
}

// =====================================================
// Per-frame snapshot (owned copy, safe to hand across threads)
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterStateMsg {
    pub character: char,
    pub damage: f32,
    pub healing: bool,
    pub linger_time: f32,
    pub phase: LetterPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStateMsg {
    pub slot: usize,
    pub active_index: usize,
    pub word: String,
    pub anchor_x: f32,
    pub letters: Vec<LetterStateMsg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStateMsg {
    pub id: usize,
    pub position: [f32; 3],
    pub facing_angle: f32,
    pub speed: f32,
    pub target_slot: usize,
    pub target_letter: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshotMsg {
    pub tick: u64,
    pub elapsed_seconds: f32,
    pub flashing: bool,
    pub background: [u8; 3],
    pub overlay_dirty: bool,
    pub slots: Vec<SlotStateMsg>,
    pub agents: Vec<AgentStateMsg>,
}

impl SceneSnapshotMsg {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}
