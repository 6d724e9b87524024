//! Slot model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanOption, SlotKey, SlotState};

/// One decision point inside a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    /// Unique identifier for the slot
    pub id: u64,

    /// ID of the parent plan
    pub plan_id: u64,

    /// Day and occasion this slot decides
    #[serde(flatten)]
    pub key: SlotKey,

    /// Deadline override; falls back to the plan's deadline when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_deadline: Option<Timestamp>,

    /// Current voting state
    pub state: SlotState,

    /// Winning option, set once finalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<u64>,

    /// Whether the winner was picked from a score tie
    #[serde(default)]
    pub tie_broken: bool,

    /// Timestamp when the slot was finalized (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<Timestamp>,

    /// Competing options (empty unless loaded)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PlanOption>,
}

impl Slot {
    /// The deadline that governs this slot: its own override, else the plan's.
    pub fn effective_deadline(&self, plan_deadline: Timestamp) -> Timestamp {
        self.voting_deadline.unwrap_or(plan_deadline)
    }

    /// Whether voting time has run out at `now`. The deadline instant itself
    /// counts as elapsed.
    pub fn deadline_elapsed(&self, plan_deadline: Timestamp, now: Timestamp) -> bool {
        now >= self.effective_deadline(plan_deadline)
    }
}
