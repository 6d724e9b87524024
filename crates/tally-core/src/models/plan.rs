//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{PlanState, Slot};

/// A household's set of slots decided together under one voting deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Household the plan belongs to
    pub household_id: String,

    /// Free-form notes shown to participants
    pub notes: Option<String>,

    /// Default voting deadline for every slot (UTC)
    pub voting_deadline: Timestamp,

    /// Participants expected to vote on every slot
    #[serde(default)]
    pub participants: Vec<String>,

    /// Completion state of the plan
    #[serde(default)]
    pub state: PlanState,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was archived, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<Timestamp>,

    /// Associated slots (empty unless loaded)
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Plan {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// True when the plan has at least one slot and all of them are decided.
    pub fn all_slots_finalized(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(|s| s.state.is_finalized())
    }

    pub fn finalized_slot_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state.is_finalized())
            .count()
    }
}
