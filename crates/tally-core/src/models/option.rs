//! Candidate option model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SlotKey;

/// One candidate proposed for a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanOption {
    /// Unique identifier for the option
    pub id: u64,

    /// ID of the plan the option was proposed in
    pub plan_id: u64,

    /// Key of the slot this option competes in
    #[serde(flatten)]
    pub key: SlotKey,

    /// Short name of the candidate (e.g. a recipe title)
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Set on the winning option when its slot is finalized
    #[serde(default)]
    pub chosen: bool,

    /// Timestamp when the option was proposed (UTC); earlier wins ties
    pub created_at: Timestamp,
}
