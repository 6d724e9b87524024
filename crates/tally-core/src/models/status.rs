//! State enumerations for plans and slots.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Completion state of a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanState {
    /// No slot has been decided yet
    #[default]
    Collecting,

    /// Some, but not all, slots have been decided
    PartiallyFinalized,

    /// Every slot has a winner
    Complete,
}

impl FromStr for PlanState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collecting" => Ok(PlanState::Collecting),
            "partially_finalized" | "partial" => Ok(PlanState::PartiallyFinalized),
            "complete" => Ok(PlanState::Complete),
            _ => Err(format!("Invalid plan state: {s}")),
        }
    }
}

impl PlanState {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanState::Collecting => "collecting",
            PlanState::PartiallyFinalized => "partially_finalized",
            PlanState::Complete => "complete",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PlanState::Complete)
    }
}

/// Voting state of a single slot.
///
/// States only move forward: `Open -> Closed -> Finalized`, or straight from
/// `Open` to `Finalized` when every participant has voted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Accepting ballots
    #[default]
    Open,

    /// Deadline passed, awaiting resolution
    Closed,

    /// A winner has been recorded
    Finalized,
}

impl FromStr for SlotState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(SlotState::Open),
            "closed" => Ok(SlotState::Closed),
            "finalized" => Ok(SlotState::Finalized),
            _ => Err(format!("Invalid slot state: {s}")),
        }
    }
}

impl SlotState {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotState::Open => "open",
            SlotState::Closed => "closed",
            SlotState::Finalized => "finalized",
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, SlotState::Finalized)
    }

    /// Whether `next` is a legal forward transition from this state.
    pub fn can_transition_to(&self, next: SlotState) -> bool {
        matches!(
            (self, next),
            (SlotState::Open, SlotState::Closed)
                | (SlotState::Open, SlotState::Finalized)
                | (SlotState::Closed, SlotState::Finalized)
        )
    }

    /// Get state with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tally_core::models::SlotState;
    ///
    /// assert_eq!(SlotState::Finalized.with_icon(), "✓ Finalized");
    /// assert_eq!(SlotState::Closed.with_icon(), "◐ Closed");
    /// assert_eq!(SlotState::Open.with_icon(), "○ Open");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            SlotState::Finalized => "✓ Finalized",
            SlotState::Closed => "◐ Closed",
            SlotState::Open => "○ Open",
        }
    }
}
