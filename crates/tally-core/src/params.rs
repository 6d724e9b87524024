//! Parameter structures for engine operations
//!
//! These structures are shared by every interface that drives the engine (the
//! CLI today) and carry no framework-specific derives beyond serde. Interface
//! layers define their own argument types and convert into these:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Plan JSON file │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::collections::HashSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TallyError},
    models::{Day, Occasion, PlanState, SlotKey},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for authoring a new plan with its slots and options.
///
/// # Examples
///
/// ```rust
/// use tally_core::params::CreatePlan;
///
/// let json = r#"{
///     "household_id": "h-1",
///     "voting_deadline": "2030-01-06T18:00:00Z",
///     "participants": ["ana", "ben"],
///     "slots": [
///         { "day": "monday", "occasion": "breakfast",
///           "options": [{ "label": "Pancakes" }, { "label": "Porridge" }] }
///     ]
/// }"#;
/// let params: CreatePlan = serde_json::from_str(json).unwrap();
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Household the plan belongs to (required)
    pub household_id: String,
    /// Optional notes shown to participants
    #[serde(default)]
    pub notes: Option<String>,
    /// Voting deadline shared by every slot without an override
    pub voting_deadline: Timestamp,
    /// Participants expected to vote
    #[serde(default)]
    pub participants: Vec<String>,
    /// Slots to decide; drafts sharing a key are merged
    pub slots: Vec<SlotDraft>,
}

/// A slot as written by the plan author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDraft {
    pub day: Day,
    pub occasion: Occasion,
    /// Optional per-slot deadline override
    #[serde(default)]
    pub voting_deadline: Option<Timestamp>,
    /// Candidates for this slot
    #[serde(default)]
    pub options: Vec<OptionDraft>,
}

impl SlotDraft {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.day, self.occasion)
    }
}

/// A candidate option as written by the plan author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionDraft {
    pub label: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreatePlan {
    /// Validates the draft before anything is written.
    pub fn validate(&self) -> Result<()> {
        if self.household_id.trim().is_empty() {
            return Err(TallyError::invalid_input("household_id")
                .with_reason("Household ID cannot be empty"));
        }

        if self.slots.is_empty() {
            return Err(
                TallyError::invalid_input("slots").with_reason("A plan needs at least one slot")
            );
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if participant.trim().is_empty() {
                return Err(TallyError::invalid_input("participants")
                    .with_reason("Participant IDs cannot be empty"));
            }
            if !seen.insert(participant.as_str()) {
                return Err(TallyError::invalid_input("participants")
                    .with_reason(format!("Participant '{participant}' is listed twice")));
            }
        }

        for draft in &self.slots {
            if draft.options.is_empty() {
                return Err(TallyError::invalid_input("slots").with_reason(format!(
                    "Slot {} / {} has no options",
                    draft.day.as_str(),
                    draft.occasion.as_str()
                )));
            }
            if draft.options.iter().any(|o| o.label.trim().is_empty()) {
                return Err(TallyError::invalid_input("options")
                    .with_reason("Option labels cannot be empty"));
            }
        }

        Ok(())
    }
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    /// Whether to include archived plans
    #[serde(default)]
    pub include_archived: bool,
    /// Only return plans in this state
    #[serde(default)]
    pub state: Option<PlanState>,
}

/// A participant's ranked ballot submission for one slot.
///
/// Ranks are positional: the first option gets rank 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastBallots {
    /// Slot being voted on
    pub slot_id: u64,
    /// Authenticated participant casting the ballot
    pub participant_id: String,
    /// Option IDs from most to least preferred
    pub ranked_option_ids: Vec<u64>,
}

impl CastBallots {
    /// Checks the submission's shape; does not touch storage.
    pub fn validate(&self) -> Result<()> {
        if self.ranked_option_ids.is_empty() {
            return Err(TallyError::NoRankings);
        }

        if self.participant_id.trim().is_empty() {
            return Err(TallyError::invalid_input("participant_id")
                .with_reason("Participant ID cannot be empty"));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.ranked_option_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(TallyError::invalid_input("ranked_option_ids")
                .with_reason(format!("Option {dup} is ranked more than once")));
        }

        Ok(())
    }

    /// `(option_id, rank)` pairs in submission order.
    pub fn rankings(&self) -> Vec<(u64, u32)> {
        self.ranked_option_ids
            .iter()
            .enumerate()
            .map(|(rank, id)| (*id, rank as u32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> CreatePlan {
        CreatePlan {
            household_id: "house".to_string(),
            notes: None,
            voting_deadline: Timestamp::from_second(1_700_000_000).unwrap(),
            participants: vec!["a".to_string(), "b".to_string()],
            slots: vec![SlotDraft {
                day: Day::Monday,
                occasion: Occasion::Dinner,
                voting_deadline: None,
                options: vec![OptionDraft {
                    label: "Tacos".to_string(),
                    notes: None,
                }],
            }],
        }
    }

    #[test]
    fn test_create_plan_validation() {
        assert!(sample_plan().validate().is_ok());

        let mut no_household = sample_plan();
        no_household.household_id = "  ".to_string();
        assert!(matches!(
            no_household.validate(),
            Err(TallyError::InvalidInput { ref field, .. }) if field == "household_id"
        ));

        let mut no_slots = sample_plan();
        no_slots.slots.clear();
        assert!(no_slots.validate().is_err());

        let mut empty_slot = sample_plan();
        empty_slot.slots[0].options.clear();
        assert!(empty_slot.validate().is_err());

        let mut dup_participant = sample_plan();
        dup_participant.participants.push("a".to_string());
        assert!(dup_participant.validate().is_err());
    }

    #[test]
    fn test_cast_ballots_validation() {
        let empty = CastBallots {
            slot_id: 1,
            participant_id: "a".to_string(),
            ranked_option_ids: vec![],
        };
        assert!(matches!(empty.validate(), Err(TallyError::NoRankings)));

        let duplicate = CastBallots {
            slot_id: 1,
            participant_id: "a".to_string(),
            ranked_option_ids: vec![3, 4, 3],
        };
        assert!(matches!(
            duplicate.validate(),
            Err(TallyError::InvalidInput { ref field, .. }) if field == "ranked_option_ids"
        ));
    }

    #[test]
    fn test_rankings_are_positional() {
        let cast = CastBallots {
            slot_id: 1,
            participant_id: "a".to_string(),
            ranked_option_ids: vec![9, 4, 7],
        };
        assert_eq!(cast.rankings(), vec![(9, 0), (4, 1), (7, 2)]);
    }
}
