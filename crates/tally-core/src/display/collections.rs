//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Ballot, Plan};

/// Newtype wrapper listing plans as one summary section each.
///
/// Unlike [`Plan`]'s own `Display`, slots are summarized as a decided count
/// rather than listed.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use tally_core::{display::Plans, models::{Plan, PlanState}};
///
/// let plan = Plan {
///     id: 1,
///     household_id: "smiths".to_string(),
///     notes: None,
///     voting_deadline: Timestamp::UNIX_EPOCH,
///     participants: vec!["ana".to_string()],
///     state: PlanState::Collecting,
///     created_at: Timestamp::UNIX_EPOCH,
///     archived_at: None,
///     slots: vec![],
/// };
///
/// let output = Plans(vec![plan]).to_string();
/// assert!(output.contains("## smiths (ID: 1)"));
/// assert_eq!(Plans(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct Plans(pub Vec<Plan>);

impl Plans {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.0.iter()
    }
}

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }

        for plan in &self.0 {
            let progress = if plan.slots.is_empty() {
                String::new()
            } else {
                format!(" ({}/{})", plan.finalized_slot_count(), plan.slots.len())
            };
            writeln!(f, "## {} (ID: {}){progress}", plan.household_id, plan.id)?;
            writeln!(f)?;
            writeln!(f, "- **State**: {}", plan.state)?;
            writeln!(f, "- **Voting closes**: {}", LocalDateTime(&plan.voting_deadline))?;
            if plan.is_archived() {
                writeln!(f, "- **Archived**")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a participant's or a slot's ballots.
pub struct Ballots(pub Vec<Ballot>);

impl fmt::Display for Ballots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No ballots cast.");
        }

        for ballot in &self.0 {
            write!(f, "{ballot}")?;
        }
        Ok(())
    }
}
