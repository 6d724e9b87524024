//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use super::collections::Ballots;
use crate::{
    engine::{FinalizeOutcome, SweepReport},
    models::{Ballot, Plan},
};

/// Wrapper for displaying a newly created resource.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper for displaying a recorded ballot submission.
pub struct VoteReceipt {
    pub slot_id: u64,
    pub participant_id: String,
    pub ballots: Vec<Ballot>,
}

impl fmt::Display for VoteReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Recorded {} rankings from {} for slot {}",
            self.ballots.len(),
            self.participant_id,
            self.slot_id
        )?;
        writeln!(f)?;
        write!(f, "{}", Ballots(self.ballots.clone()))
    }
}

/// Wrapper for displaying the outcome of a finalization attempt.
///
/// ```rust
/// use tally_core::{display::FinalizeResult, FinalizeOutcome};
///
/// let result = FinalizeResult {
///     slot_id: 3,
///     outcome: FinalizeOutcome { changed: true, winner: Some(9), tie_broken: false },
/// };
/// assert_eq!(result.to_string(), "Finalized slot 3: option 9 won\n");
/// ```
pub struct FinalizeResult {
    pub slot_id: u64,
    pub outcome: FinalizeOutcome,
}

impl fmt::Display for FinalizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tie = if self.outcome.tie_broken { " after a tie-break" } else { "" };
        match (self.outcome.changed, self.outcome.winner) {
            (true, Some(winner)) => {
                writeln!(f, "Finalized slot {}: option {winner} won{tie}", self.slot_id)
            }
            (false, Some(winner)) => writeln!(
                f,
                "Slot {} was already finalized: option {winner} won{tie}",
                self.slot_id
            ),
            (_, None) => writeln!(f, "Slot {} is not ready to be finalized", self.slot_id),
        }
    }
}

/// Wrapper for displaying a sweep report.
pub struct SweepSummary<'a>(pub &'a SweepReport);

impl fmt::Display for SweepSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "## Sweep")?;
        writeln!(f)?;
        writeln!(f, "- Plans examined: {}", report.plans_examined)?;
        writeln!(f, "- Slots finalized: {}", report.finalized_count())?;
        writeln!(f, "- Plans completed: {}", report.completed_plans.len())?;
        if !report.failed_plans.is_empty() {
            let ids: Vec<String> = report.failed_plans.iter().map(u64::to_string).collect();
            writeln!(f, "- Failed plans: {}", ids.join(", "))?;
        }
        if report.cancelled {
            writeln!(f, "- Stopped early: cancelled")?;
        }
        Ok(())
    }
}
