//! Display implementations for domain models.
//!
//! Output is markdown intended for terminal rendering. Plans show their slots,
//! slots show their options with the winner marked.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Ballot, Day, Occasion, Plan, PlanOption, PlanState, Slot, SlotKey, SlotState};

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().replace('_', " "))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.occasion)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan {}: {}", self.id, self.household_id)?;
        writeln!(f)?;

        writeln!(f, "- State: {}", self.state)?;
        writeln!(f, "- Voting closes: {}", LocalDateTime(&self.voting_deadline))?;
        if !self.participants.is_empty() {
            writeln!(f, "- Participants: {}", self.participants.join(", "))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        if let Some(archived) = &self.archived_at {
            writeln!(f, "- Archived: {}", LocalDateTime(archived))?;
        }

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }

        if self.slots.is_empty() {
            writeln!(f, "\nNo slots in this plan.")?;
        } else {
            writeln!(f, "\n## Slots")?;
            writeln!(f)?;
            for slot in &self.slots {
                write!(f, "{slot}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {} ({})", self.id, self.key, self.state.with_icon())?;
        writeln!(f)?;

        if let Some(deadline) = &self.voting_deadline {
            writeln!(f, "- Voting closes: {}", LocalDateTime(deadline))?;
        }
        if let Some(winner) = self.winner {
            let label = self
                .options
                .iter()
                .find(|o| o.id == winner)
                .map_or_else(|| format!("option {winner}"), |o| o.label.clone());
            let tie = if self.tie_broken { " (tie broken)" } else { "" };
            writeln!(f, "- Winner: **{label}**{tie}")?;
        }
        if let Some(at) = &self.finalized_at {
            writeln!(f, "- Finalized: {}", LocalDateTime(at))?;
        }

        if !self.options.is_empty() {
            writeln!(f)?;
            for option in &self.options {
                write!(f, "{option}")?;
            }
        }
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for PlanOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.chosen { "✓ " } else { "" };
        write!(f, "- {marker}{} (option {})", self.label, self.id)?;
        if let Some(notes) = &self.notes {
            write!(f, ": {notes}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Ballot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {} ranked option {} at {}",
            self.participant_id, self.option_id, self.rank
        )
    }
}
