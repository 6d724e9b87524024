//! Command-line arguments.
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types, which stay free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Engine
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tally_core::{
    params::{CastBallots, Id, ListPlans},
    FinalizePolicy, PlanState,
};

/// Ranked-choice voting for household plans
///
/// A plan holds slots (a day and an occasion such as Monday dinner). Each
/// participant ranks the options of a slot; the lowest total rank wins once
/// everyone has voted or the deadline passes.
#[derive(Parser)]
#[command(version, about, name = "tally")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/tally/tally.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Inspect slots
    #[command(alias = "s")]
    Slot {
        #[command(subcommand)]
        command: SlotCommands,
    },
    /// Cast a ranked ballot for a slot
    #[command(alias = "v")]
    Vote(VoteArgs),
    /// Finalize a slot now if its policy allows
    #[command(alias = "f")]
    Finalize(FinalizeArgs),
    /// Finalize plans whose voting deadline has passed
    Sweep(SweepArgs),
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan from a JSON file
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan with its slots and options
    #[command(alias = "s")]
    Show(IdArgs),
    /// Archive a plan
    #[command(alias = "a")]
    Archive(IdArgs),
}

#[derive(Subcommand)]
pub enum SlotCommands {
    /// Show a slot with its options and ballots
    #[command(alias = "s")]
    Show(IdArgs),
}

/// Create a plan
#[derive(ClapArgs)]
pub struct CreatePlanArgs {
    /// JSON file describing the plan, or `-` for stdin
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(ClapArgs)]
pub struct ListPlansArgs {
    /// Include archived plans
    #[arg(long)]
    pub archived: bool,
    /// Only list plans in this state
    #[arg(long, value_enum)]
    pub state: Option<PlanStateArg>,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            include_archived: val.archived,
            state: val.state.map(Into::into),
        }
    }
}

#[derive(ClapArgs)]
pub struct IdArgs {
    /// Unique identifier
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Cast a ranked ballot
///
/// Options are listed from most to least preferred. Voting again replaces
/// the participant's earlier ballot for the slot.
#[derive(ClapArgs)]
pub struct VoteArgs {
    /// Slot to vote on
    pub slot_id: u64,
    /// Participant casting the ballot
    pub participant: String,
    /// Option IDs, most preferred first
    #[arg(required = true, num_args = 1..)]
    pub options: Vec<u64>,
}

impl From<VoteArgs> for CastBallots {
    fn from(val: VoteArgs) -> Self {
        CastBallots {
            slot_id: val.slot_id,
            participant_id: val.participant,
            ranked_option_ids: val.options,
        }
    }
}

#[derive(ClapArgs)]
pub struct FinalizeArgs {
    /// Slot to finalize
    pub slot_id: u64,
    /// `eager` requires every participant's ballot or an elapsed deadline;
    /// `sweep` requires an elapsed deadline
    #[arg(long, value_enum, default_value_t = PolicyArg::Eager)]
    pub policy: PolicyArg,
}

#[derive(ClapArgs)]
pub struct SweepArgs {
    /// Keep sweeping on an interval until interrupted
    #[arg(long)]
    pub watch: bool,
    /// Seconds between sweeps in watch mode
    #[arg(long, default_value_t = 60)]
    pub interval_secs: u64,
    /// Seconds one sweep may run before it is asked to stop
    #[arg(long, default_value_t = 30)]
    pub budget_secs: u64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PlanStateArg {
    Collecting,
    Partial,
    Complete,
}

impl From<PlanStateArg> for PlanState {
    fn from(val: PlanStateArg) -> Self {
        match val {
            PlanStateArg::Collecting => PlanState::Collecting,
            PlanStateArg::Partial => PlanState::PartiallyFinalized,
            PlanStateArg::Complete => PlanState::Complete,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Eager,
    Sweep,
}

impl From<PolicyArg> for FinalizePolicy {
    fn from(val: PolicyArg) -> Self {
        match val {
            PolicyArg::Eager => FinalizePolicy::Eager,
            PolicyArg::Sweep => FinalizePolicy::Sweep,
        }
    }
}
