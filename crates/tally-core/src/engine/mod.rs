//! Decision engine for ranked-choice household plans.
//!
//! The [`Engine`] is the one entry point for recording votes and deciding
//! slots. It owns three collaborators: a [`PersistenceGateway`] for storage,
//! an [`EventEmitter`] for notifications and a [`Clock`] for deadlines. It
//! holds no other state, so clones can run concurrently from independent
//! tasks and processes.
//!
//! # Architecture Overview
//!
//! ```text
//!  record_ballots ──┐ (eager)
//!                   ├──▶ try_finalize ──▶ resolve ──▶ conditional write ──▶ SlotFinalized
//!  run_sweep ───────┘ (sweep)     │
//!                                 └──▶ try_complete ──▶ conditional write ──▶ PlanDecided
//! ```
//!
//! Every state change is a conditional write guarded by the state the engine
//! observed. Losing such a write is never an error: the caller receives
//! `changed = false` and the stored outcome.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Engine`] instances
//! - `authoring`: Plan creation, lookup and archival
//! - `eligibility`: Whether a slot accepts ballots
//! - `recorder`: Ballot validation and the eager finalization path
//! - [`resolver`]: Pure ranked-choice tallying
//! - `finalizer`: Exactly-once slot finalization
//! - `completion`: Plan completion detection
//! - [`sweep`]: Batch finalization of plans past their deadline
//! - [`sweeper`]: Interval runner for the sweep
//!
//! # Usage
//!
//! ```rust
//! use tally_core::{EngineBuilder, params::CastBallots};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("/tmp/tally-doc.db"))
//!     .build()
//!     .await?;
//!
//! let ballots = engine
//!     .record_ballots(&CastBallots {
//!         slot_id: 1,
//!         participant_id: "alice".to_string(),
//!         ranked_option_ids: vec![3, 1, 2],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::{clock::Clock, events::EventEmitter, gateway::PersistenceGateway};

mod authoring;
pub mod builder;
mod completion;
mod eligibility;
mod finalizer;
mod recorder;
pub mod resolver;
pub mod sweep;
pub mod sweeper;


pub use builder::EngineBuilder;
pub use finalizer::{FinalizeOutcome, FinalizePolicy};
pub use resolver::{resolve, OptionScore, Resolution};
pub use sweep::SweepReport;
pub use sweeper::{SweepConfig, Sweeper};

/// How many times a conditional write is re-attempted after losing a race
/// to a transition that left the record still undecided.
pub const MAX_CAS_ATTEMPTS: usize = 3;

/// Coordinates ballots, finalization and completion over the collaborators.
#[derive(Clone)]
pub struct Engine {
    pub(crate) gateway: Arc<dyn PersistenceGateway>,
    pub(crate) emitter: Arc<dyn EventEmitter>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Engine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        emitter: Arc<dyn EventEmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            emitter,
            clock,
        }
    }

    /// The engine's time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}
