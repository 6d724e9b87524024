//! Core library for the Tally household decision engine.
//!
//! A household plans a week of occasions (Monday dinner, Tuesday lunch, ...).
//! Each occasion is a slot with several candidate options, and every expected
//! participant ranks the options before a deadline. This crate tallies those
//! ranked ballots, decides each slot exactly once even under concurrent
//! triggers, and recognizes when a whole plan has been decided.
//!
//! # Layers
//!
//! - **Engine** ([`engine`]): voting, resolution, finalization, completion
//!   and the expired-voting sweep
//! - **Collaborators**: [`gateway::PersistenceGateway`] for storage,
//!   [`events::EventEmitter`] for notifications, [`clock::Clock`] for time
//! - **Storage** ([`db`]): SQLite operations behind
//!   [`gateway::SqliteGateway`]
//! - **Presentation** ([`display`]): markdown `Display` implementations
//!   rendered by the CLI
//!
//! # Quick Start
//!
//! ```rust
//! use tally_core::{
//!     params::{CastBallots, CreatePlan, OptionDraft, SlotDraft},
//!     Day, EngineBuilder, Occasion,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("tally.db"))
//!     .build()
//!     .await?;
//!
//! let plan = engine
//!     .create_plan(&CreatePlan {
//!         household_id: "smiths".to_string(),
//!         notes: None,
//!         voting_deadline: "2030-01-06T18:00:00Z".parse()?,
//!         participants: vec!["ana".to_string(), "ben".to_string()],
//!         slots: vec![SlotDraft {
//!             day: Day::Monday,
//!             occasion: Occasion::Dinner,
//!             voting_deadline: None,
//!             options: vec![
//!                 OptionDraft { label: "Curry".to_string(), notes: None },
//!                 OptionDraft { label: "Tacos".to_string(), notes: None },
//!             ],
//!         }],
//!     })
//!     .await?;
//!
//! let slot = &plan.slots[0];
//! engine
//!     .record_ballots(&CastBallots {
//!         slot_id: slot.id,
//!         participant_id: "ana".to_string(),
//!         ranked_option_ids: vec![slot.options[1].id, slot.options[0].id],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod params;

// Re-export commonly used types
pub use db::Database;
pub use display::{Plans, SweepSummary};
pub use engine::{
    Engine, EngineBuilder, FinalizeOutcome, FinalizePolicy, SweepConfig, SweepReport, Sweeper,
};
pub use error::{Result, TallyError};
pub use models::{
    Ballot, Day, Occasion, Plan, PlanOption, PlanState, Slot, SlotKey, SlotState,
};
pub use params::{CastBallots, CreatePlan, Id, ListPlans, OptionDraft, SlotDraft};
