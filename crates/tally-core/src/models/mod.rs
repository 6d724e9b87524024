//! Data models for plans, slots, options and ballots.
//!
//! This module contains the domain models the decision engine works on. The
//! [`Display`](std::fmt::Display) implementations live in
//! [`crate::display::models`] to keep presentation apart from data.
//!
//! # Shape of a plan
//!
//! ```text
//! Plan ──┬── Slot (monday / breakfast) ──┬── PlanOption ── Ballot*
//!        │                               └── PlanOption ── Ballot*
//!        └── Slot (monday / lunch) ───────── PlanOption ── Ballot*
//! ```
//!
//! Options are linked to their slot through the shared [`SlotKey`] rather than
//! a slot ID, so every option whose `(day, occasion)` matches competes for that
//! slot.
//!
//! # Examples
//!
//! ```rust
//! use jiff::Timestamp;
//! use tally_core::models::{Day, Occasion, Slot, SlotKey, SlotState};
//!
//! let deadline = Timestamp::from_second(1_700_000_000).unwrap();
//! let slot = Slot {
//!     id: 1,
//!     plan_id: 1,
//!     key: SlotKey::new(Day::Monday, Occasion::Breakfast),
//!     voting_deadline: None,
//!     state: SlotState::Open,
//!     winner: None,
//!     tie_broken: false,
//!     finalized_at: None,
//!     options: vec![],
//! };
//! assert!(slot.deadline_elapsed(deadline, deadline));
//! ```

pub mod ballot;
pub mod key;
pub mod option;
pub mod plan;
pub mod slot;
pub mod status;


pub use ballot::Ballot;
pub use key::{Day, Occasion, SlotKey};
pub use option::PlanOption;
pub use plan::Plan;
pub use slot::Slot;
pub use status::{PlanState, SlotState};
