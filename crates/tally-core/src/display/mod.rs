//! Display formatting and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! newtype wrappers format collections and operation results. Every formatter
//! produces markdown, which the CLI renders for the terminal.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Markdown      │
//! │  (Plan, Slot)   │───▶│ Result Types    │───▶│   Output        │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: `Plans`, `Ballots`
//! - [`results`]: `CreateResult`, `VoteReceipt`, `FinalizeResult`, `SweepSummary`
//! - [`datetime`]: `LocalDateTime`, `TimeLeft`
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{Ballots, Plans};
pub use datetime::{LocalDateTime, TimeLeft};
pub use results::{CreateResult, FinalizeResult, SweepSummary, VoteReceipt};
