//! Persistence port consumed by the engine.
//!
//! The engine never talks to storage directly. It reads through, and
//! expresses every state change as a conditional write against, a
//! [`PersistenceGateway`]. Implementations must make each write atomic with
//! respect to its expected-state precondition: when two callers race, exactly
//! one `conditional_update_*` call returns `true`.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    error::Result,
    models::{Ballot, Plan, PlanOption, PlanState, Slot, SlotState},
    params::{CreatePlan, ListPlans},
};

mod sqlite;

pub use sqlite::SqliteGateway;

/// Transactional storage of plans, slots, options and ballots.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Loads a slot without its options.
    async fn load_slot(&self, slot_id: u64) -> Result<Option<Slot>>;

    /// Loads a plan with its participants but without slots.
    async fn load_plan(&self, plan_id: u64) -> Result<Option<Plan>>;

    /// Loads every option whose key matches the slot.
    async fn load_options_for_slot(&self, slot_id: u64) -> Result<Vec<PlanOption>>;

    /// Loads every ballot cast for the slot's options.
    async fn load_ballots_for_slot(&self, slot_id: u64) -> Result<Vec<Ballot>>;

    /// Replaces a participant's ballots for a slot, atomically with a check
    /// that the slot is still open.
    async fn replace_ballots(
        &self,
        slot_id: u64,
        participant_id: &str,
        rankings: &[(u64, u32)],
        now: Timestamp,
    ) -> Result<Vec<Ballot>>;

    /// Moves the slot from `expected` to `new`. `winner` must be set exactly
    /// when `new` is `Finalized`. Returns false when the slot was no longer in
    /// `expected`.
    async fn conditional_update_slot_state(
        &self,
        slot_id: u64,
        expected: SlotState,
        new: SlotState,
        winner: Option<u64>,
        tie_broken: bool,
        now: Timestamp,
    ) -> Result<bool>;

    /// Loads a plan with participants and slots (slot options not loaded).
    async fn load_plan_with_slots(&self, plan_id: u64) -> Result<Option<Plan>>;

    /// Moves the plan from `expected` to `new`. Returns false when the plan
    /// was no longer in `expected`.
    async fn conditional_update_plan_state(
        &self,
        plan_id: u64,
        expected: PlanState,
        new: PlanState,
    ) -> Result<bool>;

    /// Lists non-archived, incomplete plans with voting time elapsed at `now`.
    async fn list_expired_unfinalized_plans(&self, now: Timestamp) -> Result<Vec<Plan>>;

    /// Stores a new plan with its participants, slots and options.
    async fn create_plan(&self, params: &CreatePlan, now: Timestamp) -> Result<Plan>;

    /// Loads a plan with participants, slots and each slot's options.
    async fn get_plan(&self, plan_id: u64) -> Result<Option<Plan>>;

    /// Lists plans matching the filter, newest first.
    async fn list_plans(&self, filter: &ListPlans) -> Result<Vec<Plan>>;

    /// Marks the plan archived. Idempotent.
    async fn archive_plan(&self, plan_id: u64, now: Timestamp) -> Result<()>;
}
