//! Whether a slot currently accepts ballots.

use super::Engine;
use crate::{
    error::{Result, TallyError},
    models::{Plan, Slot, SlotState},
};

impl Engine {
    /// Returns true while the slot is open, its plan is not archived and the
    /// effective deadline (the slot's override, else the plan's) has not
    /// passed. Never mutates.
    ///
    /// # Errors
    ///
    /// `TallyError::SlotNotFound` when the slot does not exist.
    pub async fn is_open_for_voting(&self, slot_id: u64) -> Result<bool> {
        let (slot, plan) = self.load_slot_and_plan(slot_id).await?;
        Ok(self.accepts_ballots(&slot, &plan))
    }

    pub(super) async fn load_slot_and_plan(&self, slot_id: u64) -> Result<(Slot, Plan)> {
        let slot = self
            .gateway
            .load_slot(slot_id)
            .await?
            .ok_or(TallyError::SlotNotFound { id: slot_id })?;
        let plan = self
            .gateway
            .load_plan(slot.plan_id)
            .await?
            .ok_or(TallyError::PlanNotFound { id: slot.plan_id })?;
        Ok((slot, plan))
    }

    pub(super) fn accepts_ballots(&self, slot: &Slot, plan: &Plan) -> bool {
        slot.state == SlotState::Open
            && !plan.is_archived()
            && !slot.deadline_elapsed(plan.voting_deadline, self.clock.now())
    }
}
