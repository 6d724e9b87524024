//! Plan completion detection.

use super::{Engine, MAX_CAS_ATTEMPTS};
use crate::{
    error::{Result, TallyError},
    events::Event,
    models::PlanState,
};

impl Engine {
    /// Marks the plan complete once every slot is finalized.
    ///
    /// Returns true only for the call that performed the transition, which
    /// also publishes [`Event::PlanDecided`]. While only some slots are
    /// finalized the plan moves to `PartiallyFinalized` and this returns
    /// false. A plan without slots is never complete.
    pub async fn try_complete(&self, plan_id: u64) -> Result<bool> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let plan = self
                .gateway
                .load_plan_with_slots(plan_id)
                .await?
                .ok_or(TallyError::PlanNotFound { id: plan_id })?;

            if plan.state.is_complete() {
                return Ok(false);
            }

            if !plan.all_slots_finalized() {
                if plan.state == PlanState::Collecting && plan.finalized_slot_count() > 0 {
                    let moved = self
                        .gateway
                        .conditional_update_plan_state(
                            plan_id,
                            PlanState::Collecting,
                            PlanState::PartiallyFinalized,
                        )
                        .await?;
                    if moved {
                        log::debug!(
                            "Plan {plan_id} partially finalized ({}/{} slots)",
                            plan.finalized_slot_count(),
                            plan.slots.len()
                        );
                    }
                }
                return Ok(false);
            }

            let won = self
                .gateway
                .conditional_update_plan_state(plan_id, plan.state, PlanState::Complete)
                .await?;
            if won {
                log::info!("Plan {plan_id} decided: all {} slots finalized", plan.slots.len());
                self.publish(&Event::PlanDecided { plan_id }).await;
                return Ok(true);
            }

            log::debug!("Lost completion race on plan {plan_id} (attempt {attempt})");
        }

        Ok(false)
    }
}
