//! Batch finalization of plans whose voting time has run out.
//!
//! The sweep is the backstop for the eager path: a slot that never collects
//! every expected ballot is still decided once its deadline passes. Each
//! plan is processed independently, so one plan's failure is recorded in the
//! [`SweepReport`] and the run moves on.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{Engine, FinalizePolicy};
use crate::{
    error::{Result, TallyError},
    models::SlotState,
};

/// What one sweep run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Plans the run started processing.
    pub plans_examined: usize,
    /// Slots this run finalized.
    pub finalized_slots: Vec<u64>,
    /// Plans this run marked complete.
    pub completed_plans: Vec<u64>,
    /// Plans whose processing failed.
    pub failed_plans: Vec<u64>,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl SweepReport {
    /// Number of slots finalized by this run.
    pub fn finalized_count(&self) -> usize {
        self.finalized_slots.len()
    }
}

impl Engine {
    /// Finalizes every slot past its deadline in every expired, incomplete
    /// plan, then completes the plans that became fully decided.
    ///
    /// `cancel` is checked between plans; a cancelled run returns what it
    /// did so far with `cancelled` set.
    ///
    /// # Errors
    ///
    /// Only a failure to list the expired plans is returned. Failures while
    /// processing a plan are logged and recorded in `failed_plans`.
    pub async fn run_sweep(&self, cancel: &CancellationToken) -> Result<SweepReport> {
        let now = self.clock.now();
        let plans = self.gateway.list_expired_unfinalized_plans(now).await?;
        log::debug!("Sweep found {} expired plans", plans.len());

        let mut report = SweepReport::default();
        for plan in plans {
            if cancel.is_cancelled() {
                log::info!("Sweep cancelled after {} plans", report.plans_examined);
                report.cancelled = true;
                break;
            }

            report.plans_examined += 1;
            if let Err(e) = self.sweep_plan(plan.id, now, &mut report).await {
                log::warn!("Sweep of plan {} failed: {e}", plan.id);
                report.failed_plans.push(plan.id);
            }
        }

        Ok(report)
    }

    async fn sweep_plan(&self, plan_id: u64, now: Timestamp, report: &mut SweepReport) -> Result<()> {
        let plan = self
            .gateway
            .load_plan_with_slots(plan_id)
            .await?
            .ok_or(TallyError::PlanNotFound { id: plan_id })?;

        let expired = plan
            .slots
            .iter()
            .filter(|s| !s.state.is_finalized() && s.deadline_elapsed(plan.voting_deadline, now));

        for slot in expired {
            if slot.state == SlotState::Open {
                let closed = self
                    .gateway
                    .conditional_update_slot_state(
                        slot.id,
                        SlotState::Open,
                        SlotState::Closed,
                        None,
                        false,
                        now,
                    )
                    .await?;
                if closed {
                    log::debug!("Closed voting on slot {}", slot.id);
                }
            }

            let outcome = self.try_finalize(slot.id, FinalizePolicy::Sweep).await?;
            if outcome.changed {
                report.finalized_slots.push(slot.id);
            }
        }

        if self.try_complete(plan_id).await? {
            report.completed_plans.push(plan_id);
        }

        Ok(())
    }
}
