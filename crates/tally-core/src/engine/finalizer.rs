//! Exactly-once slot finalization.

use serde::{Deserialize, Serialize};

use super::{resolve, Engine, MAX_CAS_ATTEMPTS};
use crate::{
    error::{Result, TallyError},
    events::Event,
    models::{Ballot, Plan, Slot, SlotState},
};

/// Which trigger is asking to finalize a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizePolicy {
    /// Right after a ballot: finalize once every expected participant has
    /// voted, or once the deadline has passed.
    Eager,
    /// From the expired-voting sweep: finalize once the deadline has passed,
    /// however many ballots were cast.
    Sweep,
}

/// Result of a finalization attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeOutcome {
    /// Whether this call performed the transition to finalized.
    pub changed: bool,
    /// The slot's winner, if it is finalized.
    pub winner: Option<u64>,
    pub tie_broken: bool,
}

impl FinalizeOutcome {
    fn unchanged(slot: &Slot) -> Self {
        Self {
            changed: false,
            winner: slot.winner,
            tie_broken: slot.tie_broken,
        }
    }
}

impl Engine {
    /// Finalizes the slot if `policy` allows it, recording the resolved
    /// winner.
    ///
    /// Concurrent calls for one slot are safe: exactly one of them observes
    /// `changed = true`, and all of them report the same winner once the slot
    /// is finalized. Only that call publishes [`Event::SlotFinalized`]; a
    /// failed publish is logged and does not change the outcome.
    ///
    /// # Errors
    ///
    /// `TallyError::NoOptions` if the slot has nothing to choose from,
    /// `TallyError::SlotNotFound` if it does not exist, and storage errors.
    pub async fn try_finalize(&self, slot_id: u64, policy: FinalizePolicy) -> Result<FinalizeOutcome> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let (slot, plan) = self.load_slot_and_plan(slot_id).await?;
            if slot.state.is_finalized() {
                return Ok(FinalizeOutcome::unchanged(&slot));
            }

            let now = self.clock.now();
            let ballots = self.gateway.load_ballots_for_slot(slot_id).await?;
            if !Self::policy_allows(policy, &slot, &plan, &ballots, now) {
                log::debug!("Slot {slot_id} not ready for {policy:?} finalization");
                return Ok(FinalizeOutcome::unchanged(&slot));
            }

            let options = self.gateway.load_options_for_slot(slot_id).await?;
            let resolution = resolve(&options, &ballots).ok_or(TallyError::NoOptions { slot_id })?;

            let won = self
                .gateway
                .conditional_update_slot_state(
                    slot_id,
                    slot.state,
                    SlotState::Finalized,
                    Some(resolution.winner),
                    resolution.tie_broken,
                    now,
                )
                .await?;

            if won {
                log::info!(
                    "Finalized slot {slot_id} of plan {} with option {} ({policy:?}{})",
                    plan.id,
                    resolution.winner,
                    if resolution.tie_broken { ", tie broken" } else { "" }
                );
                self.publish(&Event::SlotFinalized {
                    plan_id: plan.id,
                    slot_id,
                    winner: resolution.winner,
                    tie_broken: resolution.tie_broken,
                })
                .await;

                return Ok(FinalizeOutcome {
                    changed: true,
                    winner: Some(resolution.winner),
                    tie_broken: resolution.tie_broken,
                });
            }

            log::debug!("Lost finalization race on slot {slot_id} (attempt {attempt})");
        }

        let slot = self
            .gateway
            .load_slot(slot_id)
            .await?
            .ok_or(TallyError::SlotNotFound { id: slot_id })?;
        if !slot.state.is_finalized() {
            log::warn!("Gave up finalizing slot {slot_id} after {MAX_CAS_ATTEMPTS} attempts");
        }
        Ok(FinalizeOutcome::unchanged(&slot))
    }

    fn policy_allows(
        policy: FinalizePolicy,
        slot: &Slot,
        plan: &Plan,
        ballots: &[Ballot],
        now: jiff::Timestamp,
    ) -> bool {
        let elapsed = slot.deadline_elapsed(plan.voting_deadline, now);
        match policy {
            FinalizePolicy::Sweep => elapsed,
            FinalizePolicy::Eager => {
                elapsed
                    || (!plan.participants.is_empty()
                        && plan
                            .participants
                            .iter()
                            .all(|p| ballots.iter().any(|b| &b.participant_id == p)))
            }
        }
    }

    /// Publishes `event`, logging instead of failing.
    pub(super) async fn publish(&self, event: &Event) {
        if let Err(e) = self.emitter.publish(event).await {
            log::warn!("Failed to publish {event:?}: {e}");
        }
    }
}
