//! Ballot recording and the eager finalization path.

use super::{Engine, FinalizePolicy};
use crate::{
    error::{Result, TallyError},
    models::Ballot,
    params::CastBallots,
};

impl Engine {
    /// Records a participant's ranked ballot for a slot, replacing any
    /// ballot they cast there before.
    ///
    /// Checks run in order: empty ranking, duplicate option, slot closed,
    /// option not in the slot. Once the ballots are stored the slot is
    /// finalized if every expected participant has voted, and the plan is
    /// completed if that was its last slot. Failures on that path are logged
    /// and do not undo the ballots.
    pub async fn record_ballots(&self, params: &CastBallots) -> Result<Vec<Ballot>> {
        params.validate()?;

        let slot_id = params.slot_id;
        let (slot, plan) = self.load_slot_and_plan(slot_id).await?;
        if !self.accepts_ballots(&slot, &plan) {
            return Err(TallyError::VotingClosed { slot_id });
        }

        let options = self.gateway.load_options_for_slot(slot_id).await?;
        if let Some(&option_id) = params
            .ranked_option_ids
            .iter()
            .find(|id| !options.iter().any(|o| o.id == **id))
        {
            return Err(TallyError::UnknownOption { option_id, slot_id });
        }

        let ballots = self
            .gateway
            .replace_ballots(
                slot_id,
                &params.participant_id,
                &params.rankings(),
                self.clock.now(),
            )
            .await?;

        log::debug!(
            "Recorded {} ballots from '{}' for slot {slot_id}",
            ballots.len(),
            params.participant_id
        );

        self.finalize_eagerly(slot_id, plan.id).await;

        Ok(ballots)
    }

    async fn finalize_eagerly(&self, slot_id: u64, plan_id: u64) {
        match self.try_finalize(slot_id, FinalizePolicy::Eager).await {
            Ok(outcome) if outcome.changed => {
                if let Err(e) = self.try_complete(plan_id).await {
                    log::warn!("Completion check for plan {plan_id} failed: {e}");
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Eager finalization of slot {slot_id} failed: {e}"),
        }
    }
}
