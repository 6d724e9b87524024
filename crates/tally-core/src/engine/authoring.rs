//! Plan authoring and lookup.

use super::Engine;
use crate::{
    error::Result,
    models::{Ballot, Plan, Slot},
    params::{CreatePlan, Id, ListPlans},
};

impl Engine {
    /// Creates a plan. Slot drafts naming the same day and occasion are
    /// merged into one slot whose options all compete.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        params.validate()?;
        let plan = self.gateway.create_plan(params, self.clock.now()).await?;
        log::info!(
            "Created plan {} for household '{}' with {} slots",
            plan.id,
            plan.household_id,
            plan.slots.len()
        );
        Ok(plan)
    }

    /// Retrieves a plan with its slots and options.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        self.gateway.get_plan(params.id).await
    }

    pub async fn list_plans(&self, filter: &ListPlans) -> Result<Vec<Plan>> {
        self.gateway.list_plans(filter).await
    }

    /// Retrieves a slot with its competing options.
    pub async fn get_slot(&self, params: &Id) -> Result<Option<Slot>> {
        let Some(mut slot) = self.gateway.load_slot(params.id).await? else {
            return Ok(None);
        };
        slot.options = self.gateway.load_options_for_slot(slot.id).await?;
        Ok(Some(slot))
    }

    /// Retrieves every ballot cast in a slot.
    pub async fn get_ballots(&self, params: &Id) -> Result<Vec<Ballot>> {
        self.gateway.load_ballots_for_slot(params.id).await
    }

    /// Archives a plan. Archived plans reject ballots and are skipped by the
    /// sweep.
    pub async fn archive_plan(&self, params: &Id) -> Result<()> {
        self.gateway.archive_plan(params.id, self.clock.now()).await?;
        log::info!("Archived plan {}", params.id);
        Ok(())
    }
}
