//! Command handlers.

use std::{
    fs,
    io::{self, Read},
    path::Path,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use tally_core::{
    display::{Ballots, CreateResult, FinalizeResult, Plans, SweepSummary, TimeLeft, VoteReceipt},
    params::{CastBallots, CreatePlan, Id, ListPlans},
    Engine, SweepConfig, Sweeper,
};
use tokio_util::sync::CancellationToken;

use crate::{
    args::{CreatePlanArgs, FinalizeArgs, IdArgs, PlanCommands, SlotCommands, SweepArgs, VoteArgs},
    renderer::TerminalRenderer,
};

/// Environment variable that turns the `sweep` command into a no-op.
pub const SWEEP_KILL_SWITCH: &str = "TALLY_SWEEP_DISABLED";

pub struct Cli {
    engine: Engine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: Engine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => self.create_plan(args).await,
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => self.show_plan(args).await,
            PlanCommands::Archive(args) => self.archive_plan(args).await,
        }
    }

    pub async fn handle_slot_command(&self, command: SlotCommands) -> Result<()> {
        match command {
            SlotCommands::Show(args) => self.show_slot(args).await,
        }
    }

    async fn create_plan(&self, args: CreatePlanArgs) -> Result<()> {
        let params = read_plan_file(&args.file)?;
        let plan = self
            .engine
            .create_plan(&params)
            .await
            .context("Failed to create plan")?;
        self.renderer.render(&CreateResult::new(plan));
        Ok(())
    }

    pub async fn list_plans(&self, filter: &ListPlans) -> Result<()> {
        let plans = self
            .engine
            .list_plans(filter)
            .await
            .context("Failed to list plans")?;
        self.renderer.render(&Plans(plans));
        Ok(())
    }

    async fn show_plan(&self, args: IdArgs) -> Result<()> {
        let id: Id = args.into();
        let plan = self
            .engine
            .get_plan(&id)
            .await
            .context("Failed to load plan")?
            .ok_or_else(|| anyhow!("Plan with ID {} not found", id.id))?;
        self.renderer.render(&plan);
        Ok(())
    }

    async fn archive_plan(&self, args: IdArgs) -> Result<()> {
        let id: Id = args.into();
        self.engine
            .archive_plan(&id)
            .await
            .with_context(|| format!("Failed to archive plan {}", id.id))?;
        self.renderer.render(&format!("Archived plan {}\n", id.id));
        Ok(())
    }

    async fn show_slot(&self, args: IdArgs) -> Result<()> {
        let id: Id = args.into();
        let slot = self
            .engine
            .get_slot(&id)
            .await
            .context("Failed to load slot")?
            .ok_or_else(|| anyhow!("Slot with ID {} not found", id.id))?;
        let plan = self
            .engine
            .get_plan(&Id { id: slot.plan_id })
            .await
            .context("Failed to load plan")?
            .ok_or_else(|| anyhow!("Plan with ID {} not found", slot.plan_id))?;
        let ballots = self
            .engine
            .get_ballots(&id)
            .await
            .context("Failed to load ballots")?;

        self.renderer.render(&slot);
        if !slot.state.is_finalized() {
            let left = TimeLeft {
                deadline: slot.effective_deadline(plan.voting_deadline),
                now: self.engine.clock().now(),
            };
            self.renderer.render(&format!("Voting {left}\n\n"));
        }
        self.renderer.render(&"#### Ballots\n\n");
        self.renderer.render(&Ballots(ballots));
        Ok(())
    }

    pub async fn vote(&self, args: VoteArgs) -> Result<()> {
        let params: CastBallots = args.into();
        let ballots = self
            .engine
            .record_ballots(&params)
            .await
            .context("Failed to record ballot")?;
        self.renderer.render(&VoteReceipt {
            slot_id: params.slot_id,
            participant_id: params.participant_id,
            ballots,
        });
        Ok(())
    }

    pub async fn finalize(&self, args: FinalizeArgs) -> Result<()> {
        let outcome = self
            .engine
            .try_finalize(args.slot_id, args.policy.into())
            .await
            .with_context(|| format!("Failed to finalize slot {}", args.slot_id))?;

        if outcome.changed {
            if let Some(slot) = self.engine.get_slot(&Id { id: args.slot_id }).await? {
                let completed = self
                    .engine
                    .try_complete(slot.plan_id)
                    .await
                    .context("Failed to check plan completion")?;
                if completed {
                    log::info!("Plan {} is now complete", slot.plan_id);
                }
            }
        }

        self.renderer.render(&FinalizeResult {
            slot_id: args.slot_id,
            outcome,
        });
        Ok(())
    }

    pub async fn sweep(&self, args: SweepArgs) -> Result<()> {
        if sweep_disabled() {
            self.renderer
                .render(&format!("Sweep disabled by {SWEEP_KILL_SWITCH}\n"));
            return Ok(());
        }

        let config = SweepConfig {
            interval: Duration::from_secs(args.interval_secs.max(1)),
            run_budget: Duration::from_secs(args.budget_secs.max(1)),
        };
        let sweeper = Sweeper::new(self.engine.clone(), config);
        let cancel = CancellationToken::new();

        if args.watch {
            let token = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            });
            sweeper.run(cancel).await;
            return Ok(());
        }

        let report = sweeper.run_once(&cancel).await.context("Sweep failed")?;
        self.renderer.render(&SweepSummary(&report));
        Ok(())
    }
}

fn sweep_disabled() -> bool {
    std::env::var(SWEEP_KILL_SWITCH)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "" | "0" | "false"))
        .unwrap_or(false)
}

fn read_plan_file(path: &Path) -> Result<CreatePlan> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read plan from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?
    };

    serde_json::from_str(&json).context("Invalid plan JSON")
}
