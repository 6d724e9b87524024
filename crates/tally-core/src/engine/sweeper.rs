//! Interval runner for the expired-voting sweep.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{Engine, SweepReport};
use crate::error::Result;

/// Timing for a [`Sweeper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Time between the starts of consecutive runs.
    pub interval: Duration,
    /// How long one run may take before it is asked to stop.
    pub run_budget: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            run_budget: Duration::from_secs(30),
        }
    }
}

/// Calls [`Engine::run_sweep`] on a fixed interval until cancelled.
///
/// Runs never overlap within one sweeper. Several sweepers over the same
/// store are safe because every transition is a conditional write.
#[derive(Debug, Clone)]
pub struct Sweeper {
    engine: Engine,
    config: SweepConfig,
}

impl Sweeper {
    pub fn new(engine: Engine, config: SweepConfig) -> Self {
        Self { engine, config }
    }

    /// Runs one budgeted sweep.
    ///
    /// When the budget runs out the run is cancelled through a child of
    /// `cancel` and finishes the plan it is on, so the report is still
    /// returned.
    pub async fn run_once(&self, cancel: &CancellationToken) -> Result<SweepReport> {
        let run_token = cancel.child_token();
        let run = self.engine.run_sweep(&run_token);
        tokio::pin!(run);

        match time::timeout(self.config.run_budget, &mut run).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!(
                    "Sweep exceeded its {:?} budget, stopping after the current plan",
                    self.config.run_budget
                );
                run_token.cancel();
                run.await
            }
        }
    }

    /// Sweeps every interval until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Sweeper started (interval {:?})", self.config.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.run_once(&cancel).await {
                Ok(report) => log::info!(
                    "Sweep examined {} plans: {} slots finalized, {} plans completed, {} failed",
                    report.plans_examined,
                    report.finalized_count(),
                    report.completed_plans.len(),
                    report.failed_plans.len()
                ),
                Err(e) => log::error!("Sweep run failed: {e}"),
            }
        }
        log::info!("Sweeper stopped");
    }
}
