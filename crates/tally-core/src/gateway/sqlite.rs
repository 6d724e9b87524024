//! SQLite-backed gateway.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::task;

use super::PersistenceGateway;
use crate::{
    db::Database,
    error::{Result, TallyError},
    models::{Ballot, Plan, PlanOption, PlanState, Slot, SlotState},
    params::{CreatePlan, ListPlans},
};

/// Gateway that opens a fresh [`Database`] connection on a blocking thread
/// for every call.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    db_path: PathBuf,
}

impl SqliteGateway {
    /// Opens (creating if needed) the database at `path` and returns a
    /// gateway over it.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| TallyError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let path_clone = db_path.clone();
        task::spawn_blocking(move || Database::new(&path_clone).map(|_| ()))
            .await
            .map_err(TallyError::join)??;

        Ok(Self { db_path })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `f` against a new connection on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(TallyError::join)?
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    async fn load_slot(&self, slot_id: u64) -> Result<Option<Slot>> {
        self.with_db(move |db| db.get_slot(slot_id)).await
    }

    async fn load_plan(&self, plan_id: u64) -> Result<Option<Plan>> {
        self.with_db(move |db| db.load_plan(plan_id)).await
    }

    async fn load_options_for_slot(&self, slot_id: u64) -> Result<Vec<PlanOption>> {
        self.with_db(move |db| db.get_options_for_slot(slot_id)).await
    }

    async fn load_ballots_for_slot(&self, slot_id: u64) -> Result<Vec<Ballot>> {
        self.with_db(move |db| db.get_ballots_for_slot(slot_id)).await
    }

    async fn replace_ballots(
        &self,
        slot_id: u64,
        participant_id: &str,
        rankings: &[(u64, u32)],
        now: Timestamp,
    ) -> Result<Vec<Ballot>> {
        let participant_id = participant_id.to_string();
        let rankings = rankings.to_vec();
        self.with_db(move |db| db.replace_ballots(slot_id, &participant_id, &rankings, now))
            .await
    }

    async fn conditional_update_slot_state(
        &self,
        slot_id: u64,
        expected: SlotState,
        new: SlotState,
        winner: Option<u64>,
        tie_broken: bool,
        now: Timestamp,
    ) -> Result<bool> {
        self.with_db(move |db| {
            db.update_slot_state_if(slot_id, expected, new, winner, tie_broken, now)
        })
        .await
    }

    async fn load_plan_with_slots(&self, plan_id: u64) -> Result<Option<Plan>> {
        self.with_db(move |db| db.load_plan_with_slots(plan_id, false))
            .await
    }

    async fn conditional_update_plan_state(
        &self,
        plan_id: u64,
        expected: PlanState,
        new: PlanState,
    ) -> Result<bool> {
        self.with_db(move |db| db.update_plan_state_if(plan_id, expected, new))
            .await
    }

    async fn list_expired_unfinalized_plans(&self, now: Timestamp) -> Result<Vec<Plan>> {
        self.with_db(move |db| db.list_expired_unfinalized_plans(now))
            .await
    }

    async fn create_plan(&self, params: &CreatePlan, now: Timestamp) -> Result<Plan> {
        let params = params.clone();
        self.with_db(move |db| db.create_plan(&params, now)).await
    }

    async fn get_plan(&self, plan_id: u64) -> Result<Option<Plan>> {
        self.with_db(move |db| db.get_plan(plan_id)).await
    }

    async fn list_plans(&self, filter: &ListPlans) -> Result<Vec<Plan>> {
        let filter = filter.clone();
        self.with_db(move |db| db.list_plans(&filter)).await
    }

    async fn archive_plan(&self, plan_id: u64, now: Timestamp) -> Result<()> {
        self.with_db(move |db| db.archive_plan(plan_id, now)).await
    }
}
