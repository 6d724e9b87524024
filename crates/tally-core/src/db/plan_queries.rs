//! Plan authoring, lookup and state transitions.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::{optional_timestamp_at, parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, TallyError},
    models::{Plan, PlanState, SlotKey},
    params::{CreatePlan, ListPlans, OptionDraft},
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (household_id, notes, voting_deadline, state, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_PARTICIPANT_SQL: &str =
    "INSERT INTO plan_participants (plan_id, participant_id) VALUES (?1, ?2)";
const INSERT_SLOT_SQL: &str =
    "INSERT INTO slots (plan_id, day, occasion, voting_deadline, state) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_OPTION_SQL: &str = "INSERT INTO options (plan_id, day, occasion, label, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const PLAN_COLUMNS: &str = "id, household_id, notes, voting_deadline, state, created_at, archived_at";
const SELECT_PARTICIPANTS_SQL: &str =
    "SELECT participant_id FROM plan_participants WHERE plan_id = ?1 ORDER BY rowid";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const ARCHIVE_PLAN_SQL: &str =
    "UPDATE plans SET archived_at = ?1 WHERE id = ?2 AND archived_at IS NULL";
const UPDATE_PLAN_STATE_SQL: &str = "UPDATE plans SET state = ?1 WHERE id = ?2 AND state = ?3";

// A plan needs sweeping when one of its undecided slots is past its effective
// deadline, or when every slot is decided but the plan was never marked
// complete.
const SELECT_EXPIRED_UNFINALIZED_SQL: &str = "SELECT p.id, p.household_id, p.notes, p.voting_deadline, p.state, p.created_at, p.archived_at FROM plans p \
     WHERE p.archived_at IS NULL AND p.state != 'complete' AND ( \
         EXISTS (SELECT 1 FROM slots s WHERE s.plan_id = p.id AND s.state != 'finalized' \
                 AND COALESCE(s.voting_deadline, p.voting_deadline) <= ?1) \
         OR (p.voting_deadline <= ?1 \
             AND EXISTS (SELECT 1 FROM slots s WHERE s.plan_id = p.id) \
             AND NOT EXISTS (SELECT 1 FROM slots s WHERE s.plan_id = p.id AND s.state != 'finalized'))) \
     ORDER BY p.voting_deadline, p.id";

impl super::Database {
    /// Builds a plan (without participants or slots) from a `PLAN_COLUMNS` row.
    fn build_plan_from_row(row: &Row) -> rusqlite::Result<Plan> {
        Ok(Plan {
            id: row.get::<_, i64>(0)? as u64,
            household_id: row.get(1)?,
            notes: row.get(2)?,
            voting_deadline: timestamp_at(row, 3)?,
            state: parsed_at::<PlanState>(row, 4)?,
            created_at: timestamp_at(row, 5)?,
            archived_at: optional_timestamp_at(row, 6)?,
            participants: Vec::new(),
            slots: Vec::new(),
        })
    }

    fn get_participants(&self, plan_id: u64) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PARTICIPANTS_SQL)
            .db_context("Failed to prepare participants query")?;

        let participants = stmt
            .query_map(params![plan_id as i64], |row| row.get(0))
            .db_context("Failed to query participants")?
            .collect::<rusqlite::Result<Vec<String>>>()
            .db_context("Failed to read participants")?;

        Ok(participants)
    }

    /// Creates a plan with its participants, slots and options in a single
    /// transaction. Slot drafts that share a `(day, occasion)` key are merged
    /// into one slot; the first deadline override given for the key is kept.
    pub fn create_plan(&mut self, params: &CreatePlan, now: Timestamp) -> Result<Plan> {
        params.validate()?;

        // Merge drafts while keeping first-appearance order
        let mut merged: Vec<(SlotKey, Option<Timestamp>, Vec<&OptionDraft>)> = Vec::new();
        for draft in &params.slots {
            let key = draft.key();
            match merged.iter_mut().find(|(k, _, _)| *k == key) {
                Some((_, deadline, options)) => {
                    if deadline.is_none() {
                        *deadline = draft.voting_deadline;
                    }
                    options.extend(draft.options.iter());
                }
                None => merged.push((key, draft.voting_deadline, draft.options.iter().collect())),
            }
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                params.household_id,
                params.notes,
                params.voting_deadline.as_millisecond(),
                PlanState::Collecting.as_str(),
                now.as_millisecond()
            ],
        )
        .db_context("Failed to insert plan")?;

        let plan_id = tx.last_insert_rowid();

        for participant in &params.participants {
            tx.execute(INSERT_PARTICIPANT_SQL, params![plan_id, participant])
                .db_context("Failed to insert participant")?;
        }

        for (key, deadline, options) in &merged {
            tx.execute(
                INSERT_SLOT_SQL,
                params![
                    plan_id,
                    key.day.as_str(),
                    key.occasion.as_str(),
                    deadline.map(|d| d.as_millisecond()),
                    "open"
                ],
            )
            .db_context("Failed to insert slot")?;

            for option in options {
                tx.execute(
                    INSERT_OPTION_SQL,
                    params![
                        plan_id,
                        key.day.as_str(),
                        key.occasion.as_str(),
                        option.label,
                        option.notes,
                        now.as_millisecond()
                    ],
                )
                .db_context("Failed to insert option")?;
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_plan(plan_id as u64)?
            .ok_or(TallyError::PlanNotFound { id: plan_id as u64 })
    }

    /// Retrieves a plan with its participants but without slots.
    pub fn load_plan(&self, id: u64) -> Result<Option<Plan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1");
        let plan = self
            .connection
            .query_row(&sql, params![id as i64], Self::build_plan_from_row)
            .optional()
            .db_context("Failed to query plan")?;

        match plan {
            Some(mut plan) => {
                plan.participants = self.get_participants(plan.id)?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    /// Retrieves a plan with participants and slots. Each slot carries its
    /// competing options when `with_options` is set.
    pub fn load_plan_with_slots(&self, id: u64, with_options: bool) -> Result<Option<Plan>> {
        let mut plan = self.load_plan(id)?;

        if let Some(ref mut plan) = plan {
            plan.slots = self.get_slots(plan.id)?;
            if with_options {
                for slot in &mut plan.slots {
                    slot.options = self.get_options_for_slot(slot.id)?;
                }
            }
        }

        Ok(plan)
    }

    /// Retrieves a fully loaded plan: participants, slots and options.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        self.load_plan_with_slots(id, true)
    }

    /// Lists plans, newest first, with their slots loaded.
    pub fn list_plans(&self, filter: &ListPlans) -> Result<Vec<Plan>> {
        let mut query = format!("SELECT {PLAN_COLUMNS} FROM plans");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if !filter.include_archived {
            conditions.push("archived_at IS NULL");
        }

        if let Some(state) = filter.state {
            conditions.push("state = ?");
            params_vec.push(Box::new(state.as_str()));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare plan listing")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut plans = stmt
            .query_map(&params_refs[..], Self::build_plan_from_row)
            .db_context("Failed to list plans")?
            .collect::<rusqlite::Result<Vec<Plan>>>()
            .db_context("Failed to read plans")?;

        for plan in &mut plans {
            plan.participants = self.get_participants(plan.id)?;
            plan.slots = self.get_slots(plan.id)?;
        }

        Ok(plans)
    }

    /// Marks a plan archived. Archiving an archived plan is a no-op.
    pub fn archive_plan(&mut self, id: u64, now: Timestamp) -> Result<()> {
        let changed = self
            .connection
            .execute(ARCHIVE_PLAN_SQL, params![now.as_millisecond(), id as i64])
            .db_context("Failed to archive plan")?;

        if changed == 0 {
            let exists: bool = self
                .connection
                .query_row(CHECK_PLAN_EXISTS_SQL, params![id as i64], |row| row.get(0))
                .db_context("Failed to check plan existence")?;
            if !exists {
                return Err(TallyError::PlanNotFound { id });
            }
        }

        Ok(())
    }

    /// Moves a plan from `expected` to `new`. Returns false, without error,
    /// when the plan is no longer in `expected`.
    pub fn update_plan_state_if(
        &mut self,
        plan_id: u64,
        expected: PlanState,
        new: PlanState,
    ) -> Result<bool> {
        if expected == new {
            return Err(TallyError::invalid_input("state")
                .with_reason(format!("Plan is already {}", new.as_str())));
        }

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![plan_id as i64], |row| row.get(0))
            .db_context("Failed to check plan existence")?;
        if !exists {
            return Err(TallyError::PlanNotFound { id: plan_id });
        }

        let changed = tx
            .execute(
                UPDATE_PLAN_STATE_SQL,
                params![new.as_str(), plan_id as i64, expected.as_str()],
            )
            .db_context("Failed to update plan state")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(changed == 1)
    }

    /// Lists plans that the expired-voting sweep must visit at `now`.
    pub fn list_expired_unfinalized_plans(&self, now: Timestamp) -> Result<Vec<Plan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_EXPIRED_UNFINALIZED_SQL)
            .db_context("Failed to prepare expired plans query")?;

        let mut plans = stmt
            .query_map(params![now.as_millisecond()], Self::build_plan_from_row)
            .db_context("Failed to query expired plans")?
            .collect::<rusqlite::Result<Vec<Plan>>>()
            .db_context("Failed to read expired plans")?;

        for plan in &mut plans {
            plan.participants = self.get_participants(plan.id)?;
        }

        Ok(plans)
    }
}
