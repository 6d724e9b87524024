//! Slot and option queries, and the conditional slot state transition.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::{optional_timestamp_at, parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, TallyError},
    models::{Day, Occasion, PlanOption, Slot, SlotKey, SlotState},
};

const SLOT_COLUMNS: &str =
    "id, plan_id, day, occasion, voting_deadline, state, winner_option_id, tie_broken, finalized_at";
const SELECT_OPTIONS_FOR_SLOT_SQL: &str = "SELECT o.id, o.plan_id, o.day, o.occasion, o.label, o.notes, o.chosen, o.created_at FROM options o \
     JOIN slots s ON s.plan_id = o.plan_id AND s.day = o.day AND s.occasion = o.occasion \
     WHERE s.id = ?1 ORDER BY o.id";
const SELECT_SLOT_STATE_SQL: &str = "SELECT state FROM slots WHERE id = ?1";
const UPDATE_SLOT_CLOSED_SQL: &str = "UPDATE slots SET state = ?1 WHERE id = ?2 AND state = ?3";
const UPDATE_SLOT_FINALIZED_SQL: &str = "UPDATE slots SET state = ?1, winner_option_id = ?2, tie_broken = ?3, finalized_at = ?4 WHERE id = ?5 AND state = ?6";
const MARK_OPTION_CHOSEN_SQL: &str = "UPDATE options SET chosen = 1 WHERE id = ?1 AND id IN ( \
         SELECT o.id FROM options o \
         JOIN slots s ON s.plan_id = o.plan_id AND s.day = o.day AND s.occasion = o.occasion \
         WHERE s.id = ?2)";

impl super::Database {
    /// Builds a slot (without options) from a `SLOT_COLUMNS` row.
    fn build_slot_from_row(row: &Row) -> rusqlite::Result<Slot> {
        Ok(Slot {
            id: row.get::<_, i64>(0)? as u64,
            plan_id: row.get::<_, i64>(1)? as u64,
            key: SlotKey::new(parsed_at::<Day>(row, 2)?, parsed_at::<Occasion>(row, 3)?),
            voting_deadline: optional_timestamp_at(row, 4)?,
            state: parsed_at::<SlotState>(row, 5)?,
            winner: row.get::<_, Option<i64>>(6)?.map(|id| id as u64),
            tie_broken: row.get(7)?,
            finalized_at: optional_timestamp_at(row, 8)?,
            options: Vec::new(),
        })
    }

    fn build_option_from_row(row: &Row) -> rusqlite::Result<PlanOption> {
        Ok(PlanOption {
            id: row.get::<_, i64>(0)? as u64,
            plan_id: row.get::<_, i64>(1)? as u64,
            key: SlotKey::new(parsed_at::<Day>(row, 2)?, parsed_at::<Occasion>(row, 3)?),
            label: row.get(4)?,
            notes: row.get(5)?,
            chosen: row.get(6)?,
            created_at: timestamp_at(row, 7)?,
        })
    }

    /// Retrieves a slot by ID, without its options.
    pub fn get_slot(&self, id: u64) -> Result<Option<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id as i64], Self::build_slot_from_row)
            .optional()
            .db_context("Failed to query slot")
    }

    /// Retrieves every slot of a plan ordered by day, then occasion.
    pub fn get_slots(&self, plan_id: u64) -> Result<Vec<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots WHERE plan_id = ?1 ORDER BY id");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare slots query")?;

        let mut slots = stmt
            .query_map(params![plan_id as i64], Self::build_slot_from_row)
            .db_context("Failed to query slots")?
            .collect::<rusqlite::Result<Vec<Slot>>>()
            .db_context("Failed to read slots")?;

        slots.sort_by_key(|s| (s.key, s.id));
        Ok(slots)
    }

    /// Retrieves every option whose key matches the slot's key.
    pub fn get_options_for_slot(&self, slot_id: u64) -> Result<Vec<PlanOption>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_OPTIONS_FOR_SLOT_SQL)
            .db_context("Failed to prepare options query")?;

        let options = stmt
            .query_map(params![slot_id as i64], Self::build_option_from_row)
            .db_context("Failed to query options")?
            .collect::<rusqlite::Result<Vec<PlanOption>>>()
            .db_context("Failed to read options")?;

        Ok(options)
    }

    /// Moves a slot from `expected` to `new`, recording the winner when `new`
    /// is `Finalized`. Returns false, without error, when the slot is no longer
    /// in `expected`; in that case nothing is written.
    pub fn update_slot_state_if(
        &mut self,
        slot_id: u64,
        expected: SlotState,
        new: SlotState,
        winner: Option<u64>,
        tie_broken: bool,
        now: Timestamp,
    ) -> Result<bool> {
        if !expected.can_transition_to(new) {
            return Err(TallyError::invalid_input("state").with_reason(format!(
                "Slot cannot move from {} to {}",
                expected.as_str(),
                new.as_str()
            )));
        }

        let winner = match (new, winner) {
            (SlotState::Finalized, Some(id)) => Some(id),
            (SlotState::Finalized, None) => {
                return Err(TallyError::invalid_input("winner")
                    .with_reason("A finalized slot requires a winning option"));
            }
            (_, Some(_)) => {
                return Err(TallyError::invalid_input("winner")
                    .with_reason("Only a finalized slot can record a winner"));
            }
            (_, None) => None,
        };

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let current: Option<String> = tx
            .query_row(SELECT_SLOT_STATE_SQL, params![slot_id as i64], |row| row.get(0))
            .optional()
            .db_context("Failed to query slot state")?;
        if current.is_none() {
            return Err(TallyError::SlotNotFound { id: slot_id });
        }

        let changed = match winner {
            Some(option_id) => tx
                .execute(
                    UPDATE_SLOT_FINALIZED_SQL,
                    params![
                        new.as_str(),
                        option_id as i64,
                        tie_broken,
                        now.as_millisecond(),
                        slot_id as i64,
                        expected.as_str()
                    ],
                )
                .db_context("Failed to finalize slot")?,
            None => tx
                .execute(
                    UPDATE_SLOT_CLOSED_SQL,
                    params![new.as_str(), slot_id as i64, expected.as_str()],
                )
                .db_context("Failed to update slot state")?,
        };

        if changed == 0 {
            // Lost the race; the transaction rolls back on drop
            return Ok(false);
        }

        if let Some(option_id) = winner {
            let marked = tx
                .execute(MARK_OPTION_CHOSEN_SQL, params![option_id as i64, slot_id as i64])
                .db_context("Failed to mark winning option")?;
            if marked == 0 {
                return Err(TallyError::UnknownOption { option_id, slot_id });
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(true)
    }
}
