//! Ballot queries and the superseding ballot write.

use std::collections::HashSet;

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::{parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, TallyError},
    models::{Ballot, SlotState},
};

const SELECT_BALLOTS_FOR_SLOT_SQL: &str = "SELECT b.id, b.participant_id, b.option_id, b.rank, b.created_at FROM ballots b \
     JOIN options o ON o.id = b.option_id \
     JOIN slots s ON s.plan_id = o.plan_id AND s.day = o.day AND s.occasion = o.occasion \
     WHERE s.id = ?1 ORDER BY b.id";
const SELECT_SLOT_STATE_SQL: &str = "SELECT state FROM slots WHERE id = ?1";
const SELECT_SLOT_OPTION_IDS_SQL: &str = "SELECT o.id FROM options o \
     JOIN slots s ON s.plan_id = o.plan_id AND s.day = o.day AND s.occasion = o.occasion \
     WHERE s.id = ?1";
const DELETE_PARTICIPANT_BALLOTS_SQL: &str = "DELETE FROM ballots WHERE participant_id = ?1 AND option_id IN ( \
         SELECT o.id FROM options o \
         JOIN slots s ON s.plan_id = o.plan_id AND s.day = o.day AND s.occasion = o.occasion \
         WHERE s.id = ?2)";
const INSERT_BALLOT_SQL: &str =
    "INSERT INTO ballots (participant_id, option_id, rank, created_at) VALUES (?1, ?2, ?3, ?4)";

impl super::Database {
    fn build_ballot_from_row(row: &Row) -> rusqlite::Result<Ballot> {
        Ok(Ballot {
            id: row.get::<_, i64>(0)? as u64,
            participant_id: row.get(1)?,
            option_id: row.get::<_, i64>(2)? as u64,
            rank: row.get(3)?,
            created_at: timestamp_at(row, 4)?,
        })
    }

    /// Retrieves every ballot cast for options competing in the slot.
    pub fn get_ballots_for_slot(&self, slot_id: u64) -> Result<Vec<Ballot>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_BALLOTS_FOR_SLOT_SQL)
            .db_context("Failed to prepare ballots query")?;

        let ballots = stmt
            .query_map(params![slot_id as i64], Self::build_ballot_from_row)
            .db_context("Failed to query ballots")?
            .collect::<rusqlite::Result<Vec<Ballot>>>()
            .db_context("Failed to read ballots")?;

        Ok(ballots)
    }

    /// Replaces the participant's ballots for a slot with `rankings`.
    ///
    /// Runs in one `IMMEDIATE` transaction that first re-checks the slot is
    /// still open, so a ballot can never land on a slot that was closed or
    /// finalized after the caller's eligibility check.
    pub fn replace_ballots(
        &mut self,
        slot_id: u64,
        participant_id: &str,
        rankings: &[(u64, u32)],
        now: Timestamp,
    ) -> Result<Vec<Ballot>> {
        if rankings.is_empty() {
            return Err(TallyError::NoRankings);
        }

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let state = tx
            .query_row(SELECT_SLOT_STATE_SQL, params![slot_id as i64], |row| {
                parsed_at::<SlotState>(row, 0)
            })
            .optional()
            .db_context("Failed to query slot state")?;

        match state {
            None => return Err(TallyError::SlotNotFound { id: slot_id }),
            Some(SlotState::Open) => {}
            Some(_) => return Err(TallyError::VotingClosed { slot_id }),
        }

        let valid_ids: HashSet<u64> = {
            let mut stmt = tx
                .prepare(SELECT_SLOT_OPTION_IDS_SQL)
                .db_context("Failed to prepare option lookup")?;
            let ids = stmt
                .query_map(params![slot_id as i64], |row| row.get::<_, i64>(0))
                .db_context("Failed to query slot options")?
                .collect::<rusqlite::Result<Vec<i64>>>()
                .db_context("Failed to read slot options")?;
            ids.into_iter().map(|id| id as u64).collect()
        };

        if let Some((option_id, _)) = rankings.iter().find(|(id, _)| !valid_ids.contains(id)) {
            return Err(TallyError::UnknownOption {
                option_id: *option_id,
                slot_id,
            });
        }

        tx.execute(
            DELETE_PARTICIPANT_BALLOTS_SQL,
            params![participant_id, slot_id as i64],
        )
        .db_context("Failed to remove superseded ballots")?;

        let mut ballots = Vec::with_capacity(rankings.len());
        for (option_id, rank) in rankings {
            tx.execute(
                INSERT_BALLOT_SQL,
                params![participant_id, *option_id as i64, rank, now.as_millisecond()],
            )
            .db_context("Failed to insert ballot")?;

            ballots.push(Ballot {
                id: tx.last_insert_rowid() as u64,
                participant_id: participant_id.to_string(),
                option_id: *option_id,
                rank: *rank,
                created_at: now,
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ballots)
    }
}
