//! Database operations and SQLite management for plans, slots and ballots.
//!
//! This module provides the low-level, synchronous storage operations that the
//! [`SqliteGateway`](crate::gateway::SqliteGateway) runs on blocking threads.
//! Every state transition is a conditional `UPDATE ... WHERE state = ?` inside
//! an `IMMEDIATE` transaction, so two connections racing on the same row see
//! exactly one winner.

use std::{path::Path, str::FromStr, time::Duration};

use jiff::Timestamp;
use rusqlite::{types::Type, Connection, Row};

use crate::error::{DatabaseResultExt, Result};

pub mod ballot_queries;
pub mod migrations;
pub mod plan_queries;
pub mod slot_queries;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Reads a Unix-millisecond column as a timestamp.
pub(crate) fn timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<Timestamp> {
    let millis: i64 = row.get(idx)?;
    Timestamp::from_millisecond(millis)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

/// Reads a nullable Unix-millisecond column as a timestamp.
pub(crate) fn optional_timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<Option<Timestamp>> {
    let millis: Option<i64> = row.get(idx)?;
    millis
        .map(|m| {
            Timestamp::from_millisecond(m).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
            })
        })
        .transpose()
}

/// Reads a text column through the type's `FromStr` implementation.
pub(crate) fn parsed_at<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}
