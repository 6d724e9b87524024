//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // WAL lets readers proceed while a finalizer holds the write lock
        let _mode: String = self
            .connection
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .db_context("Failed to enable WAL journal mode")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        let has_finalized_at: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('slots') WHERE name = 'finalized_at'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context("Failed to inspect slots table")?;

        if !has_finalized_at {
            self.connection
                .execute("ALTER TABLE slots ADD COLUMN finalized_at INTEGER", [])
                .db_context("Failed to add finalized_at column to slots table")?;
        }

        Ok(())
    }
}
