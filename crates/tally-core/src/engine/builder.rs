//! Builder for creating and configuring Engine instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::Engine;
use crate::{
    clock::{Clock, SystemClock},
    error::{Result, TallyError},
    events::{EventEmitter, LogEmitter},
    gateway::{PersistenceGateway, SqliteGateway},
};

/// Builder for creating and configuring Engine instances.
///
/// Unset collaborators default to a [`SqliteGateway`] at the XDG data path,
/// a [`LogEmitter`] and the [`SystemClock`].
#[derive(Default)]
pub struct EngineBuilder {
    database_path: Option<PathBuf>,
    gateway: Option<Arc<dyn PersistenceGateway>>,
    emitter: Option<Arc<dyn EventEmitter>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/tally/tally.db` or `~/.local/share/tally/tally.db`.
    /// Ignored when a gateway is supplied with [`with_gateway`](Self::with_gateway).
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses the given persistence gateway instead of SQLite.
    pub fn with_gateway(mut self, gateway: Arc<dyn PersistenceGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Publishes events through `emitter`.
    pub fn with_emitter(mut self, emitter: Arc<dyn EventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Reads the current time from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the configured engine.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::XdgDirectory` if no default path can be resolved,
    /// `TallyError::FileSystem` if the database directory cannot be created
    /// and `TallyError::Database` if schema initialization fails.
    pub async fn build(self) -> Result<Engine> {
        let gateway: Arc<dyn PersistenceGateway> = match self.gateway {
            Some(gateway) => gateway,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };
                log::debug!("Opening database at {}", db_path.display());
                Arc::new(SqliteGateway::open(db_path).await?)
            }
        };

        Ok(Engine::new(
            gateway,
            self.emitter.unwrap_or_else(|| Arc::new(LogEmitter)),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("tally")
            .place_data_file("tally.db")
            .map_err(|e| TallyError::XdgDirectory(e.to_string()))
    }
}
