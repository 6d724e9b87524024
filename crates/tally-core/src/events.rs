//! Notifications of decision state changes.
//!
//! The engine publishes an [`Event`] after winning a conditional write and
//! never retries a failed publish. Delivery beyond that is up to the
//! [`EventEmitter`] implementation.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::{Result, TallyError};

/// A decision state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A slot was finalized with a winning option.
    SlotFinalized {
        plan_id: u64,
        slot_id: u64,
        winner: u64,
        tie_broken: bool,
    },
    /// Every slot of the plan is finalized.
    PlanDecided { plan_id: u64 },
}

/// Best-effort publisher of [`Event`]s.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<()>;
}

/// Writes each event to the log as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmitter;

#[async_trait]
impl EventEmitter for LogEmitter {
    async fn publish(&self, event: &Event) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        log::info!("event: {payload}");
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmitter;

#[async_trait]
impl EventEmitter for NoopEmitter {
    async fn publish(&self, _event: &Event) -> Result<()> {
        Ok(())
    }
}

/// Fans events out to in-process subscribers over a tokio broadcast channel.
///
/// Publishing with no live subscriber succeeds. After [`close`](Self::close)
/// subscribers drain what was already sent and then observe the channel as
/// closed, and further publishes fail.
#[derive(Debug)]
pub struct BroadcastEmitter {
    sender: RwLock<Option<broadcast::Sender<Event>>>,
}

impl BroadcastEmitter {
    /// Creates an emitter whose subscribers buffer up to `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: RwLock::new(Some(sender)),
        }
    }

    /// Subscribes to events published from now on. Returns `None` once the
    /// emitter is closed.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<Event>> {
        let guard = self.sender.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(broadcast::Sender::subscribe)
    }

    /// Closes the channel.
    pub fn close(&self) {
        let mut guard = self.sender.write().unwrap_or_else(|e| e.into_inner());
        guard.take();
    }
}

#[async_trait]
impl EventEmitter for BroadcastEmitter {
    async fn publish(&self, event: &Event) -> Result<()> {
        let guard = self.sender.read().unwrap_or_else(|e| e.into_inner());
        let sender = guard.as_ref().ok_or_else(|| TallyError::Publish {
            message: "broadcast emitter is closed".to_string(),
        })?;

        if sender.send(event.clone()).is_err() {
            log::debug!("No subscribers for {event:?}");
        }
        Ok(())
    }
}
