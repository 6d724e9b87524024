#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use tally_core::{
    clock::ManualClock,
    events::{Event, EventEmitter},
    params::{CreatePlan, OptionDraft, SlotDraft},
    Day, Engine, EngineBuilder, Occasion, Plan, TallyError,
};
use tempfile::TempDir;

pub const PARTICIPANTS: [&str; 4] = ["ana", "ben", "cy", "dee"];

/// Collects every published event.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<Event>>,
}

impl RecordingEmitter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventEmitter for RecordingEmitter {
    async fn publish(&self, event: &Event) -> tally_core::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Fails every publish.
#[derive(Debug, Default)]
pub struct FailingEmitter;

#[async_trait]
impl EventEmitter for FailingEmitter {
    async fn publish(&self, _event: &Event) -> tally_core::Result<()> {
        Err(TallyError::Publish {
            message: "subscriber unreachable".to_string(),
        })
    }
}

/// An engine over a fresh database with a manual clock.
pub struct TestEnv {
    pub _temp_dir: TempDir,
    pub engine: Engine,
    pub clock: Arc<ManualClock>,
    pub events: Arc<RecordingEmitter>,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let clock = Arc::new(ManualClock::new(start()));
        let events = Arc::new(RecordingEmitter::default());
        let engine = EngineBuilder::new()
            .with_database_path(Some(&db_path))
            .with_clock(clock.clone())
            .with_emitter(events.clone())
            .build()
            .await
            .expect("Failed to create engine");

        Self {
            _temp_dir: temp_dir,
            engine,
            clock,
            events,
        }
    }

    /// Moves the clock past the default plan deadline.
    pub fn pass_deadline(&self) {
        self.clock.set(deadline() + SignedDuration::from_secs(1));
    }
}

pub fn start() -> Timestamp {
    "2030-01-06T08:00:00Z".parse().unwrap()
}

pub fn deadline() -> Timestamp {
    start() + SignedDuration::from_hours(10)
}

pub fn slot(day: Day, occasion: Occasion, labels: &[&str]) -> SlotDraft {
    SlotDraft {
        day,
        occasion,
        voting_deadline: None,
        options: labels
            .iter()
            .map(|label| OptionDraft {
                label: (*label).to_string(),
                notes: None,
            })
            .collect(),
    }
}

pub fn plan_params(slots: Vec<SlotDraft>) -> CreatePlan {
    CreatePlan {
        household_id: "household-1".to_string(),
        notes: None,
        voting_deadline: deadline(),
        participants: PARTICIPANTS.iter().map(|p| (*p).to_string()).collect(),
        slots,
    }
}

/// Monday dinner with A, B, C and Tuesday dinner with D, E, F.
pub async fn two_slot_plan(engine: &Engine) -> Plan {
    engine
        .create_plan(&plan_params(vec![
            slot(Day::Monday, Occasion::Dinner, &["A", "B", "C"]),
            slot(Day::Tuesday, Occasion::Dinner, &["D", "E", "F"]),
        ]))
        .await
        .expect("Failed to create plan")
}

/// Option IDs of a slot in creation order.
pub fn option_ids(plan: &Plan, slot_index: usize) -> Vec<u64> {
    plan.slots[slot_index].options.iter().map(|o| o.id).collect()
}

/// Rankings that give the first, second and third option scores of 3, 4
/// and 5 across the four participants.
pub fn scoring_rankings(ids: &[u64]) -> [Vec<u64>; 4] {
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    [
        vec![a, b, c],
        vec![a, c, b],
        vec![b, a, c],
        vec![c, b, a],
    ]
}
