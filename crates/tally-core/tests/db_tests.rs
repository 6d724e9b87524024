use jiff::{SignedDuration, Timestamp};
use tally_core::{
    params::{CreatePlan, ListPlans, OptionDraft, SlotDraft},
    Database, Day, Occasion, PlanState, SlotState, TallyError,
};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn now() -> Timestamp {
    "2030-05-01T12:00:00Z".parse().unwrap()
}

fn draft(day: Day, occasion: Occasion, labels: &[&str]) -> SlotDraft {
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

fn params(slots: Vec<SlotDraft>) -> CreatePlan {
    CreatePlan {
        household_id: "household".to_string(),
        notes: Some("Visiting grandparents".to_string()),
        voting_deadline: now() + SignedDuration::from_hours(24),
        participants: vec!["ana".to_string(), "ben".to_string()],
        slots,
    }
}

#[test]
fn test_database_initialization_is_repeatable() {
    let (temp_file, db) = create_test_db();
    drop(db);

    // Reopening runs the schema and migrations again
    let db = Database::new(temp_file.path()).expect("Failed to reopen database");
    assert!(db.list_plans(&ListPlans::default()).unwrap().is_empty());
}

#[test]
fn test_create_and_get_plan() {
    let (_temp_file, mut db) = create_test_db();

    let plan = db
        .create_plan(
            &params(vec![
                draft(Day::Tuesday, Occasion::Lunch, &["Soup", "Wraps"]),
                draft(Day::Monday, Occasion::Dinner, &["Curry"]),
            ]),
            now(),
        )
        .expect("Failed to create plan");

    assert!(plan.id > 0);
    assert_eq!(plan.state, PlanState::Collecting);
    assert_eq!(plan.participants, vec!["ana", "ben"]);
    assert_eq!(plan.notes.as_deref(), Some("Visiting grandparents"));
    assert_eq!(plan.created_at, now());

    // Slots come back ordered by day, then occasion
    assert_eq!(plan.slots.len(), 2);
    assert_eq!(plan.slots[0].key.day, Day::Monday);
    assert_eq!(plan.slots[1].key.day, Day::Tuesday);
    assert!(plan.slots.iter().all(|s| s.state == SlotState::Open));
    assert_eq!(plan.slots[1].options.len(), 2);

    let fetched = db.get_plan(plan.id).unwrap().expect("Plan should exist");
    assert_eq!(fetched, plan);
    assert!(db.get_plan(plan.id + 100).unwrap().is_none());
}

#[test]
fn test_create_plan_rejects_invalid_input() {
    let (_temp_file, mut db) = create_test_db();

    let err = db.create_plan(&params(vec![]), now()).unwrap_err();
    assert!(matches!(err, TallyError::InvalidInput { .. }));

    let err = db
        .create_plan(&params(vec![draft(Day::Monday, Occasion::Brunch, &[])]), now())
        .unwrap_err();
    assert!(matches!(err, TallyError::InvalidInput { .. }));

    let mut dup = params(vec![draft(Day::Monday, Occasion::Brunch, &["Eggs"])]);
    dup.participants.push("ana".to_string());
    assert!(db.create_plan(&dup, now()).is_err());

    assert!(db.list_plans(&ListPlans::default()).unwrap().is_empty());
}

#[test]
fn test_duplicate_keys_keep_first_deadline_override() {
    let (_temp_file, mut db) = create_test_db();
    let early = now() + SignedDuration::from_hours(2);

    let mut first = draft(Day::Friday, Occasion::Supper, &["Fish"]);
    let mut second = draft(Day::Friday, Occasion::Supper, &["Chips"]);
    first.voting_deadline = None;
    second.voting_deadline = Some(early);
    let mut third = draft(Day::Friday, Occasion::Supper, &["Peas"]);
    third.voting_deadline = Some(early + SignedDuration::from_hours(1));

    let plan = db
        .create_plan(&params(vec![first, second, third]), now())
        .unwrap();

    assert_eq!(plan.slots.len(), 1);
    assert_eq!(plan.slots[0].voting_deadline, Some(early));
    assert_eq!(plan.slots[0].options.len(), 3);
}

#[test]
fn test_replace_ballots_supersedes_and_validates() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db
        .create_plan(
            &params(vec![
                draft(Day::Monday, Occasion::Dinner, &["A", "B"]),
                draft(Day::Tuesday, Occasion::Dinner, &["C"]),
            ]),
            now(),
        )
        .unwrap();
    let monday = &plan.slots[0];
    let tuesday = &plan.slots[1];
    let (a, b) = (monday.options[0].id, monday.options[1].id);

    let ballots = db
        .replace_ballots(monday.id, "ana", &[(a, 0), (b, 1)], now())
        .unwrap();
    assert_eq!(ballots.len(), 2);

    // A ballot in another slot is unaffected by re-voting here
    db.replace_ballots(tuesday.id, "ana", &[(tuesday.options[0].id, 0)], now())
        .unwrap();
    db.replace_ballots(monday.id, "ana", &[(b, 0)], now())
        .unwrap();

    let monday_ballots = db.get_ballots_for_slot(monday.id).unwrap();
    assert_eq!(monday_ballots.len(), 1);
    assert_eq!(monday_ballots[0].option_id, b);
    assert_eq!(db.get_ballots_for_slot(tuesday.id).unwrap().len(), 1);

    let err = db
        .replace_ballots(monday.id, "ben", &[(tuesday.options[0].id, 0)], now())
        .unwrap_err();
    assert!(matches!(err, TallyError::UnknownOption { .. }));

    let err = db.replace_ballots(monday.id, "ben", &[], now()).unwrap_err();
    assert!(matches!(err, TallyError::NoRankings));

    let err = db.replace_ballots(999, "ben", &[(a, 0)], now()).unwrap_err();
    assert!(matches!(err, TallyError::SlotNotFound { id: 999 }));
}

#[test]
fn test_conditional_slot_update() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db
        .create_plan(&params(vec![draft(Day::Sunday, Occasion::Brunch, &["A", "B"])]), now())
        .unwrap();
    let slot = &plan.slots[0];
    let winner = slot.options[1].id;

    assert!(db
        .update_slot_state_if(slot.id, SlotState::Open, SlotState::Closed, None, false, now())
        .unwrap());

    // A second writer still expecting Open loses without error
    assert!(!db
        .update_slot_state_if(slot.id, SlotState::Open, SlotState::Finalized, Some(winner), false, now())
        .unwrap());

    // Closed slots refuse new ballots
    let err = db
        .replace_ballots(slot.id, "ana", &[(winner, 0)], now())
        .unwrap_err();
    assert!(matches!(err, TallyError::VotingClosed { .. }));

    assert!(db
        .update_slot_state_if(slot.id, SlotState::Closed, SlotState::Finalized, Some(winner), true, now())
        .unwrap());

    let stored = db.get_slot(slot.id).unwrap().unwrap();
    assert_eq!(stored.state, SlotState::Finalized);
    assert_eq!(stored.winner, Some(winner));
    assert!(stored.tie_broken);
    assert_eq!(stored.finalized_at, Some(now()));

    let options = db.get_options_for_slot(slot.id).unwrap();
    assert!(options.iter().find(|o| o.id == winner).unwrap().chosen);
    assert!(!options.iter().find(|o| o.id != winner).unwrap().chosen);
}

#[test]
fn test_conditional_slot_update_rejects_bad_transitions() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db
        .create_plan(&params(vec![draft(Day::Sunday, Occasion::Brunch, &["A"])]), now())
        .unwrap();
    let slot_id = plan.slots[0].id;

    let err = db
        .update_slot_state_if(slot_id, SlotState::Open, SlotState::Finalized, None, false, now())
        .unwrap_err();
    assert!(matches!(err, TallyError::InvalidInput { ref field, .. } if field == "winner"));

    let err = db
        .update_slot_state_if(slot_id, SlotState::Finalized, SlotState::Open, None, false, now())
        .unwrap_err();
    assert!(matches!(err, TallyError::InvalidInput { ref field, .. } if field == "state"));

    let err = db
        .update_slot_state_if(404, SlotState::Open, SlotState::Closed, None, false, now())
        .unwrap_err();
    assert!(matches!(err, TallyError::SlotNotFound { id: 404 }));
}

#[test]
fn test_conditional_plan_update() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db
        .create_plan(&params(vec![draft(Day::Sunday, Occasion::Brunch, &["A"])]), now())
        .unwrap();

    assert!(db
        .update_plan_state_if(plan.id, PlanState::Collecting, PlanState::Complete)
        .unwrap());
    assert!(!db
        .update_plan_state_if(plan.id, PlanState::Collecting, PlanState::PartiallyFinalized)
        .unwrap());
    assert_eq!(db.load_plan(plan.id).unwrap().unwrap().state, PlanState::Complete);

    let err = db
        .update_plan_state_if(77, PlanState::Collecting, PlanState::Complete)
        .unwrap_err();
    assert!(matches!(err, TallyError::PlanNotFound { id: 77 }));
}

#[test]
fn test_list_expired_unfinalized_plans() {
    let (_temp_file, mut db) = create_test_db();
    let plan_deadline = now() + SignedDuration::from_hours(24);

    let mut early_slot = draft(Day::Monday, Occasion::Lunch, &["A"]);
    early_slot.voting_deadline = Some(now() + SignedDuration::from_hours(1));
    let with_override = db
        .create_plan(
            &params(vec![early_slot, draft(Day::Monday, Occasion::Dinner, &["B"])]),
            now(),
        )
        .unwrap();
    let plain = db
        .create_plan(&params(vec![draft(Day::Monday, Occasion::Lunch, &["C"])]), now())
        .unwrap();
    let archived = db
        .create_plan(&params(vec![draft(Day::Monday, Occasion::Lunch, &["D"])]), now())
        .unwrap();
    db.archive_plan(archived.id, now()).unwrap();

    let ids = |plans: Vec<tally_core::Plan>| plans.into_iter().map(|p| p.id).collect::<Vec<_>>();

    assert!(db.list_expired_unfinalized_plans(now()).unwrap().is_empty());

    let after_override = now() + SignedDuration::from_hours(2);
    assert_eq!(
        ids(db.list_expired_unfinalized_plans(after_override).unwrap()),
        vec![with_override.id]
    );

    // The plan deadline instant counts as elapsed
    assert_eq!(
        ids(db.list_expired_unfinalized_plans(plan_deadline).unwrap()),
        vec![with_override.id, plain.id]
    );

    db.update_plan_state_if(plain.id, PlanState::Collecting, PlanState::Complete)
        .unwrap();
    assert_eq!(
        ids(db.list_expired_unfinalized_plans(plan_deadline).unwrap()),
        vec![with_override.id]
    );
}

#[test]
fn test_archive_plan_is_idempotent() {
    let (_temp_file, mut db) = create_test_db();
    let plan = db
        .create_plan(&params(vec![draft(Day::Monday, Occasion::Lunch, &["A"])]), now())
        .unwrap();

    db.archive_plan(plan.id, now()).unwrap();
    db.archive_plan(plan.id, now() + SignedDuration::from_hours(1))
        .unwrap();

    let stored = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(stored.archived_at, Some(now()));

    assert!(db.list_plans(&ListPlans::default()).unwrap().is_empty());
    let all = db
        .list_plans(&ListPlans {
            include_archived: true,
            state: None,
        })
        .unwrap();
    assert_eq!(all.len(), 1);

    assert!(matches!(
        db.archive_plan(500, now()).unwrap_err(),
        TallyError::PlanNotFound { id: 500 }
    ));
}

#[test]
fn test_list_plans_filters_by_state() {
    let (_temp_file, mut db) = create_test_db();
    let first = db
        .create_plan(&params(vec![draft(Day::Monday, Occasion::Lunch, &["A"])]), now())
        .unwrap();
    let second = db
        .create_plan(&params(vec![draft(Day::Monday, Occasion::Lunch, &["B"])]), now())
        .unwrap();
    db.update_plan_state_if(first.id, PlanState::Collecting, PlanState::Complete)
        .unwrap();

    let collecting = db
        .list_plans(&ListPlans {
            include_archived: false,
            state: Some(PlanState::Collecting),
        })
        .unwrap();
    assert_eq!(collecting.len(), 1);
    assert_eq!(collecting[0].id, second.id);

    // Newest first
    let all = db.list_plans(&ListPlans::default()).unwrap();
    assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second.id, first.id]);
}
