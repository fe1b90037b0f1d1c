use std::sync::Arc;

use super::common::*;
use crate::tracker::domain::{ApplicationId, JobStatus};
use crate::tracker::error::{TrackerError, ValidationError};
use crate::tracker::import::ImportOutcome;
use crate::tracker::persistence::PersistenceError;
use crate::tracker::service::JobTrackerService;
use crate::tracker::snapshot::{Snapshot, EXPORT_FILE_NAME};
use crate::tracker::STORAGE_KEY;

#[test]
fn open_hydrates_from_persisted_snapshot() {
    let persistence = MemoryPersistence::with_snapshot(&import_snapshot());
    let service =
        JobTrackerService::open(Arc::new(persistence), STORAGE_KEY).expect("hydrates");
    assert_eq!(service.snapshot(), import_snapshot());
    assert_eq!(service.storage_key(), STORAGE_KEY);
}

#[test]
fn open_rejects_persisted_duplicates() {
    let duplicate = Snapshot::new(vec![
        imported_application("same", &[]),
        imported_application("same", &[]),
    ]);
    let persistence = MemoryPersistence::with_snapshot(&duplicate);
    match JobTrackerService::open(Arc::new(persistence), STORAGE_KEY) {
        Err(PersistenceError::Decode { key, source }) => {
            assert_eq!(key, STORAGE_KEY);
            assert!(matches!(
                source,
                TrackerError::Validation(ValidationError::DuplicateApplicationId(_))
            ));
        }
        Err(other) => panic!("expected decode error, got {other:?}"),
        Ok(_) => panic!("expected decode error"),
    }
}

#[test]
fn every_mutation_emits_a_snapshot() {
    let (mut service, persistence) = build_service();

    let application = service
        .add(draft("Acme", JobStatus::Applied, date(2024, 1, 1)))
        .expect("added");
    let task = service
        .add_task(&application.id, "Follow up", None)
        .expect("task added");
    service
        .toggle_task(&application.id, &task.id)
        .expect("toggled");
    assert_eq!(persistence.save_count(), 3);

    let stored = persistence.stored().expect("snapshot saved");
    let restored = Snapshot::from_json(&stored).expect("stored snapshot parses");
    assert_eq!(restored, service.snapshot());
    assert!(restored.applications()[0].tasks[0].completed);
}

#[test]
fn failed_commands_do_not_emit() {
    let (mut service, persistence) = build_service();
    assert!(service.add_task(&ApplicationId::from("job1"), "Call", None).is_err());
    assert!(service.remove(&ApplicationId::from("job1")).is_err());
    assert_eq!(persistence.save_count(), 0);
}

#[test]
fn save_failures_do_not_roll_back() {
    let mut service =
        JobTrackerService::open(Arc::new(ReadOnlyPersistence), STORAGE_KEY).expect("opens");
    let application = service
        .add(draft("Acme", JobStatus::Applied, date(2024, 1, 1)))
        .expect("add still succeeds");
    assert_eq!(service.store().get(&application.id), Some(&application));
}

#[test]
fn import_json_parse_errors_leave_everything_untouched() {
    let (mut service, persistence) = build_service();
    service
        .add(draft("Acme", JobStatus::Applied, date(2024, 1, 1)))
        .expect("added");
    let before = service.snapshot();

    assert!(matches!(
        service.stage_import_json("{ not json"),
        Err(TrackerError::Parse(_))
    ));
    assert!(service.pending_import().is_none());
    assert_eq!(service.snapshot(), before);
    assert_eq!(persistence.save_count(), 1);
}

#[test]
fn failed_restage_leaves_nothing_to_confirm() {
    let (mut service, persistence) = build_service();
    let application = service
        .add(draft("Acme", JobStatus::Applied, date(2024, 1, 1)))
        .expect("added");
    service
        .stage_import(import_snapshot())
        .expect("first file stages");

    assert!(matches!(
        service.stage_import_json("{ broken"),
        Err(TrackerError::Parse(_))
    ));
    assert!(service.pending_import().is_none());
    assert!(matches!(
        service.confirm_import(),
        Err(TrackerError::NoStagedImport)
    ));
    assert_eq!(ids_of(&service), vec![application.id.to_string()]);
    assert_eq!(persistence.save_count(), 1);
}

fn ids_of(service: &JobTrackerService<MemoryPersistence>) -> Vec<String> {
    service
        .store()
        .applications()
        .iter()
        .map(|application| application.id.to_string())
        .collect()
}

#[test]
fn export_then_import_round_trips() {
    let (mut source, _) = build_service();
    let application = source
        .add(draft_with_tasks("Acme", &["Research", "Apply"]))
        .expect("added");
    source
        .add_task(&application.id, "Follow up", Some(date(2024, 3, 8)))
        .expect("task added");
    let export = source.export_file().expect("exports");
    assert_eq!(export.file_name, EXPORT_FILE_NAME);
    assert!(export.contents.starts_with("[\n  {\n    \"id\""));

    let (mut target, persistence) = build_service();
    let staged = target.stage_import_json(&export.contents).expect("stages");
    assert_eq!(staged.incoming, 1);
    assert_eq!(persistence.save_count(), 0, "staging must not persist");

    let outcome = target.confirm_import().expect("confirms");
    assert_eq!(
        outcome,
        ImportOutcome::Committed {
            installed: 1,
            replaced: 0
        }
    );
    assert_eq!(target.snapshot(), source.snapshot());
    assert_eq!(persistence.save_count(), 1);
    assert_eq!(persistence.stored().as_deref(), Some(export.contents.as_str()));
}

#[test]
fn cancel_import_does_not_persist() {
    let (mut service, persistence) = build_service();
    service.stage_import(import_snapshot()).expect("stages");
    let outcome = service.cancel_import().expect("cancels");
    assert_eq!(outcome, ImportOutcome::Cancelled { discarded: 2 });
    assert!(service.store().is_empty());
    assert_eq!(persistence.save_count(), 0);
}

#[test]
fn dashboard_reads_current_store() {
    let (mut service, _) = build_service();
    let application = service
        .add(draft("Acme", JobStatus::Interviewing, date(2024, 5, 1)))
        .expect("added");
    service
        .add_task(&application.id, "Prep system design", Some(date(2024, 5, 16)))
        .expect("task added");

    let summary = service.dashboard(date(2024, 5, 15));
    assert_eq!(summary.total, 1);
    assert_eq!(summary.tasks_due_this_week.len(), 1);
    assert_eq!(
        summary.last_applied.map(|application| application.id.clone()),
        Some(application.id)
    );
}
