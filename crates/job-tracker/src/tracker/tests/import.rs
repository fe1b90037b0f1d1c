use super::common::*;
use crate::tracker::error::{TrackerError, ValidationError};
use crate::tracker::import::{ImportOutcome, ImportSession, ImportState};
use crate::tracker::snapshot::Snapshot;

#[test]
fn stage_does_not_touch_the_store() {
    let store = seeded_store();
    let before = store.snapshot();
    let mut session = ImportSession::new();

    let staged = session
        .stage(import_snapshot(), &store)
        .expect("valid import stages");

    assert_eq!(staged.incoming, 2);
    assert_eq!(staged.current, 3);
    assert!(staged.prompt.contains("3 tracked applications"));
    assert!(staged.prompt.contains("2 applications"));
    assert_eq!(store.snapshot(), before);
    assert!(matches!(session.state(), ImportState::Staged(_)));
}

#[test]
fn cancel_discards_and_returns_to_idle() {
    let store = seeded_store();
    let before = store.snapshot().to_json().expect("encodes");
    let mut session = ImportSession::new();
    session.stage(import_snapshot(), &store).expect("stages");

    let outcome = session.cancel().expect("cancel succeeds");

    assert_eq!(outcome, ImportOutcome::Cancelled { discarded: 2 });
    assert_eq!(session.state(), &ImportState::Idle);
    assert_eq!(store.snapshot().to_json().expect("encodes"), before);
}

#[test]
fn confirm_installs_staged_snapshot() {
    let mut store = seeded_store();
    let mut session = ImportSession::new();
    session.stage(import_snapshot(), &store).expect("stages");

    let outcome = session.confirm(&mut store).expect("confirm succeeds");

    assert_eq!(
        outcome,
        ImportOutcome::Committed {
            installed: 2,
            replaced: 3
        }
    );
    assert_eq!(store.snapshot(), import_snapshot());
    assert!(session.pending().is_none());
}

#[test]
fn restaging_replaces_the_pending_import() {
    let mut store = seeded_store();
    let mut session = ImportSession::new();
    session.stage(import_snapshot(), &store).expect("first stage");

    let replacement = Snapshot::new(vec![imported_application("only", &[])]);
    let staged = session
        .stage(replacement.clone(), &store)
        .expect("second stage");
    assert_eq!(staged.incoming, 1);
    assert!(staged.prompt.contains("1 application from"));

    session.confirm(&mut store).expect("confirm");
    assert_eq!(store.snapshot(), replacement);
}

#[test]
fn invalid_candidate_is_rejected_and_clears_previous_stage() {
    let mut store = seeded_store();
    let mut session = ImportSession::new();
    session.stage(import_snapshot(), &store).expect("stages");

    let duplicate = Snapshot::new(vec![
        imported_application("x", &[]),
        imported_application("x", &[]),
    ]);
    assert!(matches!(
        session.stage(duplicate, &store),
        Err(TrackerError::Validation(ValidationError::DuplicateApplicationId(_)))
    ));
    assert!(session.pending().is_none());
    assert_eq!(session.state(), &ImportState::Idle);
    assert!(matches!(
        session.confirm(&mut store),
        Err(TrackerError::NoStagedImport)
    ));
    assert_eq!(store.len(), 3);
}

#[test]
fn discard_empties_the_slot() {
    let store = seeded_store();
    let mut session = ImportSession::new();
    assert!(session.discard().is_none());

    session.stage(import_snapshot(), &store).expect("stages");
    let dropped = session.discard().expect("something was staged");

    assert_eq!(dropped.snapshot(), &import_snapshot());
    assert!(session.pending().is_none());
}

#[test]
fn resolving_without_stage_fails() {
    let mut store = seeded_store();
    let mut session = ImportSession::new();

    assert!(matches!(
        session.confirm(&mut store),
        Err(TrackerError::NoStagedImport)
    ));
    assert!(matches!(session.cancel(), Err(TrackerError::NoStagedImport)));
    assert_eq!(store.len(), 3);
}

#[test]
fn confirm_clears_the_slot_for_a_second_confirm() {
    let mut store = seeded_store();
    let mut session = ImportSession::new();
    session.stage(import_snapshot(), &store).expect("stages");
    session.confirm(&mut store).expect("first confirm");

    assert!(matches!(
        session.confirm(&mut store),
        Err(TrackerError::NoStagedImport)
    ));
}
