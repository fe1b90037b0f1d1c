use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::tracker::domain::{
    Application, ApplicationDraft, ApplicationId, JobStatus, Task, TaskDraft, TaskId,
};
use crate::tracker::persistence::{PersistenceError, SnapshotPersistence};
use crate::tracker::service::JobTrackerService;
use crate::tracker::snapshot::Snapshot;
use crate::tracker::store::ApplicationStore;
use crate::tracker::STORAGE_KEY;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn draft(company: &str, status: JobStatus, applied: NaiveDate) -> ApplicationDraft {
    ApplicationDraft {
        company: company.to_string(),
        position: "Backend Engineer".to_string(),
        status,
        date_applied: applied,
        notes: String::new(),
        tasks: Vec::new(),
    }
}

pub(super) fn draft_with_tasks(company: &str, tasks: &[&str]) -> ApplicationDraft {
    let mut draft = draft(company, JobStatus::Applied, date(2024, 3, 1));
    draft.tasks = tasks
        .iter()
        .map(|text| TaskDraft {
            text: text.to_string(),
            due_date: None,
            completed: false,
        })
        .collect();
    draft
}

/// Store with three applications, two of them sharing a date.
pub(super) fn seeded_store() -> ApplicationStore {
    let mut store = ApplicationStore::new();
    store
        .add(draft("Acme", JobStatus::Applied, date(2024, 1, 1)))
        .expect("acme added");
    store
        .add(draft("Globex", JobStatus::Interviewing, date(2024, 2, 10)))
        .expect("globex added");
    store
        .add(draft("Initech", JobStatus::Applied, date(2024, 1, 1)))
        .expect("initech added");
    store
}

pub(super) fn imported_application(id: &str, task_ids: &[&str]) -> Application {
    Application {
        id: ApplicationId::from(id),
        company: format!("Imported {id}"),
        position: "Platform Engineer".to_string(),
        status: JobStatus::Offer,
        date_applied: date(2023, 11, 20),
        notes: "from backup".to_string(),
        tasks: task_ids
            .iter()
            .map(|task_id| Task {
                id: TaskId::from(*task_id),
                text: format!("task {task_id}"),
                due_date: Some(date(2023, 12, 1)),
                completed: false,
            })
            .collect(),
    }
}

pub(super) fn import_snapshot() -> Snapshot {
    Snapshot::new(vec![
        imported_application("1700000000001", &["t1", "t2"]),
        imported_application("1700000000002", &[]),
    ])
}

pub(super) fn ids(applications: &[&Application]) -> Vec<String> {
    applications
        .iter()
        .map(|application| application.id.0.clone())
        .collect()
}

/// Keeps saved snapshots as JSON strings, like the browser key/value store would.
#[derive(Default, Clone)]
pub(super) struct MemoryPersistence {
    entries: Arc<Mutex<HashMap<String, String>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryPersistence {
    pub(super) fn with_snapshot(snapshot: &Snapshot) -> Self {
        let persistence = Self::default();
        persistence
            .entries
            .lock()
            .expect("persistence mutex poisoned")
            .insert(
                STORAGE_KEY.to_string(),
                snapshot.to_json().expect("snapshot encodes"),
            );
        persistence
    }

    pub(super) fn stored(&self) -> Option<String> {
        self.entries
            .lock()
            .expect("persistence mutex poisoned")
            .get(STORAGE_KEY)
            .cloned()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("persistence mutex poisoned")
    }
}

impl SnapshotPersistence for MemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, PersistenceError> {
        let guard = self.entries.lock().expect("persistence mutex poisoned");
        guard
            .get(key)
            .map(|raw| {
                Snapshot::from_json(raw).map_err(|source| PersistenceError::Decode {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let encoded = snapshot.to_json().map_err(PersistenceError::Encode)?;
        self.entries
            .lock()
            .expect("persistence mutex poisoned")
            .insert(key.to_string(), encoded);
        *self.saves.lock().expect("persistence mutex poisoned") += 1;
        Ok(())
    }
}

/// Accepts loads but refuses every save.
pub(super) struct ReadOnlyPersistence;

impl SnapshotPersistence for ReadOnlyPersistence {
    fn load(&self, _key: &str) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(None)
    }

    fn save(&self, _key: &str, _snapshot: &Snapshot) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io {
            path: "read-only".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only"),
        })
    }
}

pub(super) fn build_service() -> (JobTrackerService<MemoryPersistence>, MemoryPersistence) {
    let persistence = MemoryPersistence::default();
    let service = JobTrackerService::open(Arc::new(persistence.clone()), STORAGE_KEY)
        .expect("empty persistence opens");
    (service, persistence)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
