use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::dashboard::{self, DashboardSummary};

use super::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, Task, TaskId, TaskPatch,
};
use super::error::TrackerError;
use super::import::{ImportOutcome, ImportSession, StagedImport};
use super::persistence::{PersistenceError, SnapshotPersistence};
use super::snapshot::{ExportFile, Snapshot};
use super::store::ApplicationStore;

/// Service composing the store, the import slot, and the persistence collaborator.
///
/// Every successful mutation hands the fresh snapshot to the collaborator.
/// Save failures are logged and never roll back the in-memory change.
pub struct JobTrackerService<P> {
    store: ApplicationStore,
    imports: ImportSession,
    persistence: Arc<P>,
    storage_key: String,
}

impl<P> JobTrackerService<P>
where
    P: SnapshotPersistence + 'static,
{
    /// Hydrate from whatever the collaborator last stored under `storage_key`.
    pub fn open(persistence: Arc<P>, storage_key: impl Into<String>) -> Result<Self, PersistenceError> {
        let storage_key = storage_key.into();
        let store = match persistence.load(&storage_key)? {
            Some(snapshot) => ApplicationStore::from_snapshot(snapshot).map_err(|source| {
                PersistenceError::Decode {
                    key: storage_key.clone(),
                    source,
                }
            })?,
            None => ApplicationStore::new(),
        };
        info!(
            key = %storage_key,
            applications = store.len(),
            "job tracker hydrated"
        );

        Ok(Self {
            store,
            imports: ImportSession::new(),
            persistence,
            storage_key,
        })
    }

    pub fn store(&self) -> &ApplicationStore {
        &self.store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn add(&mut self, draft: ApplicationDraft) -> Result<Application, TrackerError> {
        let application = self.store.add(draft)?;
        info!(id = %application.id, company = %application.company, "application added");
        self.persist();
        Ok(application)
    }

    pub fn update(
        &mut self,
        id: &ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<Application, TrackerError> {
        let application = self.store.update(id, patch)?;
        info!(%id, status = %application.status, "application updated");
        self.persist();
        Ok(application)
    }

    pub fn remove(&mut self, id: &ApplicationId) -> Result<Application, TrackerError> {
        let removed = self.store.remove(id)?;
        info!(%id, tasks = removed.tasks.len(), "application removed");
        self.persist();
        Ok(removed)
    }

    pub fn add_task(
        &mut self,
        job_id: &ApplicationId,
        text: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<Task, TrackerError> {
        let task = self.store.add_task(job_id, text, due_date)?;
        info!(%job_id, task_id = %task.id, "task added");
        self.persist();
        Ok(task)
    }

    pub fn toggle_task(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
    ) -> Result<Task, TrackerError> {
        let task = self.store.toggle_task(job_id, task_id)?;
        info!(%job_id, %task_id, completed = task.completed, "task toggled");
        self.persist();
        Ok(task)
    }

    pub fn edit_task(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TrackerError> {
        let task = self.store.edit_task(job_id, task_id, patch)?;
        info!(%job_id, %task_id, "task edited");
        self.persist();
        Ok(task)
    }

    pub fn remove_task(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
    ) -> Result<Task, TrackerError> {
        let task = self.store.remove_task(job_id, task_id)?;
        info!(%job_id, %task_id, "task removed");
        self.persist();
        Ok(task)
    }

    pub fn export_file(&self) -> Result<ExportFile, TrackerError> {
        Ok(ExportFile::from_snapshot(&self.store.snapshot())?)
    }

    pub fn stage_import(&mut self, candidate: Snapshot) -> Result<StagedImport, TrackerError> {
        self.imports.stage(candidate, &self.store)
    }

    /// Parse an import file and stage it.
    ///
    /// A previously staged import is dropped before parsing, so nothing is
    /// pending when parsing fails.
    pub fn stage_import_json(&mut self, raw: &str) -> Result<StagedImport, TrackerError> {
        self.imports.discard();
        let candidate = Snapshot::from_json(raw)?;
        self.stage_import(candidate)
    }

    pub fn pending_import(&self) -> Option<&StagedImport> {
        self.imports.pending()
    }

    pub fn confirm_import(&mut self) -> Result<ImportOutcome, TrackerError> {
        let outcome = self.imports.confirm(&mut self.store)?;
        self.persist();
        Ok(outcome)
    }

    pub fn cancel_import(&mut self) -> Result<ImportOutcome, TrackerError> {
        self.imports.cancel()
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary<'_> {
        dashboard::summarize(self.store.applications(), today)
    }

    fn persist(&self) {
        let snapshot = self.store.snapshot();
        if let Err(err) = self.persistence.save(&self.storage_key, &snapshot) {
            warn!(key = %self.storage_key, error = %err, "failed to persist snapshot");
        }
    }
}
