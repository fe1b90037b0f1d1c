//! Job application records, their follow-up tasks, and the store that owns them.
//!
//! [`ApplicationStore`] holds the data and enforces identifier rules,
//! [`ImportSession`] guards destructive imports behind an explicit confirm, and
//! [`JobTrackerService`] wires both to a [`SnapshotPersistence`] collaborator.

pub mod domain;
pub mod error;
pub mod import;
pub mod persistence;
pub mod router;
pub mod service;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, JobStatus, SortOrder,
    StatusFilter, Task, TaskDraft, TaskId, TaskPatch,
};
pub use error::{NotFoundError, TrackerError, ValidationError};
pub use import::{ImportOutcome, ImportSession, ImportState, StagedImport};
pub use persistence::{FileSnapshotStore, PersistenceError, SnapshotPersistence, STORAGE_KEY};
pub use router::{tracker_router, SharedTracker};
pub use service::JobTrackerService;
pub use snapshot::{ExportFile, Snapshot, EXPORT_FILE_NAME};
pub use store::ApplicationStore;
