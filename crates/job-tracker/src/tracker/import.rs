use std::mem;

use serde::Serialize;
use tracing::{debug, info};

use super::error::TrackerError;
use super::snapshot::Snapshot;
use super::store::ApplicationStore;

/// A validated snapshot waiting for the user to confirm the overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedImport {
    #[serde(skip)]
    snapshot: Snapshot,
    pub incoming: usize,
    pub current: usize,
    pub prompt: String,
}

impl StagedImport {
    fn new(snapshot: Snapshot, current: usize) -> Self {
        let incoming = snapshot.len();
        let prompt = format!(
            "Importing will replace {} with {} from the file. This cannot be undone. Continue?",
            describe_count(current, "tracked application"),
            describe_count(incoming, "application"),
        );
        Self {
            snapshot,
            incoming,
            current,
            prompt,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

fn describe_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Import state machine: `Idle -> Staged -> (Committed | Cancelled) -> Idle`.
///
/// Committed and cancelled are reported through [`ImportOutcome`]; the session
/// itself is back at `Idle` as soon as either resolution returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportState {
    #[default]
    Idle,
    Staged(StagedImport),
}

/// How a staged import was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ImportOutcome {
    Committed { installed: usize, replaced: usize },
    Cancelled { discarded: usize },
}

/// Single-slot holding area for a pending import.
#[derive(Debug, Default)]
pub struct ImportSession {
    state: ImportState,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn pending(&self) -> Option<&StagedImport> {
        match &self.state {
            ImportState::Staged(staged) => Some(staged),
            ImportState::Idle => None,
        }
    }

    /// Validate `candidate` and hold it.
    ///
    /// Any previously staged import is dropped first, so a rejected candidate
    /// leaves the session `Idle` rather than pending an older file.
    pub fn stage(
        &mut self,
        candidate: Snapshot,
        store: &ApplicationStore,
    ) -> Result<StagedImport, TrackerError> {
        self.discard();
        candidate.validate()?;

        let staged = StagedImport::new(candidate, store.len());
        info!(
            incoming = staged.incoming,
            current = staged.current,
            "import staged"
        );
        self.state = ImportState::Staged(staged.clone());
        Ok(staged)
    }

    /// Drop whatever is staged without reporting an outcome.
    pub fn discard(&mut self) -> Option<StagedImport> {
        match mem::take(&mut self.state) {
            ImportState::Staged(previous) => {
                debug!(discarded = previous.incoming, "dropped staged import");
                Some(previous)
            }
            ImportState::Idle => None,
        }
    }

    /// Install the staged snapshot into `store`.
    ///
    /// The slot is cleared whether or not installation succeeds.
    pub fn confirm(&mut self, store: &mut ApplicationStore) -> Result<ImportOutcome, TrackerError> {
        let staged = match mem::take(&mut self.state) {
            ImportState::Staged(staged) => staged,
            ImportState::Idle => return Err(TrackerError::NoStagedImport),
        };

        let replaced = store.len();
        let installed = staged.incoming;
        store.replace_all(staged.snapshot)?;
        info!(installed, replaced, "import committed");
        Ok(ImportOutcome::Committed {
            installed,
            replaced,
        })
    }

    pub fn cancel(&mut self) -> Result<ImportOutcome, TrackerError> {
        match mem::take(&mut self.state) {
            ImportState::Staged(staged) => {
                info!(discarded = staged.incoming, "import cancelled");
                Ok(ImportOutcome::Cancelled {
                    discarded: staged.incoming,
                })
            }
            ImportState::Idle => Err(TrackerError::NoStagedImport),
        }
    }
}
