use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use super::domain::Application;
use super::error::{TrackerError, ValidationError};

/// File name offered for downloads of the current store.
pub const EXPORT_FILE_NAME: &str = "jobs.json";

/// Serialized form of the store: a JSON array of applications.
///
/// The same encoding is used for the persisted copy and for export files,
/// so either can be fed back through [`Snapshot::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    applications: Vec<Application>,
}

impl Snapshot {
    pub fn new(applications: Vec<Application>) -> Self {
        Self { applications }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn into_applications(self) -> Vec<Application> {
        self.applications
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot. Syntax errors surface as [`TrackerError::Parse`];
    /// well-formed JSON with the wrong shape is a validation failure.
    pub fn from_json(raw: &str) -> Result<Self, TrackerError> {
        serde_json::from_str(raw).map_err(|err| match err.classify() {
            Category::Data => TrackerError::Validation(ValidationError::Schema(err.to_string())),
            _ => TrackerError::Parse(err),
        })
    }

    /// Checks identifier uniqueness and shape across the whole snapshot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut application_ids = HashSet::new();
        for application in &self.applications {
            if !is_well_formed_id(application.id.as_str()) {
                return Err(ValidationError::MalformedApplicationId(
                    application.id.0.clone(),
                ));
            }
            if !application_ids.insert(&application.id) {
                return Err(ValidationError::DuplicateApplicationId(
                    application.id.clone(),
                ));
            }

            let mut task_ids = HashSet::new();
            for task in &application.tasks {
                if !is_well_formed_id(task.id.as_str()) {
                    return Err(ValidationError::MalformedTaskId {
                        application_id: application.id.clone(),
                        task_id: task.id.0.clone(),
                    });
                }
                if !task_ids.insert(&task.id) {
                    return Err(ValidationError::DuplicateTaskId {
                        application_id: application.id.clone(),
                        task_id: task.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Application>> for Snapshot {
    fn from(value: Vec<Application>) -> Self {
        Self::new(value)
    }
}

/// Download payload for the current store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub contents: String,
}

impl ExportFile {
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: EXPORT_FILE_NAME,
            contents: snapshot.to_json()?,
        })
    }
}

/// Non-empty, no surrounding whitespace, no control characters.
pub(crate) fn is_well_formed_id(raw: &str) -> bool {
    !raw.is_empty() && raw.trim() == raw && !raw.chars().any(char::is_control)
}
