use axum::http::StatusCode;

use super::domain::{ApplicationId, TaskId};

/// Failure raised by store commands and snapshot handling.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("snapshot is not well-formed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no import is staged")]
    NoStagedImport,
}

impl TrackerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TrackerError::Parse(_) => StatusCode::BAD_REQUEST,
            TrackerError::NoStagedImport => StatusCode::CONFLICT,
        }
    }
}

/// A referenced identifier did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("application '{0}' not found")]
    Application(ApplicationId),
    #[error("task '{task_id}' not found on application '{application_id}'")]
    Task {
        application_id: ApplicationId,
        task_id: TaskId,
    },
}

/// Malformed input rejected before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("task text must not be empty")]
    EmptyTaskText,
    #[error("application id '{0}' is malformed")]
    MalformedApplicationId(String),
    #[error("application id '{0}' appears more than once")]
    DuplicateApplicationId(ApplicationId),
    #[error("task id '{task_id}' on application '{application_id}' is malformed")]
    MalformedTaskId {
        application_id: ApplicationId,
        task_id: String,
    },
    #[error("task id '{task_id}' appears more than once on application '{application_id}'")]
    DuplicateTaskId {
        application_id: ApplicationId,
        task_id: TaskId,
    },
    #[error("snapshot does not match the application schema: {0}")]
    Schema(String),
}
