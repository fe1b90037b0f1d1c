use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for follow-up tasks, unique within the owning application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where an application currently stands in the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobStatus {
    Applied,
    Interviewing,
    Rejected,
    Offer,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Rejected => "Rejected",
            JobStatus::Offer => "Offer",
        }
    }

    pub const fn ordered() -> [JobStatus; 4] {
        [
            JobStatus::Applied,
            JobStatus::Interviewing,
            JobStatus::Rejected,
            JobStatus::Offer,
        ]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        JobStatus::ordered()
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| format!("unknown job status '{value}'"))
    }
}

/// Follow-up action attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

/// One tracked job application and the tasks it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub date_applied: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Task content supplied with a draft; identifiers are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub text: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

/// Input for creating an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub date_applied: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tasks: Vec<TaskDraft>,
}

/// Field-level edit to an application. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Edit to a single task. `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer).map(Some)
}

/// Query-side status selector; unrecognized values match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(JobStatus),
    Unrecognized(String),
}

impl StatusFilter {
    /// `"all"` and the status labels match exactly; anything else is kept as
    /// an unrecognized value.
    pub fn parse(raw: &str) -> Self {
        if raw == "all" {
            return StatusFilter::All;
        }
        match raw.parse::<JobStatus>() {
            Ok(status) => StatusFilter::Only(status),
            Err(_) => StatusFilter::Unrecognized(raw.to_string()),
        }
    }

    pub fn matches(&self, status: JobStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *expected == status,
            StatusFilter::Unrecognized(_) => false,
        }
    }
}

/// Direction for date-applied ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("sort order must be 'asc' or 'desc', got '{other}'")),
        }
    }
}
