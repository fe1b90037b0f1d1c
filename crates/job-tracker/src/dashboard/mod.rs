//! Read-only summary statistics over the tracked applications.

mod week;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::tracker::{Application, JobStatus, Task};

pub use week::WeekRange;

/// A task due inside the reporting week, paired with the application that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueTask<'a> {
    #[serde(rename = "job")]
    pub application: &'a Application,
    pub task: &'a Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    pub total: usize,
    pub by_status: BTreeMap<JobStatus, usize>,
    pub last_applied: Option<&'a Application>,
    pub tasks_due_this_week: Vec<DueTask<'a>>,
    pub week: WeekRange,
}

impl DashboardSummary<'_> {
    /// Status counts in pipeline order, omitting statuses with no applications.
    pub fn status_breakdown(&self) -> Vec<StatusCount> {
        JobStatus::ordered()
            .into_iter()
            .filter_map(|status| {
                self.by_status
                    .get(&status)
                    .map(|&count| StatusCount { status, count })
            })
            .collect()
    }
}

/// Summarize `applications` relative to `today`.
///
/// `last_applied` keeps the first application seen with the latest date.
/// Tasks due this week are listed in store order regardless of completion.
pub fn summarize(applications: &[Application], today: NaiveDate) -> DashboardSummary<'_> {
    let week = WeekRange::containing(today);
    let mut by_status = BTreeMap::new();
    let mut last_applied: Option<&Application> = None;
    let mut tasks_due_this_week = Vec::new();

    for application in applications {
        *by_status.entry(application.status).or_insert(0) += 1;

        if last_applied.map_or(true, |current| application.date_applied > current.date_applied) {
            last_applied = Some(application);
        }

        tasks_due_this_week.extend(
            application
                .tasks
                .iter()
                .filter(|task| task.due_date.is_some_and(|due| week.contains(due)))
                .map(|task| DueTask { application, task }),
        );
    }

    DashboardSummary {
        total: applications.len(),
        by_status,
        last_applied,
        tasks_due_this_week,
        week,
    }
}
