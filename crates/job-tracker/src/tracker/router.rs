use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, SortOrder, StatusFilter,
    TaskId, TaskPatch,
};
use super::error::{NotFoundError, TrackerError};
use super::persistence::SnapshotPersistence;
use super::service::JobTrackerService;

/// The process-owned tracker shared between request handlers.
pub type SharedTracker<P> = Arc<Mutex<JobTrackerService<P>>>;

/// Router builder exposing the tracker over HTTP.
pub fn tracker_router<P>(tracker: SharedTracker<P>) -> Router
where
    P: SnapshotPersistence + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_handler::<P>).post(create_handler::<P>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(fetch_handler::<P>)
                .patch(update_handler::<P>)
                .delete(remove_handler::<P>),
        )
        .route("/api/v1/jobs/:job_id/tasks", post(add_task_handler::<P>))
        .route(
            "/api/v1/jobs/:job_id/tasks/:task_id",
            axum::routing::patch(edit_task_handler::<P>).delete(remove_task_handler::<P>),
        )
        .route(
            "/api/v1/jobs/:job_id/tasks/:task_id/toggle",
            post(toggle_task_handler::<P>),
        )
        .route("/api/v1/export", get(export_handler::<P>))
        .route("/api/v1/import", post(stage_import_handler::<P>))
        .route("/api/v1/import/confirm", post(confirm_import_handler::<P>))
        .route("/api/v1/import/cancel", post(cancel_import_handler::<P>))
        .route("/api/v1/dashboard", get(dashboard_handler::<P>))
        .with_state(tracker)
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status_code(), Json(payload)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    order: Option<SortOrder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewTaskRequest {
    text: String,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardParams {
    #[serde(default)]
    today: Option<NaiveDate>,
}

fn lock<P>(tracker: &SharedTracker<P>) -> std::sync::MutexGuard<'_, JobTrackerService<P>> {
    tracker.lock().expect("tracker mutex poisoned")
}

pub(crate) async fn list_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Application>>
where
    P: SnapshotPersistence + 'static,
{
    let filter = params
        .status
        .as_deref()
        .map(StatusFilter::parse)
        .unwrap_or(StatusFilter::All);
    let service = lock(&tracker);
    let applications = service
        .store()
        .query(&filter, params.order)
        .into_iter()
        .cloned()
        .collect();
    Json(applications)
}

pub(crate) async fn create_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let application = lock(&tracker).add(draft)?;
    Ok((StatusCode::CREATED, Json(application)).into_response())
}

pub(crate) async fn fetch_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path(job_id): Path<String>,
) -> Result<Json<Application>, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let id = ApplicationId(job_id);
    let service = lock(&tracker);
    service
        .store()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| TrackerError::from(NotFoundError::Application(id)))
}

pub(crate) async fn update_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path(job_id): Path<String>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<Application>, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let application = lock(&tracker).update(&ApplicationId(job_id), patch)?;
    Ok(Json(application))
}

pub(crate) async fn remove_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    lock(&tracker).remove(&ApplicationId(job_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn add_task_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path(job_id): Path<String>,
    Json(request): Json<NewTaskRequest>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let task = lock(&tracker).add_task(&ApplicationId(job_id), &request.text, request.due_date)?;
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

pub(crate) async fn toggle_task_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path((job_id, task_id)): Path<(String, String)>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let task = lock(&tracker).toggle_task(&ApplicationId(job_id), &TaskId(task_id))?;
    Ok(Json(task).into_response())
}

pub(crate) async fn edit_task_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path((job_id, task_id)): Path<(String, String)>,
    Json(patch): Json<TaskPatch>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let task = lock(&tracker).edit_task(&ApplicationId(job_id), &TaskId(task_id), patch)?;
    Ok(Json(task).into_response())
}

pub(crate) async fn remove_task_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Path((job_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    lock(&tracker).remove_task(&ApplicationId(job_id), &TaskId(task_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn export_handler<P>(
    State(tracker): State<SharedTracker<P>>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let export = lock(&tracker).export_file()?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.contents,
    )
        .into_response())
}

pub(crate) async fn stage_import_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    body: String,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let staged = lock(&tracker).stage_import_json(&body)?;
    Ok((StatusCode::ACCEPTED, Json(staged)).into_response())
}

pub(crate) async fn confirm_import_handler<P>(
    State(tracker): State<SharedTracker<P>>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let outcome = lock(&tracker).confirm_import()?;
    Ok(Json(outcome).into_response())
}

pub(crate) async fn cancel_import_handler<P>(
    State(tracker): State<SharedTracker<P>>,
) -> Result<Response, TrackerError>
where
    P: SnapshotPersistence + 'static,
{
    let outcome = lock(&tracker).cancel_import()?;
    Ok(Json(outcome).into_response())
}

pub(crate) async fn dashboard_handler<P>(
    State(tracker): State<SharedTracker<P>>,
    Query(params): Query<DashboardParams>,
) -> Response
where
    P: SnapshotPersistence + 'static,
{
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let service = lock(&tracker);
    Json(service.dashboard(today)).into_response()
}
