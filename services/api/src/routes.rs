use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use job_tracker::keywords::{compare_keywords, KeywordComparison};
use job_tracker::tracker::{tracker_router, SharedTracker, SnapshotPersistence};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeywordCompareRequest {
    pub(crate) job_description: String,
    pub(crate) resume: String,
}

pub(crate) fn with_tracker_routes<P>(tracker: SharedTracker<P>) -> axum::Router
where
    P: SnapshotPersistence + 'static,
{
    tracker_router(tracker)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/keywords/compare",
            axum::routing::post(keyword_compare_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn keyword_compare_endpoint(
    Json(payload): Json<KeywordCompareRequest>,
) -> Json<KeywordComparison> {
    Json(compare_keywords(&payload.job_description, &payload.resume))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyword_compare_endpoint_scores_payload() {
        let request = KeywordCompareRequest {
            job_description: "Senior Go Engineer, distributed systems".to_string(),
            resume: "I am a Go engineer who built distributed systems in Rust".to_string(),
        };

        let Json(body) = keyword_compare_endpoint(Json(request)).await;

        assert_eq!(body.match_percent, 80);
        assert_eq!(body.missing, vec!["senior".to_string()]);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
