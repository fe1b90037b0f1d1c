use crate::cli::ServeArgs;
use crate::infra::{open_tracker, AppState};
use crate::routes::with_tracker_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use job_tracker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let tracker = Arc::new(Mutex::new(open_tracker(&config.storage)?));

    let app = with_tracker_routes(tracker)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "job tracker ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
