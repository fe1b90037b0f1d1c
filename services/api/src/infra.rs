use chrono::NaiveDate;
use job_tracker::config::StorageConfig;
use job_tracker::tracker::{FileSnapshotStore, JobTrackerService, PersistenceError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_tracker(
    storage: &StorageConfig,
) -> Result<JobTrackerService<FileSnapshotStore>, PersistenceError> {
    let persistence = Arc::new(FileSnapshotStore::new(storage.data_dir.clone()));
    JobTrackerService::open(persistence, storage.key.clone())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims_and_reports_input() {
        assert_eq!(
            parse_date(" 2024-05-15 "),
            Ok(NaiveDate::from_ymd_opt(2024, 5, 15).expect("valid date"))
        );
        let err = parse_date("15/05/2024").expect_err("wrong format");
        assert!(err.contains("15/05/2024"));
    }
}
