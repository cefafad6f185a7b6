use metrics_exporter_prometheus::PrometheusHandle;
use road_triage::error::AppError;
use road_triage::workflows::triage::InMemoryDefectSource;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Oxford sample export bundled with the binary.
const OXFORD_DEFECTS: &str = include_str!("../../../crates/road-triage/data/oxford_defects.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads defects from `csv` when given, otherwise from the bundled Oxford dataset.
pub(crate) fn load_defect_source(csv: Option<&Path>) -> Result<InMemoryDefectSource, AppError> {
    let source = match csv {
        Some(path) => InMemoryDefectSource::from_csv_path(path)?,
        None => InMemoryDefectSource::from_csv_reader(OXFORD_DEFECTS.as_bytes())?,
    };

    info!(
        defects = source.len(),
        source = %csv.map_or_else(|| "bundled oxford dataset".to_string(), |path| path.display().to_string()),
        "defect source loaded"
    );
    Ok(source)
}
