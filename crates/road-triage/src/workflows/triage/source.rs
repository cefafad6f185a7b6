use std::sync::Arc;

use super::domain::{BoundingBox, DefectRecord};

/// Read-only supplier of defect observations.
///
/// Implementations hand out owned snapshots so a run never observes a store that changes
/// underneath it.
pub trait DefectSource: Send + Sync {
    fn snapshot(&self, bounds: Option<&BoundingBox>) -> Result<Vec<DefectRecord>, DefectSourceError>;

    fn find(&self, defect_id: &str) -> Result<Option<DefectRecord>, DefectSourceError> {
        let defect_id = defect_id.trim();
        Ok(self
            .snapshot(None)?
            .into_iter()
            .find(|record| record.id.trim() == defect_id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DefectSourceError {
    #[error("failed to read defect data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid defect CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("defect source unavailable: {0}")]
    Unavailable(String),
}

/// Fixed defect set held in memory, shared cheaply between handlers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDefectSource {
    records: Arc<Vec<DefectRecord>>,
}

impl InMemoryDefectSource {
    pub fn new(records: Vec<DefectRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DefectSource for InMemoryDefectSource {
    fn snapshot(&self, bounds: Option<&BoundingBox>) -> Result<Vec<DefectRecord>, DefectSourceError> {
        Ok(self
            .records
            .iter()
            .filter(|record| {
                // Unplaceable records pass through so validation can reject them.
                bounds.map_or(true, |bounds| {
                    !record.location.is_valid() || bounds.contains(record.location)
                })
            })
            .cloned()
            .collect())
    }
}
