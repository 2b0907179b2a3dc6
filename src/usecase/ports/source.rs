use thiserror::Error;

use crate::domain::entities::query::{RecordFilters, SortState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("operation not available: {0}")]
    NotImplemented(String),
    #[error("request rejected: {0}")]
    Validation(String),
    #[error("backend failure: {0}")]
    Transient(String),
}

impl SourceError {
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            SourceError::NotImplemented(_) | SourceError::Transient(_)
        )
    }
}

pub trait RecordSource<R>: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_records(
        &self,
        filters: &RecordFilters,
        sort: &SortState,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<R>, SourceError>;

    fn fetch_count(&self, filters: &RecordFilters) -> Result<u64, SourceError>;
}
