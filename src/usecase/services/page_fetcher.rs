use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::query::{PageRequest, PageResult};
use crate::usecase::ports::source::{RecordSource, SourceError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid filter: {0}")]
    Validation(String),
    #[error("data unavailable: {0}")]
    Unavailable(String),
}

impl From<SourceError> for FetchError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Validation(message) => FetchError::Validation(message),
            other => FetchError::Unavailable(other.to_string()),
        }
    }
}

pub struct PageFetcher<R> {
    primary: Arc<dyn RecordSource<R>>,
    fallback: Option<Arc<dyn RecordSource<R>>>,
}

impl<R> PageFetcher<R> {
    pub fn new(primary: Arc<dyn RecordSource<R>>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn RecordSource<R>>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn fetch(&self, request: &PageRequest) -> Result<PageResult<R>, FetchError> {
        let err = match fetch_from(self.primary.as_ref(), request) {
            Ok(page) => return Ok(page),
            Err(err) => err,
        };

        if !err.allows_fallback() {
            return Err(err.into());
        }

        let Some(fallback) = &self.fallback else {
            warn!(source = self.primary.name(), error = %err, "page fetch failed without fallback");
            return Err(err.into());
        };

        warn!(
            primary = self.primary.name(),
            fallback = fallback.name(),
            error = %err,
            "primary page fetch failed; retrying on fallback"
        );
        fetch_from(fallback.as_ref(), request).map_err(FetchError::from)
    }
}

fn fetch_from<R>(
    source: &dyn RecordSource<R>,
    request: &PageRequest,
) -> Result<PageResult<R>, SourceError> {
    debug!(
        source = source.name(),
        page = request.page,
        offset = request.offset(),
        limit = request.limit(),
        "fetching page"
    );
    let records = source.fetch_records(
        &request.filters,
        &request.sort,
        request.limit(),
        request.offset(),
    )?;
    let total_count = source.fetch_count(&request.filters)?;
    Ok(PageResult {
        records,
        total_count,
    })
}
