use std::marker::PhantomData;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::domain::entities::query::{RecordFilters, SortState};
use crate::infra::sqlite::bindings::TableBinding;
use crate::infra::sqlite::queries::{count_rows, select_page, validate_request};
use crate::infra::sqlite::schema::{open_connection, relation_exists};
use crate::usecase::ports::source::{RecordSource, SourceError};

fn backend_error(err: anyhow::Error) -> SourceError {
    SourceError::Transient(format!("{err:#}"))
}

pub struct ProcedureSource<B> {
    pub db_path: PathBuf,
    _record: PhantomData<fn() -> B>,
}

impl<B: TableBinding> ProcedureSource<B> {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            _record: PhantomData,
        }
    }

    fn connect(&self) -> Result<(Connection, String), SourceError> {
        let conn = open_connection(&self.db_path).map_err(backend_error)?;
        let procedure = B::browse_procedure();
        if !relation_exists(&conn, &procedure).map_err(backend_error)? {
            return Err(SourceError::NotImplemented(procedure));
        }
        Ok((conn, procedure))
    }
}

impl<B: TableBinding> RecordSource<B> for ProcedureSource<B> {
    fn name(&self) -> &str {
        "rpc"
    }

    fn fetch_records(
        &self,
        filters: &RecordFilters,
        sort: &SortState,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<B>, SourceError> {
        validate_request::<B>(filters, sort)?;
        let (conn, procedure) = self.connect()?;
        select_page::<B>(&conn, &procedure, filters, sort, limit, offset).map_err(backend_error)
    }

    fn fetch_count(&self, filters: &RecordFilters) -> Result<u64, SourceError> {
        validate_request::<B>(filters, &SortState::default())?;
        let (conn, procedure) = self.connect()?;
        count_rows::<B>(&conn, &procedure, filters).map_err(backend_error)
    }
}

pub struct TableScanSource<B> {
    pub db_path: PathBuf,
    _record: PhantomData<fn() -> B>,
}

impl<B: TableBinding> TableScanSource<B> {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            _record: PhantomData,
        }
    }
}

impl<B: TableBinding> RecordSource<B> for TableScanSource<B> {
    fn name(&self) -> &str {
        "table-scan"
    }

    fn fetch_records(
        &self,
        filters: &RecordFilters,
        sort: &SortState,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<B>, SourceError> {
        validate_request::<B>(filters, sort)?;
        let conn = open_connection(&self.db_path).map_err(backend_error)?;
        select_page::<B>(&conn, B::TABLE, filters, sort, limit, offset).map_err(backend_error)
    }

    fn fetch_count(&self, filters: &RecordFilters) -> Result<u64, SourceError> {
        validate_request::<B>(filters, &SortState::default())?;
        let conn = open_connection(&self.db_path).map_err(backend_error)?;
        count_rows::<B>(&conn, B::TABLE, filters).map_err(backend_error)
    }
}
