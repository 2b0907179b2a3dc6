use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::domain::debounce::Debouncer;
use crate::domain::entities::query::{
    CategoryFilter, PageRequest, PageResult, RecordFilters, SortDirection, SortState,
};
use crate::domain::entities::record::BrowseRecord;
use crate::domain::entities::status::UserRole;
use crate::domain::pagination::{page_window, total_pages, PageItem};
use crate::usecase::services::page_fetcher::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub page_size: u32,
    pub debounce: Duration,
    pub search_columns: Vec<String>,
    pub sortable_columns: Vec<String>,
    pub category_column: Option<String>,
    pub initial_sort: SortState,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size: crate::DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(crate::DEFAULT_DEBOUNCE_MS),
            search_columns: Vec::new(),
            sortable_columns: Vec::new(),
            category_column: None,
            initial_sort: SortState::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowseContext {
    pub year: Option<i32>,
    pub viewer: Option<Viewer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Empty,
    Rows,
    Failed(String),
}

pub struct BrowserController<R> {
    config: BrowserConfig,
    context: BrowseContext,
    search_input: String,
    search: Debouncer<String>,
    category: Option<String>,
    sort: SortState,
    page: u32,
    result: PageResult<R>,
    load: LoadState,
    last_token: u64,
    current_token: Option<u64>,
    mounted: bool,
}

impl<R> BrowserController<R> {
    pub fn new(config: BrowserConfig, context: BrowseContext) -> Self {
        let search = Debouncer::new(String::new(), config.debounce);
        let sort = config.initial_sort.clone();
        Self {
            config,
            context,
            search_input: String::new(),
            search,
            category: None,
            sort,
            page: 1,
            result: PageResult::empty(),
            load: LoadState::Idle,
            last_token: 0,
            current_token: None,
            mounted: true,
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn context(&self) -> &BrowseContext {
        &self.context
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn applied_search(&self) -> &str {
        self.search.value()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn records(&self) -> &[R] {
        &self.result.records
    }

    pub fn total_count(&self) -> u64 {
        self.result.total_count
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.result.total_count, self.config.page_size)
    }

    pub fn page_window(&self) -> Vec<PageItem> {
        page_window(self.page, self.total_pages())
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn view_state(&self) -> ViewState {
        match &self.load {
            LoadState::Idle | LoadState::Loading => ViewState::Loading,
            LoadState::Failed(err) => ViewState::Failed(err.to_string()),
            LoadState::Ready if self.result.records.is_empty() => ViewState::Empty,
            LoadState::Ready => ViewState::Rows,
        }
    }

    pub fn set_search_term(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search.set(text.clone(), now);
        self.search_input = text;
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn poll_search(&mut self, now: Instant) -> Option<FetchTicket> {
        if !self.mounted || !self.search.poll(now) {
            return None;
        }
        self.page = 1;
        Some(self.issue())
    }

    pub fn set_category(&mut self, value: Option<String>) -> Option<FetchTicket> {
        let value = value.filter(|v| !v.trim().is_empty());
        if !self.mounted || value == self.category {
            return None;
        }
        self.category = value;
        self.page = 1;
        Some(self.issue())
    }

    pub fn set_sort(&mut self, column: &str) -> Option<FetchTicket> {
        if !self.mounted {
            return None;
        }
        if !self.config.sortable_columns.iter().any(|c| c == column) {
            debug!(column, "ignoring sort on non-sortable column");
            return None;
        }

        self.sort = if self.sort.is_sorted_by(column) {
            SortState::by(column, self.sort.direction.flipped())
        } else {
            SortState::by(column, SortDirection::Asc)
        };
        self.page = 1;
        Some(self.issue())
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        if !self.mounted || page == self.page || page < 1 || page > self.total_pages() {
            return None;
        }
        self.page = page;
        Some(self.issue())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn refresh(&mut self) -> Option<FetchTicket> {
        if !self.mounted {
            return None;
        }
        Some(self.issue())
    }

    pub fn current_request(&self) -> PageRequest {
        let category = match (&self.config.category_column, &self.category) {
            (Some(column), Some(value)) => Some(CategoryFilter {
                column: column.clone(),
                value: value.clone(),
            }),
            _ => None,
        };

        PageRequest {
            filters: RecordFilters {
                search: self.search.value().clone(),
                search_columns: self.config.search_columns.clone(),
                category,
                year: self.context.year,
            },
            sort: self.sort.clone(),
            page: self.page,
            page_size: self.config.page_size,
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.last_token += 1;
        self.current_token = Some(self.last_token);
        self.load = LoadState::Loading;
        FetchTicket {
            token: self.last_token,
            request: self.current_request(),
        }
    }

    /// Applies a finished fetch. Responses for superseded tickets, or that
    /// arrive after `dispose`, are dropped. Returns whether it was applied.
    pub fn complete(&mut self, token: u64, outcome: Result<PageResult<R>, FetchError>) -> bool {
        if !self.mounted || self.current_token != Some(token) {
            debug!(
                token,
                current = ?self.current_token,
                mounted = self.mounted,
                "discarding stale page response"
            );
            return false;
        }

        self.current_token = None;
        match outcome {
            Ok(result) => {
                self.result = result;
                self.load = LoadState::Ready;
            }
            Err(err) => {
                error!(error = %err, page = self.page, "page fetch failed");
                self.result = PageResult::empty();
                self.load = LoadState::Failed(err);
            }
        }
        true
    }

    pub fn dispose(&mut self) {
        self.mounted = false;
        self.current_token = None;
        self.search.cancel();
    }
}

impl<R: BrowseRecord> BrowserController<R> {
    pub fn rows<C: AsRef<str>>(&self, columns: &[C]) -> Vec<Vec<String>> {
        self.result
            .records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.cell(column.as_ref()))
                    .collect()
            })
            .collect()
    }
}
