pub mod app;
pub mod config;
pub mod domain;
pub mod infra;
pub mod logging;
pub mod platform;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod tests;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const NONE_OPTION_VALUE: &str = "__none__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub table: &'static str,
    pub row_count: usize,
}
