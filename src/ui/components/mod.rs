pub mod pagination;
pub mod record_browser;
pub mod record_table;
