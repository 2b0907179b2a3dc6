use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use crate::app::{build_fetcher, skgb_spec, ubinan_spec, user_spec, AppRuntime, BrowserSpec};
use crate::config::{load_config, AppConfig};
use crate::domain::debounce::Debouncer;
use crate::domain::entities::query::{
    CategoryFilter, PageResult, RecordFilters, SortDirection, SortState,
};
use crate::domain::entities::record::{BrowseRecord, SkgbSample, UbinanRecord, UserAccount};
use crate::domain::entities::status::{Commodity, SampleStatus, UserRole};
use crate::domain::pagination::{page_window, total_pages, PageItem};
use crate::infra::import::csv::import_csv_to_table;
use crate::infra::sqlite::bindings::TableBinding;
use crate::infra::sqlite::queries::like_pattern;
use crate::infra::sqlite::schema::{init_db, install_browse_procedures};
use crate::infra::sqlite::sources::{ProcedureSource, TableScanSource};
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::source::{RecordSource, SourceError};
use crate::usecase::services::browser::{
    BrowseContext, BrowserConfig, BrowserController, LoadState, ViewState,
};
use crate::usecase::services::page_fetcher::{FetchError, PageFetcher};
use crate::*;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("ubinan-{prefix}-{nanos}"))
}

fn seed_ubinan(db_path: &Path) {
    init_db(db_path).expect("init_db should succeed");
    let conn = Connection::open(db_path).expect("should open sqlite db");
    let rows: &[(i32, u8, &str, &str, &str, &str, f64, &str)] = &[
        (2024, 1, "Bantul", "Sewon", "padi", "Budi", 5.0, "selesai"),
        (2024, 1, "Bantul", "Imogiri", "jagung", "Sari", 4.2, "proses"),
        (2024, 2, "Sleman", "Depok", "padi", "Agus", 6.1, "belum"),
        (2023, 1, "Sleman", "Mlati", "padi", "Budi", 5.5, "terverifikasi"),
        (2024, 2, "Kulon Progo", "Wates", "kedelai", "Rina_10%", 2.0, "selesai"),
    ];
    for (year, subround, kab, kec, commodity, enumerator, weight, status) in rows {
        conn.execute(
            "INSERT INTO ubinan_detail (year, subround, kab, kec, commodity, enumerator, plot_weight_kg, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![year, subround, kab, kec, commodity, enumerator, weight, status],
        )
        .expect("should insert ubinan row");
    }
}

fn ubinan_filters() -> RecordFilters {
    RecordFilters {
        search_columns: vec!["kab".to_string(), "kec".to_string(), "enumerator".to_string()],
        ..RecordFilters::default()
    }
}

fn ids(records: &[UbinanRecord]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

fn sample_ubinan(id: i64) -> UbinanRecord {
    UbinanRecord {
        id,
        year: 2024,
        subround: 1,
        kab: "Bantul".to_string(),
        kec: "Sewon".to_string(),
        commodity: Commodity::Padi,
        enumerator: "Budi".to_string(),
        plot_weight_kg: 5.0,
        status: SampleStatus::Completed,
    }
}

fn page_of(count: i64, total_count: u64) -> PageResult<UbinanRecord> {
    PageResult {
        records: (1..=count).map(sample_ubinan).collect(),
        total_count,
    }
}

fn ubinan_browser() -> BrowserController<UbinanRecord> {
    BrowserController::new(
        BrowserConfig {
            page_size: 25,
            debounce: Duration::from_millis(500),
            search_columns: vec!["kab".to_string(), "enumerator".to_string()],
            sortable_columns: vec!["id".to_string(), "kab".to_string()],
            category_column: Some("commodity".to_string()),
            initial_sort: SortState::by("id", SortDirection::Asc),
        },
        BrowseContext {
            year: Some(2024),
            viewer: None,
        },
    )
}

fn loaded_browser(total: u64) -> BrowserController<UbinanRecord> {
    let mut browser = ubinan_browser();
    let ticket = browser.refresh().expect("mounted browser should refresh");
    assert!(browser.complete(ticket.token, Ok(page_of(25, total))));
    browser
}

struct ScriptedSource {
    name: &'static str,
    outcome: Result<Vec<String>, SourceError>,
    total: u64,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn ok(name: &'static str, records: &[&str], total: u64) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome: Ok(records.iter().map(|r| r.to_string()).collect()),
            total,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(name: &'static str, err: SourceError) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome: Err(err),
            total: 0,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordSource<String> for ScriptedSource {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch_records(
        &self,
        _filters: &RecordFilters,
        _sort: &SortState,
        _limit: u32,
        _offset: u64,
    ) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn fetch_count(&self, _filters: &RecordFilters) -> Result<u64, SourceError> {
        self.outcome.as_ref().map(|_| self.total).map_err(Clone::clone)
    }
}

fn first_page_request() -> crate::domain::entities::query::PageRequest {
    ubinan_browser().current_request()
}

#[test]
fn debouncer_applies_only_the_last_value_after_delay() {
    let start = Instant::now();
    let mut search = Debouncer::new(String::new(), Duration::from_millis(500));

    search.set("pa".to_string(), start);
    search.set("padi".to_string(), start + Duration::from_millis(200));

    assert!(!search.poll(start + Duration::from_millis(600)));
    assert_eq!(search.value(), "");
    assert_eq!(search.pending().map(String::as_str), Some("padi"));

    assert!(search.poll(start + Duration::from_millis(700)));
    assert_eq!(search.value(), "padi");
    assert!(search.pending().is_none());
}

#[test]
fn debouncer_reports_no_change_for_identical_value_or_cancel() {
    let start = Instant::now();
    let mut search = Debouncer::new("padi".to_string(), Duration::from_millis(100));

    search.set("padi".to_string(), start);
    assert!(!search.poll(start + Duration::from_millis(100)));

    search.set("jagung".to_string(), start);
    search.cancel();
    assert!(!search.poll(start + Duration::from_secs(1)));
    assert_eq!(search.value(), "padi");
    assert!(search.deadline().is_none());
}

#[test]
fn total_pages_rounds_up_partial_pages() {
    assert_eq!(total_pages(0, 25), 0);
    assert_eq!(total_pages(1, 25), 1);
    assert_eq!(total_pages(25, 25), 1);
    assert_eq!(total_pages(26, 25), 2);
    assert_eq!(total_pages(100, 0), 0);
}

#[test]
fn page_window_lists_every_page_when_few() {
    assert!(page_window(1, 0).is_empty());
    assert!(page_window(1, 1).is_empty());
    assert_eq!(
        page_window(3, 5),
        (1..=5).map(PageItem::Page).collect::<Vec<_>>()
    );
    assert_eq!(
        page_window(1, 7),
        (1..=7).map(PageItem::Page).collect::<Vec<_>>()
    );
}

#[test]
fn page_window_centres_on_current_page() {
    use PageItem::{Ellipsis, Page};

    assert_eq!(
        page_window(10, 20),
        vec![
            Page(1),
            Ellipsis,
            Page(8),
            Page(9),
            Page(10),
            Page(11),
            Page(12),
            Ellipsis,
            Page(20),
        ]
    );
}

#[test]
fn page_window_shifts_inward_near_either_end() {
    use PageItem::{Ellipsis, Page};

    assert_eq!(
        page_window(1, 20),
        vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(20)]
    );
    assert_eq!(
        page_window(20, 20),
        vec![Page(1), Ellipsis, Page(15), Page(16), Page(17), Page(18), Page(19), Page(20)]
    );
}

#[test]
fn browser_starts_loading_and_renders_rows_after_completion() {
    let mut browser = ubinan_browser();
    assert_eq!(browser.view_state(), ViewState::Loading);
    assert_eq!(browser.page(), 1);

    let ticket = browser.refresh().expect("mounted browser should refresh");
    assert_eq!(ticket.request.page, 1);
    assert_eq!(ticket.request.offset(), 0);
    assert_eq!(ticket.request.filters.year, Some(2024));

    assert!(browser.complete(ticket.token, Ok(page_of(25, 60))));
    assert_eq!(browser.view_state(), ViewState::Rows);
    assert_eq!(browser.total_pages(), 3);
    assert!(!browser.has_previous());
    assert!(browser.has_next());

    let rows = browser.rows(&["id", "commodity", "productivity"]);
    assert_eq!(rows[0], vec!["1", "Padi", "80.00"]);
}

#[test]
fn browser_reports_empty_result() {
    let mut browser = ubinan_browser();
    let ticket = browser.refresh().expect("mounted browser should refresh");

    assert!(browser.complete(ticket.token, Ok(PageResult::empty())));

    assert_eq!(browser.view_state(), ViewState::Empty);
    assert!(browser.page_window().is_empty());
}

#[test]
fn browser_page_navigation_stays_in_range() {
    let mut browser = loaded_browser(60);

    let ticket = browser.go_to_page(2).expect("page 2 should be reachable");
    assert_eq!(ticket.request.offset(), 25);
    assert_eq!(ticket.request.limit(), 25);
    assert!(browser.go_to_page(2).is_none(), "same page should not refetch");
    assert!(browser.go_to_page(0).is_none());
    assert!(browser.go_to_page(4).is_none());

    let ticket = browser.next_page().expect("next page should exist");
    assert_eq!(ticket.request.page, 3);
    assert!(browser.next_page().is_none());

    let ticket = browser.previous_page().expect("previous page should exist");
    assert_eq!(ticket.request.page, 2);
}

#[test]
fn browser_discards_superseded_responses() {
    let mut browser = loaded_browser(100);

    let slow = browser.go_to_page(2).expect("page 2 should be reachable");
    let fast = browser.go_to_page(3).expect("page 3 should be reachable");

    assert!(!browser.complete(slow.token, Ok(page_of(1, 100))));
    assert_eq!(browser.load_state(), &LoadState::Loading);

    assert!(browser.complete(fast.token, Ok(page_of(25, 100))));
    assert_eq!(browser.page(), 3);
    assert_eq!(browser.records().len(), 25);
}

#[test]
fn settled_search_resets_to_first_page() {
    let mut browser = loaded_browser(100);
    let ticket = browser.go_to_page(3).expect("page 3 should be reachable");
    assert!(browser.complete(ticket.token, Ok(page_of(25, 100))));

    let now = Instant::now();
    browser.set_search_term("bantul", now);
    assert_eq!(browser.search_input(), "bantul");
    assert!(browser.poll_search(now + Duration::from_millis(100)).is_none());
    assert_eq!(browser.applied_search(), "");

    let ticket = browser
        .poll_search(now + Duration::from_millis(500))
        .expect("search should settle after the delay");
    assert_eq!(browser.page(), 1);
    assert_eq!(ticket.request.filters.search, "bantul");
    assert_eq!(ticket.request.filters.search_columns, vec!["kab", "enumerator"]);
}

#[test]
fn sort_toggles_direction_and_ignores_unsortable_columns() {
    let mut browser = loaded_browser(100);
    let ticket = browser.go_to_page(2).expect("page 2 should be reachable");
    assert!(browser.complete(ticket.token, Ok(page_of(25, 100))));

    let ticket = browser.set_sort("kab").expect("kab should be sortable");
    assert_eq!(ticket.request.sort, SortState::by("kab", SortDirection::Asc));
    assert_eq!(browser.page(), 1);

    let ticket = browser.set_sort("kab").expect("kab should be sortable");
    assert_eq!(ticket.request.sort, SortState::by("kab", SortDirection::Desc));

    assert!(browser.set_sort("productivity").is_none());
    assert_eq!(browser.sort(), &SortState::by("kab", SortDirection::Desc));
}

#[test]
fn sort_on_new_column_after_descending_starts_ascending() {
    let mut browser = loaded_browser(100);
    browser.set_sort("kab").expect("kab should be sortable");
    browser.set_sort("kab").expect("kab should be sortable");
    assert_eq!(browser.sort(), &SortState::by("kab", SortDirection::Desc));

    let ticket = browser.set_sort("id").expect("id should be sortable");

    assert_eq!(ticket.request.sort, SortState::by("id", SortDirection::Asc));
    assert_eq!(ticket.request.offset(), 0);
}

#[test]
fn category_filter_applies_configured_column() {
    let mut browser = loaded_browser(100);
    let ticket = browser.go_to_page(3).expect("page 3 should be reachable");
    assert!(browser.complete(ticket.token, Ok(page_of(25, 100))));

    let ticket = browser
        .set_category(Some("padi".to_string()))
        .expect("new category should refetch");
    assert_eq!(browser.page(), 1);
    assert_eq!(ticket.request.page, 1);
    assert_eq!(ticket.request.offset(), 0);
    assert_eq!(
        ticket.request.filters.category,
        Some(CategoryFilter {
            column: "commodity".to_string(),
            value: "padi".to_string(),
        })
    );
    assert!(browser.set_category(Some("padi".to_string())).is_none());

    let ticket = browser
        .set_category(Some("  ".to_string()))
        .expect("blank value should clear the filter");
    assert_eq!(ticket.request.filters.category, None);
    assert_eq!(browser.category(), None);
}

#[test]
fn failed_fetch_clears_previous_rows() {
    let mut browser = loaded_browser(60);
    let ticket = browser.refresh().expect("mounted browser should refresh");

    assert!(browser.complete(
        ticket.token,
        Err(FetchError::Unavailable("connection refused".to_string()))
    ));

    assert!(browser.records().is_empty());
    assert_eq!(browser.total_count(), 0);
    assert_eq!(
        browser.view_state(),
        ViewState::Failed("data unavailable: connection refused".to_string())
    );
}

#[test]
fn disposed_browser_ignores_late_responses_and_input() {
    let mut browser = ubinan_browser();
    let ticket = browser.refresh().expect("mounted browser should refresh");

    browser.dispose();

    assert!(!browser.is_mounted());
    assert!(!browser.complete(ticket.token, Ok(page_of(3, 3))));
    assert!(browser.records().is_empty());
    assert!(browser.set_category(Some("padi".to_string())).is_none());
    assert!(browser.set_sort("kab").is_none());
    assert!(browser.refresh().is_none());
    assert_eq!(browser.load_state(), &LoadState::Loading);
}

#[test]
fn fetcher_falls_back_when_primary_is_missing() {
    let primary = ScriptedSource::failing(
        "rpc",
        SourceError::NotImplemented("rpc_browse_ubinan_detail".to_string()),
    );
    let fallback = ScriptedSource::ok("table-scan", &["a", "b"], 2);
    let fetcher = PageFetcher::<String>::new(primary.clone()).with_fallback(fallback.clone());

    let page = fetcher
        .fetch(&first_page_request())
        .expect("fallback should serve the page");

    assert_eq!(page.records, vec!["a", "b"]);
    assert_eq!(page.total_count, 2);
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[test]
fn fetcher_skips_fallback_when_primary_succeeds() {
    let primary = ScriptedSource::ok("rpc", &["a"], 41);
    let fallback = ScriptedSource::ok("table-scan", &["z"], 1);
    let fetcher = PageFetcher::<String>::new(primary.clone()).with_fallback(fallback.clone());

    let page = fetcher
        .fetch(&first_page_request())
        .expect("primary should serve the page");

    assert_eq!(page.total_count, 41);
    assert_eq!(fallback.calls(), 0);
}

#[test]
fn fetcher_does_not_retry_validation_errors() {
    let primary = ScriptedSource::failing("rpc", SourceError::Validation("bad column".to_string()));
    let fallback = ScriptedSource::ok("table-scan", &["a"], 1);
    let fetcher = PageFetcher::<String>::new(primary.clone()).with_fallback(fallback.clone());

    let result = fetcher.fetch(&first_page_request());

    assert_eq!(result, Err(FetchError::Validation("bad column".to_string())));
    assert_eq!(fallback.calls(), 0);
}

#[test]
fn fetcher_reports_unavailable_when_every_source_fails() {
    let primary = ScriptedSource::failing("rpc", SourceError::Transient("timeout".to_string()));
    let fallback = ScriptedSource::failing("table-scan", SourceError::Transient("locked".to_string()));
    let fetcher = PageFetcher::<String>::new(primary).with_fallback(fallback.clone());

    let result = fetcher.fetch(&first_page_request());

    assert_eq!(
        result,
        Err(FetchError::Unavailable("backend failure: locked".to_string()))
    );
    assert_eq!(fallback.calls(), 1);

    let lone = PageFetcher::<String>::new(ScriptedSource::failing(
        "rpc",
        SourceError::NotImplemented("rpc_browse_app_user".to_string()),
    ));
    assert!(matches!(
        lone.fetch(&first_page_request()),
        Err(FetchError::Unavailable(_))
    ));
}

#[test]
fn init_db_creates_browsable_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('ubinan_detail','skgb_sample','app_user')",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");

    assert_eq!(table_count, 3, "required tables should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn procedure_source_reports_missing_procedure() {
    let temp_dir = unique_test_dir("missing-procedure");
    let db_path = temp_dir.join("app.sqlite");
    seed_ubinan(&db_path);

    let source = ProcedureSource::<UbinanRecord>::new(db_path.clone());
    let result = source.fetch_records(&ubinan_filters(), &SortState::default(), 25, 0);

    assert_eq!(
        result,
        Err(SourceError::NotImplemented("rpc_browse_ubinan_detail".to_string()))
    );

    let fetcher = build_fetcher::<UbinanRecord>(&db_path);
    let request = crate::domain::entities::query::PageRequest {
        filters: RecordFilters {
            year: Some(2024),
            ..ubinan_filters()
        },
        sort: SortState::default(),
        page: 1,
        page_size: 25,
    };
    let page = fetcher.fetch(&request).expect("table scan should serve the page");
    assert_eq!(ids(&page.records), vec![1, 2, 3, 5]);
    assert_eq!(page.total_count, 4);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn procedure_source_filters_by_search_category_and_year() {
    let temp_dir = unique_test_dir("procedure-filters");
    let db_path = temp_dir.join("app.sqlite");
    seed_ubinan(&db_path);
    install_browse_procedures(&db_path).expect("should install browse procedures");
    let source = ProcedureSource::<UbinanRecord>::new(db_path.clone());

    let search = RecordFilters {
        search: " bud ".to_string(),
        ..ubinan_filters()
    };
    let records = source
        .fetch_records(&search, &SortState::default(), 25, 0)
        .expect("search should succeed");
    assert_eq!(ids(&records), vec![1, 4]);

    let search_this_year = RecordFilters {
        year: Some(2024),
        ..search
    };
    assert_eq!(source.fetch_count(&search_this_year), Ok(1));

    let padi = RecordFilters {
        category: Some(CategoryFilter {
            column: "commodity".to_string(),
            value: "padi".to_string(),
        }),
        year: Some(2024),
        ..ubinan_filters()
    };
    let records = source
        .fetch_records(&padi, &SortState::default(), 25, 0)
        .expect("category filter should succeed");
    assert_eq!(ids(&records), vec![1, 3]);
    assert_eq!(records[0].commodity, Commodity::Padi);
    assert_eq!(records[0].status, SampleStatus::Completed);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn table_scan_sorts_and_pages_with_stable_ties() {
    let temp_dir = unique_test_dir("table-sort");
    let db_path = temp_dir.join("app.sqlite");
    seed_ubinan(&db_path);
    let source = TableScanSource::<UbinanRecord>::new(db_path.clone());
    let this_year = RecordFilters {
        year: Some(2024),
        ..ubinan_filters()
    };

    let records = source
        .fetch_records(&this_year, &SortState::by("kab", SortDirection::Desc), 25, 0)
        .expect("sorted query should succeed");
    assert_eq!(ids(&records), vec![3, 5, 1, 2]);

    let records = source
        .fetch_records(&ubinan_filters(), &SortState::by("id", SortDirection::Asc), 2, 2)
        .expect("paged query should succeed");
    assert_eq!(ids(&records), vec![3, 4]);
    assert_eq!(source.fetch_count(&ubinan_filters()), Ok(5));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn search_treats_like_wildcards_literally() {
    assert_eq!(like_pattern("10%"), "%10\\%%");
    assert_eq!(like_pattern("a_b"), "%a\\_b%");

    let temp_dir = unique_test_dir("like-escape");
    let db_path = temp_dir.join("app.sqlite");
    seed_ubinan(&db_path);
    let source = TableScanSource::<UbinanRecord>::new(db_path.clone());

    for term in ["%", "_10"] {
        let filters = RecordFilters {
            search: term.to_string(),
            ..ubinan_filters()
        };
        let records = source
            .fetch_records(&filters, &SortState::default(), 25, 0)
            .expect("search should succeed");
        assert_eq!(ids(&records), vec![5], "term {term:?} should match literally");
    }

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn sources_reject_unknown_columns() {
    let temp_dir = unique_test_dir("unknown-column");
    let db_path = temp_dir.join("app.sqlite");
    seed_ubinan(&db_path);
    install_browse_procedures(&db_path).expect("should install browse procedures");
    let source = ProcedureSource::<UbinanRecord>::new(db_path.clone());

    let result = source.fetch_records(
        &ubinan_filters(),
        &SortState::by("kab; DROP TABLE ubinan_detail", SortDirection::Asc),
        25,
        0,
    );
    assert!(matches!(result, Err(SourceError::Validation(_))));

    let no_columns = RecordFilters {
        search: "bantul".to_string(),
        ..RecordFilters::default()
    };
    assert!(matches!(
        source.fetch_count(&no_columns),
        Err(SourceError::Validation(_))
    ));

    let fetcher = build_fetcher::<UbinanRecord>(&db_path);
    let mut request = ubinan_browser().current_request();
    request.sort = SortState::by("productivity", SortDirection::Asc);
    assert!(matches!(
        fetcher.fetch(&request),
        Err(FetchError::Validation(_))
    ));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn user_accounts_ignore_reporting_year() {
    let temp_dir = unique_test_dir("users");
    let db_path = temp_dir.join("app.sqlite");
    init_db(&db_path).expect("init_db should succeed");
    let conn = Connection::open(&db_path).expect("should open sqlite db");
    conn.execute(
        "INSERT INTO app_user (username, full_name, role, kab) VALUES ('sari', 'Sari Wulandari', 'pengawas', 'Bantul')",
        [],
    )
    .expect("should insert user");

    let source = TableScanSource::<UserAccount>::new(db_path.clone());
    let filters = RecordFilters {
        year: Some(2024),
        ..RecordFilters::default()
    };
    let users = source
        .fetch_records(&filters, &SortState::by("username", SortDirection::Asc), 25, 0)
        .expect("user query should succeed");

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, UserRole::Supervisor);
    assert_eq!(users[0].cell("role"), "Pengawas");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn import_csv_loads_rows_into_table() {
    let temp_dir = unique_test_dir("import-csv");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    let csv_path = temp_dir.join("skgb.csv");
    fs::write(
        &csv_path,
        "Year,Kab,Kec,Desa,Segment_Code,Enumerator,Status\n\
         2024, Bantul ,Sewon,Bangunharjo,340201001,Budi,belum\n\
         2024,Sleman,Depok,Caturtunggal,340404002,Sari,selesai\n",
    )
    .expect("should write csv");

    let imported =
        import_csv_to_table::<SkgbSample>(&db_path, &csv_path).expect("import should succeed");

    assert_eq!(
        imported,
        ImportResult {
            table: "skgb_sample",
            row_count: 2,
        }
    );

    let source = TableScanSource::<SkgbSample>::new(db_path.clone());
    let samples = source
        .fetch_records(
            &RecordFilters::default(),
            &SortState::by("segment_code", SortDirection::Asc),
            25,
            0,
        )
        .expect("should read imported samples");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].kab, "Bantul");
    assert_eq!(samples[1].status, SampleStatus::Completed);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn import_csv_rejects_unknown_headers() {
    let temp_dir = unique_test_dir("import-bad-header");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    let csv_path = temp_dir.join("bad.csv");
    fs::write(&csv_path, "year,bogus\n2024,x\n").expect("should write csv");

    let err = import_csv_to_table::<UbinanRecord>(&db_path, &csv_path)
        .expect_err("unknown header should fail");

    assert!(err.to_string().contains("bogus"), "unexpected error: {err:#}");
    let source = TableScanSource::<UbinanRecord>::new(db_path.clone());
    assert_eq!(source.fetch_count(&RecordFilters::default()), Ok(0));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn import_csv_rejects_values_rows_cannot_decode() {
    let temp_dir = unique_test_dir("import-bad-values");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    let csv_path = temp_dir.join("ubinan.csv");
    fs::write(
        &csv_path,
        "year,subround,kab,kec,commodity,enumerator,plot_weight_kg,status\n\
         2024,1,Bantul,Sewon,padi,Budi,5.0,selesai\n\
         2024,1,Bantul,Imogiri,PADI_X,Sari,,done\n",
    )
    .expect("should write csv");

    let err = import_csv_to_table::<UbinanRecord>(&db_path, &csv_path)
        .expect_err("undecodable values should fail");

    let message = format!("{err:#}");
    assert!(message.contains("row 2"), "unexpected error: {message}");
    assert!(message.contains("PADI_X"), "unexpected error: {message}");

    let fetcher = build_fetcher::<UbinanRecord>(&db_path);
    let page = fetcher
        .fetch(&crate::domain::entities::query::PageRequest {
            filters: ubinan_filters(),
            sort: SortState::default(),
            page: 1,
            page_size: 25,
        })
        .expect("browsing should still work after a rejected import");
    assert!(page.records.is_empty());
    assert_eq!(page.total_count, 0);

    fs::write(
        &csv_path,
        "year,subround,kab,kec,commodity,enumerator,plot_weight_kg,status\n\
         2024,1,Bantul,Sewon,padi,Budi,5.0,selesai\n\
         2024,1,Bantul,Imogiri,jagung,Sari,,proses\n",
    )
    .expect("should write csv");
    let err = import_csv_to_table::<UbinanRecord>(&db_path, &csv_path)
        .expect_err("blank weight should fail");
    assert!(format!("{err:#}").contains("plot_weight_kg"), "unexpected error: {err:#}");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn load_config_uses_defaults_when_file_missing() {
    let temp_dir = unique_test_dir("config-missing");

    let config = load_config(&temp_dir.join("config.toml")).expect("missing config is fine");

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert!(config.install_procedures);
}

#[test]
fn load_config_reads_toml_overrides() {
    let temp_dir = unique_test_dir("config-toml");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let config_path = temp_dir.join("config.toml");
    fs::write(
        &config_path,
        "page_size = 50\ndebounce_ms = 300\nyear = 2024\n\n[viewer]\nusername = \"sari\"\nrole = \"pengawas\"\n",
    )
    .expect("should write config");

    let config = load_config(&config_path).expect("config should parse");

    assert_eq!(config.page_size, 50);
    assert_eq!(config.debounce_ms, 300);
    assert_eq!(config.viewer.role, UserRole::Supervisor);
    let context = config.browse_context();
    assert_eq!(context.year, Some(2024));
    assert!(!context
        .viewer
        .expect("viewer should be set")
        .role
        .can_manage_users());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn load_config_rejects_invalid_values() {
    let temp_dir = unique_test_dir("config-invalid");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");

    let zero_page = temp_dir.join("zero.toml");
    fs::write(&zero_page, "page_size = 0\n").expect("should write config");
    assert!(load_config(&zero_page).is_err());

    let bad_role = temp_dir.join("role.toml");
    fs::write(&bad_role, "[viewer]\nrole = \"raja\"\n").expect("should write config");
    assert!(load_config(&bad_role).is_err());

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn coded_values_parse_case_insensitively() {
    assert_eq!("PADI".parse::<Commodity>(), Ok(Commodity::Padi));
    assert_eq!(" selesai ".parse::<SampleStatus>(), Ok(SampleStatus::Completed));
    assert_eq!(UserRole::Enumerator.as_str(), "pencacah");

    let err = "gandum".parse::<Commodity>().expect_err("unknown commodity");
    assert_eq!(err.to_string(), "unknown commodity value: \"gandum\"");
}

#[test]
fn ubinan_cells_format_numbers() {
    let record = sample_ubinan(7);

    assert!((record.productivity_ku_ha() - 80.0).abs() < 1e-9);
    assert_eq!(record.cell("plot_weight_kg"), "5.00");
    assert_eq!(record.cell("status"), "Selesai");
    assert_eq!(record.cell("missing"), "");
}

fn assert_spec_matches_binding<B: TableBinding>(spec: &BrowserSpec) {
    let config = spec.browser_config(&AppConfig::default());
    for column in config
        .search_columns
        .iter()
        .chain(config.sortable_columns.iter())
        .chain(config.category_column.iter())
    {
        assert!(B::has_column(column), "{column} should exist on {}", B::TABLE);
    }
    if let Some(column) = &config.initial_sort.column {
        assert!(B::has_column(column), "{column} should exist on {}", B::TABLE);
    }
}

#[test]
fn browser_specs_only_reference_bound_columns() {
    assert_spec_matches_binding::<UbinanRecord>(&ubinan_spec());
    assert_spec_matches_binding::<SkgbSample>(&skgb_spec());
    assert_spec_matches_binding::<UserAccount>(&user_spec());
    assert_eq!(ubinan_spec().category_options.len(), Commodity::ALL.len());
}

#[test]
fn runtime_bootstrap_serves_pages_through_procedures() {
    let temp_dir = unique_test_dir("bootstrap");
    let db_path = temp_dir.join("app.sqlite");
    seed_ubinan(&db_path);

    let runtime = AppRuntime::bootstrap(AppConfig {
        db_path: Some(db_path.clone()),
        year: Some(2023),
        ..AppConfig::default()
    })
    .expect("bootstrap should succeed");

    assert!(runtime.can_manage_users());
    let mut browser = BrowserController::<UbinanRecord>::new(
        ubinan_spec().browser_config(&runtime.config),
        runtime.context.clone(),
    );
    let ticket = browser.refresh().expect("mounted browser should refresh");
    let outcome = runtime.ubinan.fetch(&ticket.request);
    assert!(browser.complete(ticket.token, outcome));
    assert_eq!(ids(browser.records()), vec![4]);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn run_blocking_returns_closure_result() {
    let value = run_blocking(|| 21 * 2).await.expect("blocking task should finish");

    assert_eq!(value, 42);
}
