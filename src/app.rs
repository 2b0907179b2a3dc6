use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dioxus::prelude::*;
use tracing::info;

use crate::config::{default_config_path, load_config, AppConfig};
use crate::domain::entities::query::{SortDirection, SortState};
use crate::domain::entities::record::{BrowseRecord, SkgbSample, UbinanRecord, UserAccount};
use crate::domain::entities::status::{Commodity, SampleStatus, UserRole};
use crate::infra::import::csv::import_csv_to_table;
use crate::infra::sqlite::bindings::TableBinding;
use crate::infra::sqlite::schema::{init_db, install_browse_procedures};
use crate::infra::sqlite::sources::{ProcedureSource, TableScanSource};
use crate::platform::desktop::dialog::pick_submission_file;
use crate::ui::components::record_browser::{CategoryOption, RecordBrowserView};
use crate::ui::components::record_table::ColumnSpec;
use crate::ui::hooks::use_record_browser;
use crate::ui::state::browser_state::BrowserHandle;
use crate::usecase::services::browser::{BrowseContext, BrowserConfig};
use crate::usecase::services::page_fetcher::PageFetcher;

pub fn build_fetcher<B>(db_path: &Path) -> PageFetcher<B>
where
    B: TableBinding + 'static,
{
    PageFetcher::new(Arc::new(ProcedureSource::<B>::new(db_path.to_path_buf())))
        .with_fallback(Arc::new(TableScanSource::<B>::new(db_path.to_path_buf())))
}

pub struct AppRuntime {
    pub config: AppConfig,
    pub db_path: PathBuf,
    pub context: BrowseContext,
    pub ubinan: Arc<PageFetcher<UbinanRecord>>,
    pub skgb: Arc<PageFetcher<SkgbSample>>,
    pub users: Arc<PageFetcher<UserAccount>>,
}

impl AppRuntime {
    pub fn bootstrap(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let db_path = config.resolve_db_path()?;
        init_db(&db_path)?;
        if config.install_procedures {
            install_browse_procedures(&db_path)?;
        }
        let context = config.browse_context();
        info!(
            db = %db_path.display(),
            year = ?context.year,
            procedures = config.install_procedures,
            "runtime ready"
        );

        Ok(Self {
            ubinan: Arc::new(build_fetcher(&db_path)),
            skgb: Arc::new(build_fetcher(&db_path)),
            users: Arc::new(build_fetcher(&db_path)),
            config,
            db_path,
            context,
        })
    }

    pub fn can_manage_users(&self) -> bool {
        self.context
            .viewer
            .as_ref()
            .is_some_and(|viewer| viewer.role.can_manage_users())
    }
}

#[derive(Clone)]
pub struct SharedRuntime(pub Rc<AppRuntime>);

impl PartialEq for SharedRuntime {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserSpec {
    pub title: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub search_columns: Vec<&'static str>,
    pub category_column: Option<&'static str>,
    pub category_label: &'static str,
    pub category_options: Vec<CategoryOption>,
    pub initial_sort: SortState,
}

impl BrowserSpec {
    pub fn browser_config(&self, config: &AppConfig) -> BrowserConfig {
        BrowserConfig {
            page_size: config.page_size,
            debounce: Duration::from_millis(config.debounce_ms),
            search_columns: self.search_columns.iter().map(|c| c.to_string()).collect(),
            sortable_columns: self
                .columns
                .iter()
                .filter(|c| c.sortable)
                .map(|c| c.key.clone())
                .collect(),
            category_column: self.category_column.map(str::to_string),
            initial_sort: self.initial_sort.clone(),
        }
    }

    pub fn column_keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }
}

fn options_of<T: Copy>(items: &[T], code: fn(T) -> &'static str, label: fn(T) -> &'static str) -> Vec<CategoryOption> {
    items
        .iter()
        .map(|item| CategoryOption {
            value: code(*item).to_string(),
            label: label(*item).to_string(),
        })
        .collect()
}

pub fn ubinan_spec() -> BrowserSpec {
    BrowserSpec {
        title: "Detail Ubinan",
        columns: vec![
            ColumnSpec::new("id", "ID", true),
            ColumnSpec::new("subround", "Subround", true),
            ColumnSpec::new("kab", "Kabupaten", true),
            ColumnSpec::new("kec", "Kecamatan", true),
            ColumnSpec::new("commodity", "Komoditas", true),
            ColumnSpec::new("enumerator", "Pencacah", true),
            ColumnSpec::new("plot_weight_kg", "Berat Plot (kg)", true),
            ColumnSpec::new("productivity", "Produktivitas (ku/ha)", false),
            ColumnSpec::new("status", "Status", true),
        ],
        search_columns: vec!["kab", "kec", "enumerator"],
        category_column: Some("commodity"),
        category_label: "Komoditas",
        category_options: options_of(Commodity::ALL, Commodity::as_str, Commodity::label),
        initial_sort: SortState::by("id", SortDirection::Asc),
    }
}

pub fn skgb_spec() -> BrowserSpec {
    BrowserSpec {
        title: "Sampel SKGB",
        columns: vec![
            ColumnSpec::new("segment_code", "Segmen", true),
            ColumnSpec::new("kab", "Kabupaten", true),
            ColumnSpec::new("kec", "Kecamatan", true),
            ColumnSpec::new("desa", "Desa", true),
            ColumnSpec::new("enumerator", "Pencacah", true),
            ColumnSpec::new("status", "Status", true),
        ],
        search_columns: vec!["segment_code", "kab", "kec", "desa", "enumerator"],
        category_column: Some("status"),
        category_label: "Status",
        category_options: options_of(SampleStatus::ALL, SampleStatus::as_str, SampleStatus::label),
        initial_sort: SortState::by("segment_code", SortDirection::Asc),
    }
}

pub fn user_spec() -> BrowserSpec {
    BrowserSpec {
        title: "Manajemen Pengguna",
        columns: vec![
            ColumnSpec::new("username", "Username", true),
            ColumnSpec::new("full_name", "Nama", true),
            ColumnSpec::new("role", "Peran", true),
            ColumnSpec::new("kab", "Kabupaten", true),
        ],
        search_columns: vec!["username", "full_name"],
        category_column: Some("role"),
        category_label: "Peran",
        category_options: options_of(UserRole::ALL, UserRole::as_str, UserRole::label),
        initial_sort: SortState::by("username", SortDirection::Asc),
    }
}

fn render_browser<R: BrowseRecord + 'static>(spec: &BrowserSpec, handle: BrowserHandle<R>) -> Element {
    let column_keys = spec.column_keys();
    let (rows, sort, category, view_state, page, total_pages, total_count) = {
        let browser = handle.controller.read();
        (
            browser.rows(&column_keys),
            browser.sort().clone(),
            browser.category().map(str::to_string),
            browser.view_state(),
            browser.page(),
            browser.total_pages(),
            browser.total_count(),
        )
    };
    let search_input = handle.search_input.read().clone();

    rsx! {
        RecordBrowserView {
            title: spec.title.to_string(),
            columns: spec.columns.clone(),
            rows: rows,
            sort: sort,
            search_input: search_input,
            category_label: spec.category_label.to_string(),
            category_options: spec.category_options.clone(),
            category: category,
            view_state: view_state,
            page: page,
            total_pages: total_pages,
            total_count: total_count,
            on_search: move |text: String| handle.set_search_term(text),
            on_category: move |value: Option<String>| handle.set_category(value),
            on_sort: move |column: String| handle.toggle_sort(column),
            on_page: move |target: u32| handle.go_to_page(target),
            on_retry: move |_: ()| handle.refresh(),
        }
    }
}

#[component]
fn UbinanBrowser(runtime: SharedRuntime, reload: Signal<u64>) -> Element {
    let spec = ubinan_spec();
    let handle = use_record_browser(
        runtime.0.ubinan.clone(),
        spec.browser_config(&runtime.0.config),
        runtime.0.context.clone(),
        reload,
    );
    render_browser(&spec, handle)
}

#[component]
fn SkgbBrowser(runtime: SharedRuntime, reload: Signal<u64>) -> Element {
    let spec = skgb_spec();
    let handle = use_record_browser(
        runtime.0.skgb.clone(),
        spec.browser_config(&runtime.0.config),
        runtime.0.context.clone(),
        reload,
    );
    render_browser(&spec, handle)
}

#[component]
fn UserBrowser(runtime: SharedRuntime, reload: Signal<u64>) -> Element {
    let spec = user_spec();
    // Accounts are not scoped by reporting year.
    let context = BrowseContext {
        year: None,
        ..runtime.0.context.clone()
    };
    let handle = use_record_browser(
        runtime.0.users.clone(),
        spec.browser_config(&runtime.0.config),
        context,
        reload,
    );
    render_browser(&spec, handle)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserTab {
    Ubinan,
    Skgb,
    Users,
}

impl BrowserTab {
    pub fn label(self) -> &'static str {
        match self {
            BrowserTab::Ubinan => "Ubinan",
            BrowserTab::Skgb => "SKGB",
            BrowserTab::Users => "Pengguna",
        }
    }
}

fn import_for_tab(tab: BrowserTab, db_path: &Path, csv_path: &Path) -> Result<crate::ImportResult> {
    match tab {
        BrowserTab::Ubinan => import_csv_to_table::<UbinanRecord>(db_path, csv_path),
        BrowserTab::Skgb => import_csv_to_table::<SkgbSample>(db_path, csv_path),
        BrowserTab::Users => import_csv_to_table::<UserAccount>(db_path, csv_path),
    }
}

fn bootstrap_from_disk() -> Result<AppRuntime> {
    let config = load_config(&default_config_path()?)?;
    AppRuntime::bootstrap(config)
}

#[component]
pub fn App() -> Element {
    let runtime = use_hook(|| {
        bootstrap_from_disk()
            .map(|runtime| SharedRuntime(Rc::new(runtime)))
            .map_err(|err| format!("{err:#}"))
    });
    let mut active_tab = use_signal(|| BrowserTab::Ubinan);
    let mut reload = use_signal(|| 0_u64);
    let mut status = use_signal(|| "Siap".to_string());

    let runtime = match runtime {
        Ok(runtime) => runtime,
        Err(err) => {
            return rsx! {
                div {
                    p { "Gagal menyiapkan aplikasi: {err}" }
                }
            };
        }
    };

    let tabs: Vec<BrowserTab> = if runtime.0.can_manage_users() {
        vec![BrowserTab::Ubinan, BrowserTab::Skgb, BrowserTab::Users]
    } else {
        vec![BrowserTab::Ubinan, BrowserTab::Skgb]
    };
    let year_label = runtime
        .0
        .context
        .year
        .map(|year| year.to_string())
        .unwrap_or_else(|| "-".to_string());

    let body = match active_tab() {
        BrowserTab::Ubinan => rsx! { UbinanBrowser { runtime: runtime.clone(), reload: reload } },
        BrowserTab::Skgb => rsx! { SkgbBrowser { runtime: runtime.clone(), reload: reload } },
        BrowserTab::Users => rsx! { UserBrowser { runtime: runtime.clone(), reload: reload } },
    };
    let runtime_for_import = runtime.clone();

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; padding: 8px; box-sizing: border-box;",
            nav { style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                {tabs.iter().copied().map(|tab| {
                    let weight = if active_tab() == tab { "bold" } else { "normal" };
                    rsx! {
                        button {
                            style: "font-weight: {weight};",
                            onclick: move |_| active_tab.set(tab),
                            "{tab.label()}"
                        }
                    }
                })}
                button {
                    onclick: move |_| {
                        let Some(csv_path) = pick_submission_file() else {
                            status.set("Impor dibatalkan".to_string());
                            return;
                        };
                        match import_for_tab(active_tab(), &runtime_for_import.0.db_path, &csv_path) {
                            Ok(imported) => {
                                status.set(format!(
                                    "{} baris diimpor ke {}",
                                    imported.row_count, imported.table
                                ));
                                *reload.write() += 1;
                            }
                            Err(err) => {
                                status.set(format!("Impor gagal: {err:#}"));
                            }
                        }
                    },
                    "Impor CSV"
                }
                span { "Tahun {year_label}" }
                span { " {status}" }
            }
            {body}
        }
    }
}
