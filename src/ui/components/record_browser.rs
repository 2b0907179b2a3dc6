use dioxus::prelude::*;

use crate::domain::entities::query::SortState;
use crate::ui::components::pagination::Pagination;
use crate::ui::components::record_table::{ColumnSpec, RecordTable};
use crate::usecase::services::browser::ViewState;
use crate::NONE_OPTION_VALUE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

pub fn status_line(view_state: &ViewState, page: u32, total_pages: u32, total_count: u64) -> String {
    match view_state {
        ViewState::Loading => "Memuat…".to_string(),
        ViewState::Failed(_) => "Terjadi kesalahan".to_string(),
        ViewState::Empty => "0 data".to_string(),
        ViewState::Rows => format!("{total_count} data · halaman {page} dari {total_pages}"),
    }
}

#[component]
pub fn RecordBrowserView(
    title: String,
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<String>>,
    sort: SortState,
    search_input: String,
    category_label: String,
    category_options: Vec<CategoryOption>,
    #[props(!optional)] category: Option<String>,
    view_state: ViewState,
    page: u32,
    total_pages: u32,
    total_count: u64,
    on_search: EventHandler<String>,
    on_category: EventHandler<Option<String>>,
    on_sort: EventHandler<String>,
    on_page: EventHandler<u32>,
    on_retry: EventHandler<()>,
) -> Element {
    let status = status_line(&view_state, page, total_pages, total_count);
    let selected_category = category.unwrap_or_else(|| NONE_OPTION_VALUE.to_string());

    rsx! {
        section { style: "display: flex; flex-direction: column; gap: 8px; min-height: 0; flex: 1 1 auto;",
            h2 { style: "margin: 0;", "{title}" }
            div { style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
                input {
                    r#type: "search",
                    placeholder: "Cari…",
                    value: "{search_input}",
                    oninput: move |event| on_search.call(event.value()),
                }
                if !category_options.is_empty() {
                    label { "{category_label} " }
                    select {
                        value: "{selected_category}",
                        onchange: move |event| {
                            let value = event.value();
                            on_category.call((value != NONE_OPTION_VALUE).then_some(value));
                        },
                        option { value: "{NONE_OPTION_VALUE}", "Semua" }
                        for opt in category_options.iter() {
                            option { value: "{opt.value}", "{opt.label}" }
                        }
                    }
                }
                span { style: "color: #555;", "{status}" }
            }
            RecordTable {
                columns: columns.clone(),
                rows: rows.clone(),
                sort: sort.clone(),
                view_state: view_state.clone(),
                on_sort: on_sort,
                on_retry: on_retry,
            }
            Pagination { page: page, total_pages: total_pages, on_page: on_page }
        }
    }
}
