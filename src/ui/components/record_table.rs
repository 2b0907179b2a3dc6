use dioxus::prelude::*;

use crate::domain::entities::query::{SortDirection, SortState};
use crate::usecase::services::browser::ViewState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    pub sortable: bool,
}

impl ColumnSpec {
    pub fn new(key: &str, label: &str, sortable: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable,
        }
    }
}

pub fn sort_indicator(sort: &SortState, column: &str) -> &'static str {
    if !sort.is_sorted_by(column) {
        return "";
    }
    match sort.direction {
        SortDirection::Asc => " ▲",
        SortDirection::Desc => " ▼",
    }
}

pub fn table_header_cell_style(sortable: bool) -> String {
    let cursor = if sortable { "pointer" } else { "default" };
    format!(
        "position: sticky; top: 0; z-index: 1; background: #f5f5f5; text-align: left; padding: 6px 10px; border-bottom: 1px solid #ccc; cursor: {cursor}; user-select: none;"
    )
}

#[component]
pub fn RecordTable(
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<String>>,
    sort: SortState,
    view_state: ViewState,
    on_sort: EventHandler<String>,
    on_retry: EventHandler<()>,
) -> Element {
    let colspan = columns.len().max(1);

    let body = match &view_state {
        ViewState::Loading => rsx! {
            tr {
                td { colspan: "{colspan}", style: "padding: 12px; color: #777;", "Memuat data…" }
            }
        },
        ViewState::Empty => rsx! {
            tr {
                td { colspan: "{colspan}", style: "padding: 12px; color: #777;", "Tidak ada data yang cocok." }
            }
        },
        ViewState::Failed(message) => rsx! {
            tr {
                td { colspan: "{colspan}", style: "padding: 12px; color: #b00020;",
                    "Gagal memuat data: {message} "
                    button { onclick: move |_| on_retry.call(()), "Coba lagi" }
                }
            }
        },
        ViewState::Rows => rsx! {
            {rows.iter().map(|row| rsx! {
                tr {
                    {row.iter().map(|cell| rsx! {
                        td { style: "padding: 4px 10px; border-bottom: 1px solid #eee;", "{cell}" }
                    })}
                }
            })}
        },
    };

    rsx! {
        div { style: "overflow: auto; flex: 1 1 auto; min-height: 0;",
            table { style: "border-collapse: collapse; width: 100%;",
                thead {
                    tr {
                        {columns.iter().map(|column| {
                            let key = column.key.clone();
                            let sortable = column.sortable;
                            let indicator = sort_indicator(&sort, &column.key);
                            let style = table_header_cell_style(sortable);
                            rsx! {
                                th {
                                    style: "{style}",
                                    onclick: move |_| {
                                        if sortable {
                                            on_sort.call(key.clone());
                                        }
                                    },
                                    "{column.label}{indicator}"
                                }
                            }
                        })}
                    }
                }
                tbody { {body} }
            }
        }
    }
}
