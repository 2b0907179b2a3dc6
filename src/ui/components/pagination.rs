use dioxus::prelude::*;

use crate::domain::pagination::{page_window, PageItem};

#[component]
pub fn Pagination(page: u32, total_pages: u32, on_page: EventHandler<u32>) -> Element {
    if total_pages <= 1 {
        return rsx! {};
    }

    let items = page_window(page, total_pages);
    let at_first = page <= 1;
    let at_last = page >= total_pages;

    rsx! {
        nav { style: "display: flex; gap: 4px; align-items: center; margin-top: 12px;",
            button {
                disabled: at_first,
                onclick: move |_| on_page.call(page.saturating_sub(1)),
                "‹ Sebelumnya"
            }
            {items.into_iter().map(|item| match item {
                PageItem::Page(number) => {
                    let weight = if number == page { "bold" } else { "normal" };
                    rsx! {
                        button {
                            style: "min-width: 32px; font-weight: {weight};",
                            disabled: number == page,
                            onclick: move |_| on_page.call(number),
                            "{number}"
                        }
                    }
                }
                PageItem::Ellipsis => rsx! {
                    span { style: "padding: 0 4px;", "…" }
                },
            })}
            button {
                disabled: at_last,
                onclick: move |_| on_page.call(page + 1),
                "Berikutnya ›"
            }
        }
    }
}
