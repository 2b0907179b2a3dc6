use std::sync::Arc;
use std::time::Instant;

use dioxus::dioxus_core::Task;
use dioxus::prelude::*;

use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::browser_state::BrowserHandle;
use crate::usecase::services::browser::{BrowseContext, BrowserConfig, BrowserController, FetchTicket};
use crate::usecase::services::page_fetcher::{FetchError, PageFetcher};

pub fn use_record_browser<R>(
    fetcher: Arc<PageFetcher<R>>,
    config: BrowserConfig,
    context: BrowseContext,
    reload: Signal<u64>,
) -> BrowserHandle<R>
where
    R: Send + 'static,
{
    let delay = config.debounce;
    let mut controller = use_signal(move || BrowserController::new(config, context));
    let search_input = use_signal(String::new);
    let mut pending = use_signal(|| None::<FetchTicket>);
    let mut debounce_task = use_signal(|| None::<Task>);
    let fetcher = use_hook(move || fetcher);

    use_effect(move || {
        let _generation = reload();
        let ticket = controller.write().refresh();
        if ticket.is_some() {
            pending.set(ticket);
        }
    });

    use_effect(move || {
        let text = search_input();
        controller.write().set_search_term(text, Instant::now());
        if let Some(previous) = debounce_task.write().take() {
            previous.cancel();
        }
        let task = spawn(async move {
            tokio::time::sleep(delay).await;
            let ticket = controller.write().poll_search(Instant::now());
            if let Some(ticket) = ticket {
                pending.set(Some(ticket));
            }
        });
        debounce_task.set(Some(task));
    });

    use_effect(move || {
        let Some(ticket) = pending() else {
            return;
        };
        let fetcher = fetcher.clone();
        spawn(async move {
            let request = ticket.request.clone();
            let outcome = match run_blocking(move || fetcher.fetch(&request)).await {
                Ok(outcome) => outcome,
                Err(err) => Err(FetchError::Unavailable(format!("{err:#}"))),
            };
            controller.write().complete(ticket.token, outcome);
        });
    });

    use_drop(move || {
        if let Ok(mut browser) = controller.try_write() {
            browser.dispose();
        }
    });

    BrowserHandle {
        controller,
        search_input,
        pending,
    }
}
