use dioxus::prelude::*;

use crate::usecase::services::browser::{BrowserController, FetchTicket};

pub struct BrowserHandle<R: 'static> {
    pub controller: Signal<BrowserController<R>>,
    pub search_input: Signal<String>,
    pub pending: Signal<Option<FetchTicket>>,
}

impl<R: 'static> Clone for BrowserHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: 'static> Copy for BrowserHandle<R> {}

impl<R: 'static> BrowserHandle<R> {
    pub fn set_search_term(mut self, text: String) {
        self.search_input.set(text);
    }

    pub fn set_category(mut self, value: Option<String>) {
        let ticket = self.controller.write().set_category(value);
        self.dispatch(ticket);
    }

    pub fn toggle_sort(mut self, column: String) {
        let ticket = self.controller.write().set_sort(&column);
        self.dispatch(ticket);
    }

    pub fn go_to_page(mut self, page: u32) {
        let ticket = self.controller.write().go_to_page(page);
        self.dispatch(ticket);
    }

    pub fn refresh(mut self) {
        let ticket = self.controller.write().refresh();
        self.dispatch(ticket);
    }

    fn dispatch(mut self, ticket: Option<FetchTicket>) {
        if let Some(ticket) = ticket {
            self.pending.set(Some(ticket));
        }
    }
}
