use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    value: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            value: initial,
            pending: None,
            delay,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => {
                let changed = value != self.value;
                self.value = value;
                changed
            }
            still_waiting => {
                self.pending = still_waiting;
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
