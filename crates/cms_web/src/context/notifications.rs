//! Transient messages shown at the top of the page.

use cms::{error::ErrorKind, ApiError};
use leptos::{leptos_dom::helpers::TimeoutHandle, prelude::*};
use std::time::Duration;

const VISIBLE_FOR: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Notifications {
    current: RwSignal<Option<Notice>>,
    timeout: StoredValue<Option<TimeoutHandle>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            timeout: StoredValue::new(None),
        }
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.get()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Level::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Level::Error, message.into());
    }

    /// Reports a failed request. Unauthorized requests already went to the
    /// login page and validation failures are shown on the form.
    pub fn failure(&self, error: &ApiError, fallback: &str) {
        match error.kind() {
            ErrorKind::Authorization => {}
            ErrorKind::Validation => self.error(error.user_message("Please check the form")),
            ErrorKind::Generic => self.error(error.user_message(fallback)),
        }
    }

    pub fn dismiss(&self) {
        self.current.set(None);
    }

    fn show(&self, level: Level, message: String) {
        if let Some(handle) = self.timeout.get_value() {
            handle.clear();
        }
        let current = self.current;
        let handle = leptos::prelude::set_timeout_with_handle(
            move || current.set(None),
            VISIBLE_FOR,
        )
        .ok();
        self.timeout.set_value(handle);
        self.current.set(Some(Notice { level, message }));
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
