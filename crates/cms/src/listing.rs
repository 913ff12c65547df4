//! Debounced, generation-tracked listings.
//!
//! Every fetch takes a [`Ticket`] from the listing's [`Generation`]. Only the
//! response for the latest ticket is applied; anything older is dropped.

use crate::error::{ApiError, ApiResult};
use cms_api::response::PagedResult;
use std::time::Duration;

pub const POSTS_DEBOUNCE: Duration = Duration::from_millis(500);
pub const PROJECTS_DEBOUNCE: Duration = Duration::from_millis(600);
pub const DONATIONS_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, Default)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    pub fn next(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// Collapses bursts of submitted values into the last one.
///
/// The caller waits [`Debouncer::delay`] after each [`Debouncer::submit`] and
/// then calls [`Debouncer::settle`] with the returned ticket. Only the last
/// ticket of a burst settles, and only if its value differs from the value
/// settled before.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: Generation,
    pending: Option<T>,
    settled: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Generation::default(),
            pending: None,
            settled: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn submit(&mut self, value: T) -> Ticket {
        self.pending = Some(value);
        self.generation.next()
    }

    pub fn settle(&mut self, ticket: Ticket) -> Option<T> {
        if !self.generation.is_current(ticket) {
            return None;
        }
        let value = self.pending.take()?;
        if self.settled.as_ref() == Some(&value) {
            tracing::trace!("Debounced value unchanged");
            return None;
        }
        self.settled = Some(value.clone());
        Some(value)
    }

    /// Records a value that was acted on without waiting, cancelling anything pending.
    pub fn mark_settled(&mut self, value: T) {
        self.generation.next();
        self.pending = None;
        self.settled = Some(value);
    }
}

#[derive(Debug)]
pub enum Outcome {
    Applied,
    /// A newer fetch was started after this one.
    Stale,
    Failed(ApiError),
}

/// Rows of a resource page and the state of fetching them.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    rows: Vec<T>,
    total: u64,
    loading: bool,
    generation: Generation,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
            loading: false,
            generation: Generation::default(),
        }
    }
}

impl<T> Listing<T> {
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.generation.next()
    }

    pub fn finish(&mut self, ticket: Ticket, result: ApiResult<PagedResult<T>>) -> Outcome {
        self.finish_with(ticket, result, |listing, page| {
            listing.total = page.total_records;
            listing.rows = page.data;
        })
    }

    /// Finishes a fetch of data that is not paged.
    pub fn finish_rows(&mut self, ticket: Ticket, result: ApiResult<Vec<T>>) -> Outcome {
        self.finish_with(ticket, result, |listing, rows| {
            listing.total = rows.len() as u64;
            listing.rows = rows;
        })
    }

    fn finish_with<V>(
        &mut self,
        ticket: Ticket,
        result: ApiResult<V>,
        apply: impl FnOnce(&mut Self, V),
    ) -> Outcome {
        if !self.generation.is_current(ticket) {
            tracing::debug!("Dropping stale response {ticket:?}");
            return Outcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(value) => {
                apply(self, value);
                Outcome::Applied
            }
            Err(err) => Outcome::Failed(err),
        }
    }
}
