//! State behind the resource pages: the filtered listing and the editor modal.

use crate::{
    client::{ApiClient, Credentials, Navigator, Transport},
    endpoints::{Resource, Target},
    error::{ApiError, ApiResult},
    form::{FieldErrors, Form},
    listing::{Debouncer, Listing, Outcome, Ticket},
    tree,
};
use cms_api::{
    request::QueryParams,
    response::{Category, PagedResult},
};
use std::time::Duration;

/// A fetch the page asked for.
#[derive(Debug, Clone)]
pub struct Fetch<R: Resource> {
    pub ticket: Ticket,
    pub filter: R::Filter,
}

#[derive(Debug)]
pub struct Fetched<R: Resource> {
    pub ticket: Ticket,
    pub result: ApiResult<PagedResult<R::Item>>,
}

impl<R: Resource> Fetch<R> {
    pub async fn run<T, C, N>(self, client: &ApiClient<T, C, N>) -> Fetched<R>
    where
        T: Transport,
        C: Credentials,
        N: Navigator,
    {
        Fetched {
            ticket: self.ticket,
            result: client.list::<R>(&self.filter).await,
        }
    }
}

/// A paged, filtered listing of a resource.
///
/// Filter edits are debounced and go back to the first page. Paging, refreshes
/// and the apply button fetch right away.
#[derive(Debug, Clone)]
pub struct Page<R: Resource> {
    filter: R::Filter,
    debouncer: Debouncer<R::Filter>,
    listing: Listing<R::Item>,
}

impl<R: Resource> Page<R> {
    pub fn new(debounce: Duration) -> Self {
        let filter = R::Filter::default();
        let mut debouncer = Debouncer::new(debounce);
        debouncer.mark_settled(filter.clone());
        Self {
            filter,
            debouncer,
            listing: Listing::default(),
        }
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn listing(&self) -> &Listing<R::Item> {
        &self.listing
    }

    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Edits the filter. Settle the returned ticket once the debounce delay has passed.
    pub fn edit_filter(&mut self, edit: impl FnOnce(&mut R::Filter)) -> Ticket {
        edit(&mut self.filter);
        self.filter.paging_mut().page_number = 1;
        self.debouncer.submit(self.filter.clone())
    }

    /// The fetch for a debounced filter edit, unless a later edit superseded it
    /// or the filter ended up unchanged.
    pub fn settle(&mut self, ticket: Ticket) -> Option<Fetch<R>> {
        let filter = self.debouncer.settle(ticket)?;
        Some(self.fetch(filter))
    }

    /// Applies a discrete filter choice at once, dropping any pending edit.
    pub fn select_filter(&mut self, edit: impl FnOnce(&mut R::Filter)) -> Fetch<R> {
        edit(&mut self.filter);
        self.filter.paging_mut().page_number = 1;
        self.fetch_now()
    }

    pub fn set_page(&mut self, page_number: u32) -> Fetch<R> {
        self.filter.paging_mut().page_number = page_number.max(1);
        self.fetch_now()
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Fetch<R> {
        let paging = self.filter.paging_mut();
        paging.page_size = page_size.max(1);
        paging.page_number = 1;
        self.fetch_now()
    }

    /// Fetches the current filter, skipping the debounce delay.
    pub fn apply(&mut self) -> Fetch<R> {
        self.fetch_now()
    }

    /// Fetches the current filter again.
    pub fn refresh(&mut self) -> Fetch<R> {
        self.fetch_now()
    }

    /// Clears the filter and fetches the first page.
    pub fn reset(&mut self) -> Fetch<R> {
        self.filter = R::Filter::default();
        self.fetch_now()
    }

    pub fn finish(&mut self, fetched: Fetched<R>) -> Outcome {
        self.listing.finish(fetched.ticket, fetched.result)
    }

    fn fetch_now(&mut self) -> Fetch<R> {
        self.debouncer.mark_settled(self.filter.clone());
        self.fetch(self.filter.clone())
    }

    fn fetch(&mut self, filter: R::Filter) -> Fetch<R> {
        Fetch {
            ticket: self.listing.begin(),
            filter,
        }
    }
}

/// The category tree and the flat list, fetched together.
#[derive(Debug, Clone, Default)]
pub struct CategoryBoard {
    keyword: String,
    tree: Listing<Category>,
    all: Vec<Category>,
}

pub type CategoriesFetched = ApiResult<(Vec<Category>, Vec<Category>)>;

impl CategoryBoard {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Filters the root rows without fetching.
    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    pub fn is_loading(&self) -> bool {
        self.tree.is_loading()
    }

    /// Root rows matching the keyword.
    pub fn roots(&self) -> Vec<&Category> {
        tree::filter_roots(self.tree.rows(), &self.keyword)
    }

    pub fn total(&self) -> u64 {
        self.tree.total()
    }

    pub fn all(&self) -> &[Category] {
        &self.all
    }

    pub fn parent_options(&self, editing: Option<&str>) -> Vec<tree::ParentOption> {
        tree::parent_options(&self.all, editing)
    }

    pub fn begin(&mut self) -> Ticket {
        self.tree.begin()
    }

    pub async fn load<T, C, N>(client: &ApiClient<T, C, N>) -> CategoriesFetched
    where
        T: Transport,
        C: Credentials,
        N: Navigator,
    {
        futures_util::future::try_join(client.category_tree(), client.all_categories()).await
    }

    pub fn finish(&mut self, ticket: Ticket, result: CategoriesFetched) -> Outcome {
        let mut all = None;
        let result = result.map(|(tree, flat)| {
            all = Some(flat);
            tree
        });
        let outcome = self.tree.finish_rows(ticket, result);
        if let (Outcome::Applied, Some(all)) = (&outcome, all) {
            self.all = all;
        }
        outcome
    }
}

/// The create/edit modal.
#[derive(Debug, Clone)]
pub struct Editor<F> {
    open: Option<(Target, F)>,
    submitting: bool,
    errors: FieldErrors,
}

impl<F> Default for Editor<F> {
    fn default() -> Self {
        Self {
            open: None,
            submitting: false,
            errors: FieldErrors::default(),
        }
    }
}

impl<F: Form> Editor<F> {
    pub fn open_create(&mut self, form: F) {
        self.open = Some((Target::Create, form));
        self.errors = FieldErrors::default();
    }

    pub fn open_edit(&mut self, id: impl Into<String>, form: F) {
        self.open = Some((Target::Update(id.into()), form));
        self.errors = FieldErrors::default();
    }

    pub fn close(&mut self) {
        self.open = None;
        self.submitting = false;
        self.errors = FieldErrors::default();
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn target(&self) -> Option<&Target> {
        self.open.as_ref().map(|(target, _)| target)
    }

    /// Id of the record being edited.
    pub fn editing(&self) -> Option<&str> {
        match self.target()? {
            Target::Update(id) => Some(id),
            Target::Create => None,
        }
    }

    pub fn form(&self) -> Option<&F> {
        self.open.as_ref().map(|(_, form)| form)
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        self.open.as_mut().map(|(_, form)| form)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validates the form. Returns what to send, or nothing if the form is
    /// invalid, closed, or already being submitted.
    pub fn begin_submit(&mut self) -> Option<(Target, F::Draft)> {
        if self.submitting {
            return None;
        }
        let (target, form) = self.open.as_ref()?;
        match form.validate() {
            Ok(draft) => {
                self.errors = FieldErrors::default();
                self.submitting = true;
                Some((target.clone(), draft))
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Closes the editor on success. Validation failures stay on the form
    /// fields, other failures are returned for a notification.
    pub fn finish_submit(&mut self, result: ApiResult<()>) -> Result<(), ApiError> {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.close();
                Ok(())
            }
            Err(err) => {
                if let ApiError::Validation { fields, .. } = &err {
                    self.errors = FieldErrors::from_server(fields);
                }
                Err(err)
            }
        }
    }
}
