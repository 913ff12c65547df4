//! Various utility functions.

use crate::{
    context::{client::Client, get_client, get_notifications, notifications::Notifications},
    error::WebResult,
};
use cms::{
    endpoints::{Editable, Resource},
    form::Form,
    listing::Outcome,
    page::{Editor, Fetch, Page},
};
use leptos::{prelude::*, IntoView};

/// Generic loading fallback view.
pub fn loading_fallback(text: &'static str) -> impl IntoView {
    view! { <div class="has-text-grey">{text}</div> }.into_view()
}

/// Generic error fallback view.
pub fn errors_fallback(errors: ArcRwSignal<Errors>) -> impl IntoView {
    let errors = errors.get_untracked().into_iter().collect::<Vec<_>>();
    if errors.len() == 1 {
        let (_, error) = &errors[0];
        view! {
            <div class="notification is-danger">{format!("{error}")}</div>
        }
        .into_any()
    } else {
        let errors = errors
            .into_iter()
            .map(|(_, err)| {
                view! { <li>{format!("Error: {err}")}</li> }
            })
            .collect_view();

        view! {
            <div class="content">
                <div>"Errors"</div>
                <ul>
                    {errors}
                </ul>
            </div>
        }
        .into_any()
    }
}

/// Asks the user to confirm a destructive action.
pub fn confirm(message: &str) -> WebResult<bool> {
    let confirmed = leptos::prelude::window()
        .confirm_with_message(message)
        .map_err(|err| eyre::eyre!("Failed to show the confirmation dialog: {err:?}"))?;
    Ok(confirmed)
}

/// Checks that an upload is an image by its MIME type.
pub fn ensure_image(mime_type: &str) -> eyre::Result<()> {
    eyre::ensure!(
        mime_type.starts_with("image/"),
        "Only image files can be uploaded"
    );
    Ok(())
}

/// Drives the fetches of a resource page.
pub struct Loader<R: Resource> {
    pub page: RwSignal<Page<R>>,
    client: Client,
    notifications: Notifications,
}

impl<R: Resource> Clone for Loader<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource> Copy for Loader<R> {}

impl<R: Resource> Loader<R> {
    /// Creates the page state and fetches the first page.
    pub fn new(page: Page<R>) -> Self {
        let loader = Self {
            page: RwSignal::new(page),
            client: get_client(),
            notifications: get_notifications(),
        };
        loader.run(|page| Some(page.refresh()));
        loader
    }

    /// Edits the filter and fetches once the debounce delay passes without further edits.
    pub fn edit_filter(self, edit: impl FnOnce(&mut R::Filter)) {
        let Some((ticket, delay)) = self
            .page
            .try_update(|page| (page.edit_filter(edit), page.debounce()))
        else {
            return;
        };
        leptos::prelude::set_timeout(
            move || self.run(|page| page.settle(ticket)),
            delay,
        );
    }

    pub fn client(self) -> Client {
        self.client
    }

    pub fn notifications(self) -> Notifications {
        self.notifications
    }

    pub fn set_page(self, page_number: u32) {
        self.run(|page| Some(page.set_page(page_number)));
    }

    pub fn set_page_size(self, page_size: u32) {
        self.run(|page| Some(page.set_page_size(page_size)));
    }

    /// Applies a select's choice without the debounce.
    pub fn select_filter(self, edit: impl FnOnce(&mut R::Filter)) {
        self.run(|page| Some(page.select_filter(edit)));
    }

    pub fn apply(self) {
        self.run(|page| Some(page.apply()));
    }

    pub fn refresh(self) {
        self.run(|page| Some(page.refresh()));
    }

    pub fn reset(self) {
        self.run(|page| Some(page.reset()));
    }

    fn run(self, start: impl FnOnce(&mut Page<R>) -> Option<Fetch<R>>) {
        let Some(Some(fetch)) = self.page.try_update(start) else {
            return;
        };
        let Self {
            page,
            client,
            notifications,
        } = self;
        leptos::task::spawn_local(async move {
            let fetched = fetch.run(&client).await;
            match page.try_update(|page| page.finish(fetched)) {
                Some(Outcome::Failed(err)) => {
                    notifications.failure(&err, &format!("Failed to load {}", R::NAME))
                }
                Some(Outcome::Stale) => tracing::debug!("Ignored a stale page of {}", R::NAME),
                _ => {}
            }
        });
    }
}

/// Sends the editor's form once it validates. `saved` runs after the server accepted it.
pub fn submit<R, F>(
    editor: RwSignal<Editor<F>>,
    client: Client,
    notifications: Notifications,
    saved: impl FnOnce() + 'static,
) where
    R: Editable,
    F: Form<Draft = R::Draft> + Send + Sync + 'static,
{
    let Some(Some((target, draft))) = editor.try_update(|editor| editor.begin_submit()) else {
        return;
    };
    tracing::info!("Saving {}", R::NAME);
    leptos::task::spawn_local(async move {
        let result = client.save::<R>(&target, &draft).await;
        match editor.try_update(|editor| editor.finish_submit(result)) {
            Some(Ok(())) => {
                notifications.success("Saved successfully");
                saved();
            }
            Some(Err(err)) => notifications.failure(&err, &format!("Failed to save {}", R::NAME)),
            None => {}
        }
    });
}

/// Deletes a record after the user confirms. `removed` runs after the server deleted it.
pub fn delete<R: Resource>(
    id: String,
    client: Client,
    notifications: Notifications,
    removed: impl FnOnce() + 'static,
) {
    match confirm("Are you sure you want to delete this item?") {
        Ok(true) => {}
        Ok(false) => return,
        Err(err) => {
            tracing::error!("Failed to ask for confirmation: {err}");
            return;
        }
    }
    tracing::info!("Deleting {} {id}", R::NAME);
    leptos::task::spawn_local(async move {
        match client.delete::<R>(&id).await {
            Ok(()) => {
                notifications.success("Deleted successfully");
                removed();
            }
            Err(err) => notifications.failure(&err, &format!("Failed to delete {}", R::NAME)),
        }
    });
}

/// A form field of the editor as a signal and a setter.
pub fn lens<F, T>(
    editor: RwSignal<Editor<F>>,
    get: fn(&F) -> &T,
    set: fn(&mut F) -> &mut T,
) -> (Signal<T>, Callback<T>)
where
    F: Form + Send + Sync + 'static,
    T: Clone + Default + Send + Sync + 'static,
{
    let value = Signal::derive(move || {
        editor.with(|editor| editor.form().map(|form| get(form).clone()).unwrap_or_default())
    });
    let setter = Callback::new(move |value: T| {
        editor.update(|editor| {
            if let Some(form) = editor.form_mut() {
                *set(form) = value;
            }
        })
    });
    (value, setter)
}

/// The error the editor holds for `field`.
pub fn field_error<F>(editor: RwSignal<Editor<F>>, field: &'static str) -> Signal<Option<String>>
where
    F: Form + Send + Sync + 'static,
{
    Signal::derive(move || editor.with(|editor| editor.errors().get(field).map(str::to_string)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_images_can_be_uploaded() {
        ensure_image("image/png").unwrap();
        ensure_image("image/svg+xml").unwrap();

        let error = ensure_image("application/pdf").unwrap_err();
        assert_eq!(error.to_string(), "Only image files can be uploaded");
        assert!(ensure_image("").is_err());
    }
}
