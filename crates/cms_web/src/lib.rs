#![allow(clippy::unit_arg)]

pub mod components;
pub mod context;
pub mod error;
pub mod pages;
pub mod utils;

pub use context::DEFAULT_API_URL;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{components::*, StaticSegment};
use pages::*;

/// Wraps the content in a basic layout and a final fallback error boundary which should never actually trigger
#[component]
pub fn App(api_url: &'static str) -> impl IntoView {
    tracing::info!("Rendering app");

    context::initialise_context(api_url);

    let fallback = move |errors: ArcRwSignal<Errors>| {
        errors
            .get_untracked()
            .into_iter()
            .map(|(_key, err)| {
                view! { <div>{format!("Unhandled error: {err}")}</div>}
            })
            .collect_view()
    };

    view! {
            <Meta name="description" content="Admin panel for the site's content"/>
            <Title text="CMS Admin"/>
            <div class="is-flex is-flex-direction-column" style="min-height: 100vh">
                <div class="section is-flex is-flex-grow-1">
                    <div class="container is-fluid">
                        <ErrorBoundary fallback>
                            <Content/>
                        </ErrorBoundary>
                    </div>
                </div>
            </div>
    }
}

/// Contains the router
#[component]
pub fn Content() -> impl IntoView {
    view! {
        <Router>
            <main>
                <FlatRoutes fallback=NotFound>
                    <Route
                        path=StaticSegment("/")
                        view=Dashboard
                    />
                    <Route
                        path=StaticSegment("categories")
                        view=Categories
                    />
                    <Route
                        path=StaticSegment("posts")
                        view=Posts
                    />
                    <Route
                        path=StaticSegment("projects")
                        view=Projects
                    />
                    <Route
                        path=StaticSegment("donations")
                        view=Donations
                    />
                    <Route
                        path=StaticSegment("login")
                        view=Login
                    />
                </FlatRoutes>
            </main>
        </Router>
    }
}
