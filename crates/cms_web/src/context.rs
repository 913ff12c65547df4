pub mod client;
pub mod notifications;
pub mod session;

use self::{
    client::{BrowserNavigator, BrowserTransport, Client},
    notifications::Notifications,
    session::Session,
};
use leptos::prelude::*;

pub const DEFAULT_API_URL: &str = "https://localhost:7000/api";

pub fn initialise_context(api_url: &'static str) {
    tracing::trace!("initialising context, backend at {api_url}");

    leptos_meta::provide_meta_context();
    leptos::context::provide_context(BrowserTransport::new(api_url));
    leptos::context::provide_context(Session::new());
    leptos::context::provide_context(Notifications::new());
}

pub fn get_client() -> Client {
    Client::new(
        leptos::prelude::expect_context::<BrowserTransport>(),
        get_session(),
        BrowserNavigator,
    )
}

pub fn get_session() -> Session {
    leptos::prelude::expect_context::<Session>()
}

pub fn get_notifications() -> Notifications {
    leptos::prelude::expect_context::<Notifications>()
}
