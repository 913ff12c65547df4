//! Top level pages.

mod categories;
mod donations;
mod posts;
mod projects;

pub use self::{
    categories::Categories, donations::Donations, posts::Posts, projects::Projects,
};

use crate::{
    components::{fields::*, *},
    context::{get_client, get_notifications, get_session},
    error::{WebError, WebResult},
};
use cms::{
    form::{FieldErrors, Form, LoginForm},
    guard::Route,
};
use leptos::prelude::*;
use leptos_router::components::*;
use send_wrapper::SendWrapper;

#[component]
pub fn Login() -> impl IntoView {
    tracing::info!("Rendering Login");

    let form = RwSignal::new(LoginForm::default());
    let errors = RwSignal::new(FieldErrors::new());
    let submission_act = Action::new(move |&()| {
        tracing::info!("Logging in");
        let client = get_client();
        let session = get_session();
        let notifications = get_notifications();
        let validated = form.get_untracked().validate();
        async move {
            let draft = match validated {
                Ok(draft) => draft,
                Err(invalid) => {
                    errors.set(invalid);
                    return Ok(());
                }
            };
            errors.set(FieldErrors::new());
            let (user, token) = SendWrapper::new(client.login(&draft.email, &draft.password))
                .await
                .map_err(|err| WebError::from_api(&err, "Login failed"))?;
            let user_name = user.user_name.clone();
            session.login(user, token)?;
            notifications.success(format!("Welcome back, {user_name}"));
            WebResult::Ok(())
        }
    });

    let password_visible = RwSignal::new(false);
    let password_visibility_toggle = move || {
        if password_visible.get() {
            view! { <button class="button" type="button" on:click=move |_ev| password_visible.set(false)>"Hide password"</button> }.into_any()
        } else {
            view! { <button class="button" type="button" on:click=move |_ev| password_visible.set(true)>"Show password"</button> }.into_any()
        }
    };
    let password_input_type = move || {
        if password_visible.get() {
            "text"
        } else {
            "password"
        }
    };
    let error = move |field: &'static str| {
        Signal::derive(move || errors.with(|errors| errors.get(field).map(str::to_string)))
    };

    view! {
        <Guarded guard=Route::Login.guard()>
            <div class="columns is-centered">
                <div class="column is-4">
                    <h2 class="title">"CMS Admin"</h2>
                    <form on:submit=move |ev| {
                        ev.prevent_default();
                        submission_act.dispatch(());
                    }>
                        <TextField
                            label="Email"
                            input_type="email"
                            value=Signal::derive(move || form.with(|form| form.email.clone()))
                            on_input=Callback::new(move |email| form.update(|form| form.email = email))
                            error=error("email")
                        />
                        <div class="field">
                            <label class="label">"Password"</label>
                            <div class="control">
                                <input
                                    class="input"
                                    type=password_input_type
                                    prop:value=move || form.with(|form| form.password.clone())
                                    on:input=move |ev| {
                                        let password = event_target_value(&ev);
                                        form.update(|form| form.password = password);
                                    }
                                />
                            </div>
                            <FieldError error=error("password")/>
                        </div>
                        <div class="buttons">
                            <button
                                class="button is-primary"
                                type="submit"
                                disabled=move || submission_act.pending().get()
                            >
                                "Log in"
                            </button>
                            {password_visibility_toggle}
                        </div>
                    </form>
                    <ActionView action=submission_act/>
                </div>
            </div>
        </Guarded>
    }
}

#[component]
pub fn Dashboard() -> impl IntoView {
    tracing::info!("Rendering Dashboard");

    let session = get_session();
    let user_name = move || {
        session
            .user()
            .map(|user| user.user_name)
            .unwrap_or_default()
    };
    let links = move || {
        Route::menu()
            .filter(|route| *route != Route::Dashboard)
            .map(|route| {
                view! {
                    <li>
                        <A href=route.path()>{route.title()}</A>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <AdminLayout>
            <h2 class="title">{move || format!("Welcome, {}", user_name())}</h2>
            <div class="content">
                <ul>
                    {links}
                </ul>
            </div>
        </AdminLayout>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    tracing::info!("Rendering NotFound");

    view! {
        <div class="content">
            <h2 class="title">"Page not found"</h2>
            <A href=Route::Dashboard.path()>"Back to the dashboard"</A>
        </div>
    }
}
