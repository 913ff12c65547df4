//! Custom components.

pub mod fields;

use crate::{
    context::{
        get_client, get_notifications, get_session,
        notifications::{Level, Notice},
    },
    error::{WebError, WebResult},
    utils,
};
use cms::{
    display,
    guard::{Access, Guard, Route},
};
use leptos::prelude::*;
use leptos_router::components::*;
use send_wrapper::SendWrapper;
use web_sys::HtmlInputElement;

/// Renders the children only when the session passes the guard.
#[component]
pub fn Guarded(children: ChildrenFn, guard: Guard) -> impl IntoView {
    let session = get_session();
    move || match session.check(guard) {
        Access::Allow => children().into_any(),
        Access::Redirect(path) => {
            tracing::info!("Redirecting to {path}");
            view! { <Redirect path=path /> }.into_any()
        }
    }
}

/// Shows the error of a failed action.
#[component]
pub fn ActionView<T, V>(action: Action<T, WebResult<V>>) -> impl IntoView
where
    T: 'static + Send + Sync,
    V: IntoView + Clone + 'static + Send + Sync,
{
    view! {
        <ErrorBoundary fallback={utils::errors_fallback}>
            <div>
                {move || action.value().get()}
            </div>
        </ErrorBoundary>
    }
}

#[component]
pub fn NotificationBar() -> impl IntoView {
    let notifications = get_notifications();
    move || {
        notifications.current().map(|Notice { level, message }| {
            let class = match level {
                Level::Success => "notification is-success",
                Level::Error => "notification is-danger",
            };
            view! {
                <div class=class>
                    <button class="delete" on:click=move |_ev| notifications.dismiss()></button>
                    {message}
                </div>
            }
        })
    }
}

/// The authenticated area: menu, greeting and logout around the page.
#[component]
pub fn AdminLayout(children: ChildrenFn) -> impl IntoView {
    let session = get_session();
    // the guard redirects to the login page once the session is gone
    let logout = move |_ev| session.logout();
    let greeting = move || {
        session
            .user()
            .map(|user| format!("Hello, {}", user.user_name))
    };
    let menu = move || {
        Route::menu()
            .map(|route| {
                view! {
                    <li>
                        <A exact=true href=route.path()>{route.title()}</A>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <Guarded guard=Guard::RequireAuthenticated>
            <div class="columns">
                <aside class="column is-2 menu">
                    <p class="menu-label">"CMS Admin"</p>
                    <ul class="menu-list">
                        {menu}
                    </ul>
                </aside>
                <div class="column">
                    <nav class="navbar is-flex is-vcentered">
                        <span class="is-flex is-flex-grow-1"></span>
                        <span class="mr-3">{greeting}</span>
                        <button class="button is-light" on:click=logout>"Log out"</button>
                    </nav>
                    <NotificationBar/>
                    {children()}
                </div>
            </div>
        </Guarded>
    }
}

#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] open: Signal<bool>,
    on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    move || {
        open.get().then(|| {
            view! {
                <div class="modal is-active">
                    <div class="modal-background" on:click=move |_ev| on_close.run(())></div>
                    <div class="modal-card">
                        <header class="modal-card-head">
                            <p class="modal-card-title">{move || title.get()}</p>
                            <button class="delete" on:click=move |_ev| on_close.run(())></button>
                        </header>
                        <section class="modal-card-body">
                            {children()}
                        </section>
                    </div>
                </div>
            }
        })
    }
}

const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

#[component]
pub fn Pagination(
    #[prop(into)] page_number: Signal<u32>,
    #[prop(into)] page_size: Signal<u32>,
    #[prop(into)] total: Signal<u64>,
    on_page: Callback<u32>,
    on_page_size: Callback<u32>,
) -> impl IntoView {
    let pages = move || display::page_count(total.get(), page_size.get()).max(1);
    let sizes = PAGE_SIZES
        .into_iter()
        .map(|size| {
            view! {
                <option value=size.to_string() selected=move || page_size.get() == size>
                    {format!("{size} / page")}
                </option>
            }
        })
        .collect_view();

    view! {
        <nav class="level mt-4">
            <div class="level-left">
                <span class="level-item">{move || display::total_label(total.get())}</span>
            </div>
            <div class="level-right">
                <button
                    class="button level-item"
                    disabled=move || page_number.get() <= 1
                    on:click=move |_ev| on_page.run(page_number.get_untracked().saturating_sub(1))
                >
                    "Previous"
                </button>
                <span class="level-item">
                    {move || format!("{} / {}", page_number.get(), pages())}
                </span>
                <button
                    class="button level-item"
                    disabled=move || page_number.get() >= pages()
                    on:click=move |_ev| on_page.run(page_number.get_untracked() + 1)
                >
                    "Next"
                </button>
                <div class="select level-item">
                    <select on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse() {
                            on_page_size.run(size);
                        }
                    }>
                        {sizes}
                    </select>
                </div>
            </div>
        </nav>
    }
}

/// Uploads an image and holds its URL.
#[component]
pub fn ImageUpload(
    folder: &'static str,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    let upload = Action::new(move |file: &SendWrapper<web_sys::File>| {
        let file = file.clone();
        let client = get_client();
        let notifications = get_notifications();
        async move {
            let result = SendWrapper::new(client.upload_file(file.take(), folder)).await;
            match result {
                Ok(url) => {
                    on_change.run(url);
                    notifications.success("Image uploaded");
                }
                Err(err) => notifications.failure(&err, "Image upload failed"),
            }
            WebResult::Ok(())
        }
    });

    let on_file = move |ev: leptos::ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        if let Err(err) = utils::ensure_image(&file.type_()) {
            get_notifications().error(WebError::from(err).message);
            input.set_value("");
            return;
        }
        upload.dispatch(SendWrapper::new(file));
    };

    let preview = move || {
        let url = value.get();
        (!url.is_empty()).then(|| {
            view! {
                <figure class="image is-128x128 mb-2">
                    <img src=url alt="Preview"/>
                </figure>
                <button class="button is-small is-danger is-light" type="button"
                    on:click=move |_ev| on_change.run(String::new())>
                    "Remove"
                </button>
            }
        })
    };

    view! {
        <div class="field">
            {preview}
            <div class="file mt-2">
                <label class="file-label">
                    <input class="file-input" type="file" accept="image/*" on:change=on_file/>
                    <span class="file-cta">
                        <span class="file-label">
                            {move || if upload.pending().get() { "Uploading..." } else { "Choose an image" }}
                        </span>
                    </span>
                </label>
            </div>
        </div>
    }
}
