use crate::{
    components::{fields::*, *},
    context::{get_client, get_notifications},
    utils,
};
use cms::{
    display,
    endpoints::Categories as CategoriesEndpoint,
    form::CategoryForm,
    listing::Outcome,
    page::{CategoryBoard, Editor},
    tree,
};
use leptos::prelude::*;
use std::slice;

#[component]
pub fn Categories() -> impl IntoView {
    tracing::info!("Rendering Categories");

    let client = get_client();
    let notifications = get_notifications();
    let board = RwSignal::new(CategoryBoard::default());
    let editor = RwSignal::new(Editor::<CategoryForm>::default());

    let load = move || {
        let Some(ticket) = board.try_update(|board| board.begin()) else {
            return;
        };
        leptos::task::spawn_local(async move {
            let result = CategoryBoard::load(&client).await;
            match board.try_update(|board| board.finish(ticket, result)) {
                Some(Outcome::Failed(err)) => {
                    notifications.failure(&err, "Failed to load categories")
                }
                Some(Outcome::Stale) => tracing::debug!("Ignored stale categories"),
                _ => {}
            }
        });
    };
    load();

    let rows = move || {
        board.with(|board| {
            board
                .roots()
                .into_iter()
                .flat_map(|root| tree::flatten(slice::from_ref(root)))
                .map(|tree::Flattened { category, depth }| {
                    let id = category.id.clone();
                    let form = CategoryForm::from(category);
                    let delete_id = category.id.clone();
                    let indent = format!("padding-left: {}rem", 0.75 + depth as f32 * 1.5);
                    view! {
                        <tr>
                            <td style=indent>{category.name.clone()}</td>
                            <td>{category.slug.clone()}</td>
                            <td>{category.description.clone().unwrap_or_default()}</td>
                            <td class="has-text-right">{category.post_count}</td>
                            <td>{display::format_date(&category.created_at, &chrono::Local)}</td>
                            <td class="buttons">
                                <button
                                    class="button is-small"
                                    on:click=move |_ev| {
                                        let form = form.clone();
                                        let id = id.clone();
                                        editor.update(|editor| editor.open_edit(id, form));
                                    }
                                >
                                    "Edit"
                                </button>
                                <button
                                    class="button is-small is-danger is-light"
                                    on:click=move |_ev| {
                                        utils::delete::<CategoriesEndpoint>(
                                            delete_id.clone(),
                                            client,
                                            notifications,
                                            load,
                                        )
                                    }
                                >
                                    "Delete"
                                </button>
                            </td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    let (name, set_name) = utils::lens(editor, |form| &form.name, |form| &mut form.name);
    let (description, set_description) = utils::lens(
        editor,
        |form| &form.description,
        |form| &mut form.description,
    );
    let (parent_id, set_parent_id) =
        utils::lens(editor, |form| &form.parent_id, |form| &mut form.parent_id);
    let parent_options = Signal::derive(move || {
        editor.with(|editor| {
            board.with(|board| {
                board
                    .parent_options(editor.editing())
                    .into_iter()
                    .map(|option| (option.id, option.label))
                    .collect::<Vec<_>>()
            })
        })
    });
    let modal_title = Signal::derive(move || {
        if editor.with(|editor| editor.editing().is_some()) {
            "Edit category".to_string()
        } else {
            "New category".to_string()
        }
    });
    let save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        utils::submit::<CategoriesEndpoint, _>(editor, client, notifications, load);
    };

    view! {
        <AdminLayout>
            <div class="level">
                <h2 class="title level-left">"Categories"</h2>
                <button
                    class="button is-primary level-right"
                    on:click=move |_ev| editor.update(|editor| editor.open_create(CategoryForm::default()))
                >
                    "New category"
                </button>
            </div>
            <div class="columns">
                <div class="column">
                    <TextField
                        label="Search"
                        placeholder="Category name"
                        value=Signal::derive(move || board.with(|board| board.keyword().to_string()))
                        on_input=Callback::new(move |keyword: String| board.update(|board| board.set_keyword(keyword)))
                    />
                </div>
                <div class="column is-narrow buttons">
                    <button class="button is-link" on:click=move |_ev| load()>"Refresh"</button>
                </div>
            </div>
            <table class="table is-fullwidth is-hoverable">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Slug"</th>
                        <th>"Description"</th>
                        <th class="has-text-right">"Posts"</th>
                        <th>"Created"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
            {move || board.with(|board| board.is_loading()).then(|| utils::loading_fallback("Loading categories..."))}
            <p>{move || display::total_label(board.with(|board| board.total()))}</p>
            <Modal
                title=modal_title
                open=Signal::derive(move || editor.with(|editor| editor.is_open()))
                on_close=Callback::new(move |()| editor.update(|editor| editor.close()))
            >
                <form on:submit=save>
                    <TextField label="Name" value=name on_input=set_name error=utils::field_error(editor, "name")/>
                    <TextArea label="Description" value=description on_input=set_description rows=3/>
                    <Select
                        label="Parent"
                        value=parent_id
                        on_select=set_parent_id
                        options=parent_options
                        empty_label="No parent"
                        error=utils::field_error(editor, "parentId")
                    />
                    <div class="buttons">
                        <button
                            class="button is-primary"
                            type="submit"
                            disabled=move || editor.with(|editor| editor.is_submitting())
                        >
                            "Save"
                        </button>
                        <button class="button" type="button" on:click=move |_ev| editor.update(|editor| editor.close())>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Modal>
        </AdminLayout>
    }
}
