use crate::{
    components::{fields::*, *},
    utils::{self, Loader},
};
use cms::{
    display,
    endpoints::Posts as PostsEndpoint,
    form::{PostForm, POST_UPLOAD_FOLDER},
    listing::POSTS_DEBOUNCE,
    page::{Editor, Page},
};
use cms_api::{
    request::{PostFilter, QueryParams, Toggle},
    response::Post,
};
use leptos::prelude::*;

#[component]
pub fn Posts() -> impl IntoView {
    tracing::info!("Rendering Posts");

    let loader = Loader::<PostsEndpoint>::new(Page::new(POSTS_DEBOUNCE));
    let editor = RwSignal::new(Editor::<PostForm>::default());
    let client = loader.client();
    let notifications = loader.notifications();

    let categories = RwSignal::new(Vec::new());
    leptos::task::spawn_local(async move {
        match client.all_categories().await {
            Ok(all) => categories.set(all),
            Err(err) => notifications.failure(&err, "Failed to load categories"),
        }
    });
    let category_options = Signal::derive(move || {
        categories.with(|categories| {
            categories
                .iter()
                .map(|category| (category.id.clone(), category.name.clone()))
                .collect::<Vec<_>>()
        })
    });

    let filter = move |read: fn(&PostFilter) -> String| {
        Signal::derive(move || loader.page.with(|page| read(page.filter())))
    };
    let published = Signal::derive(move || loader.page.with(|page| page.filter().published));

    let open_edit = move |id: String| {
        leptos::task::spawn_local(async move {
            match client.get::<PostsEndpoint>(&id).await {
                Ok(post) => editor.update(|editor| editor.open_edit(id, PostForm::from(&post))),
                Err(err) => notifications.failure(&err, "Failed to load post"),
            }
        });
    };

    let rows = move || {
        loader.page.with(|page| {
            page.listing()
                .rows()
                .iter()
                .map(|post: &Post| {
                    let id = post.id.clone();
                    let delete_id = post.id.clone();
                    let status = if post.is_published {
                        view! { <span class="tag is-success">"Published"</span> }.into_any()
                    } else {
                        view! { <span class="tag">"Draft"</span> }.into_any()
                    };
                    view! {
                        <tr>
                            <td>{post.title.clone()}</td>
                            <td>{post.category_name.clone()}</td>
                            <td>{post.author_name.clone()}</td>
                            <td>{status}</td>
                            <td>{post.view_count}</td>
                            <td>{display::format_date(&post.created_at, &chrono::Local)}</td>
                            <td class="buttons">
                                <button class="button is-small" on:click=move |_ev| open_edit(id.clone())>
                                    "Edit"
                                </button>
                                <button
                                    class="button is-small is-danger is-light"
                                    on:click=move |_ev| {
                                        utils::delete::<PostsEndpoint>(
                                            delete_id.clone(),
                                            client,
                                            notifications,
                                            move || loader.refresh(),
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

    let (title, set_title) = utils::lens(editor, |form| &form.title, |form| &mut form.title);
    let (summary, set_summary) =
        utils::lens(editor, |form| &form.summary, |form| &mut form.summary);
    let (content, set_content) =
        utils::lens(editor, |form| &form.content, |form| &mut form.content);
    let (category_id, set_category_id) = utils::lens(
        editor,
        |form| &form.category_id,
        |form| &mut form.category_id,
    );
    let (thumbnail, set_thumbnail) = utils::lens(
        editor,
        |form| &form.thumbnail_url,
        |form| &mut form.thumbnail_url,
    );
    let (is_published, set_is_published) = utils::lens(
        editor,
        |form| &form.is_published,
        |form| &mut form.is_published,
    );
    let modal_title = Signal::derive(move || {
        if editor.with(|editor| editor.editing().is_some()) {
            "Edit post".to_string()
        } else {
            "New post".to_string()
        }
    });
    let save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        utils::submit::<PostsEndpoint, _>(editor, client, notifications, move || {
            loader.refresh()
        });
    };

    view! {
        <AdminLayout>
            <div class="level">
                <h2 class="title level-left">"Posts"</h2>
                <button
                    class="button is-primary level-right"
                    on:click=move |_ev| editor.update(|editor| editor.open_create(PostForm::default()))
                >
                    "New post"
                </button>
            </div>
            <div class="columns">
                <div class="column">
                    <TextField
                        label="Search"
                        placeholder="Title"
                        value=filter(|filter| filter.keyword.clone())
                        on_input=Callback::new(move |keyword: String| loader.edit_filter(|filter| filter.keyword = keyword))
                    />
                </div>
                <div class="column">
                    <Select
                        label="Category"
                        value=filter(|filter| filter.category_id.clone().unwrap_or_default())
                        on_select=Callback::new(move |id: String| {
                            loader.select_filter(|filter| filter.category_id = (!id.is_empty()).then_some(id))
                        })
                        options=category_options
                        empty_label="All categories"
                    />
                </div>
                <div class="column">
                    <ToggleSelect
                        label="Status"
                        value=published
                        on_select=Callback::new(move |published: Toggle| loader.select_filter(|filter| filter.published = published))
                        yes="Published"
                        no="Draft"
                    />
                </div>
                <div class="column is-narrow buttons">
                    <button class="button" on:click=move |_ev| loader.reset()>"Reset"</button>
                    <button class="button is-link" on:click=move |_ev| loader.refresh()>"Refresh"</button>
                </div>
            </div>
            <table class="table is-fullwidth is-hoverable">
                <thead>
                    <tr>
                        <th>"Title"</th>
                        <th>"Category"</th>
                        <th>"Author"</th>
                        <th>"Status"</th>
                        <th>"Views"</th>
                        <th>"Created"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
            {move || loader.page.with(|page| page.listing().is_loading()).then(|| utils::loading_fallback("Loading posts..."))}
            <Pagination
                page_number=Signal::derive(move || loader.page.with(|page| page.filter().paging().page_number))
                page_size=Signal::derive(move || loader.page.with(|page| page.filter().paging().page_size))
                total=Signal::derive(move || loader.page.with(|page| page.listing().total()))
                on_page=Callback::new(move |page_number| loader.set_page(page_number))
                on_page_size=Callback::new(move |page_size| loader.set_page_size(page_size))
            />
            <Modal
                title=modal_title
                open=Signal::derive(move || editor.with(|editor| editor.is_open()))
                on_close=Callback::new(move |()| editor.update(|editor| editor.close()))
            >
                <form on:submit=save>
                    <TextField label="Title" value=title on_input=set_title error=utils::field_error(editor, "title")/>
                    <TextArea label="Summary" value=summary on_input=set_summary rows=2/>
                    <TextArea label="Content" value=content on_input=set_content rows=10 error=utils::field_error(editor, "content")/>
                    <Select
                        label="Category"
                        value=category_id
                        on_select=set_category_id
                        options=category_options
                        empty_label="Choose a category"
                        error=utils::field_error(editor, "categoryId")
                    />
                    <label class="label">"Thumbnail"</label>
                    <ImageUpload folder=POST_UPLOAD_FOLDER value=thumbnail on_change=set_thumbnail/>
                    <Checkbox label="Published" checked=is_published on_toggle=set_is_published/>
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
