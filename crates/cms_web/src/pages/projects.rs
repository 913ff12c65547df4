use crate::{
    components::{fields::*, *},
    utils::{self, Loader},
};
use chrono::NaiveDate;
use cms::{
    display,
    endpoints::Projects as ProjectsEndpoint,
    form::{ProjectForm, PROJECT_UPLOAD_FOLDER},
    listing::PROJECTS_DEBOUNCE,
    page::{Editor, Page},
};
use cms_api::{
    request::{ProjectFilter, QueryParams, Toggle},
    response::Project,
};
use itertools::Itertools;
use leptos::prelude::*;

fn parse_filter_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn project_row(project: &Project) -> (String, String, String) {
    let tech_stacks = project.tech_stacks.iter().map(String::as_str).join(", ");
    let period = match &project.completed_date {
        Some(completed) => format!(
            "{} - {}",
            display::format_date(&project.start_date, &chrono::Local),
            display::format_date(completed, &chrono::Local)
        ),
        None => format!(
            "{} - ongoing",
            display::format_date(&project.start_date, &chrono::Local)
        ),
    };
    (
        project.client_name.clone().unwrap_or_default(),
        tech_stacks,
        period,
    )
}

#[component]
pub fn Projects() -> impl IntoView {
    tracing::info!("Rendering Projects");

    let loader = Loader::<ProjectsEndpoint>::new(Page::new(PROJECTS_DEBOUNCE));
    let editor = RwSignal::new(Editor::<ProjectForm>::default());
    let client = loader.client();
    let notifications = loader.notifications();

    let keyword = Signal::derive(move || loader.page.with(|page| page.filter().keyword.clone()));
    let featured = Signal::derive(move || loader.page.with(|page| page.filter().featured));
    let date = move |read: fn(&ProjectFilter) -> Option<NaiveDate>| {
        Signal::derive(move || {
            loader.page.with(|page| {
                read(page.filter())
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
        })
    };

    let open_edit = move |id: String| {
        leptos::task::spawn_local(async move {
            match client.get::<ProjectsEndpoint>(&id).await {
                Ok(project) => {
                    editor.update(|editor| editor.open_edit(id, ProjectForm::from(&project)))
                }
                Err(err) => notifications.failure(&err, "Failed to load project"),
            }
        });
    };

    let rows = move || {
        loader.page.with(|page| {
            page.listing()
                .rows()
                .iter()
                .map(|project| {
                    let id = project.id.clone();
                    let delete_id = project.id.clone();
                    let (client_name, tech_stacks, period) = project_row(project);
                    let featured = project
                        .is_featured
                        .then(|| view! { <span class="tag is-warning">"Featured"</span> });
                    view! {
                        <tr>
                            <td>{project.name.clone()}</td>
                            <td>{client_name}</td>
                            <td>{tech_stacks}</td>
                            <td>{period}</td>
                            <td>{featured}</td>
                            <td class="buttons">
                                <button class="button is-small" on:click=move |_ev| open_edit(id.clone())>
                                    "Edit"
                                </button>
                                <button
                                    class="button is-small is-danger is-light"
                                    on:click=move |_ev| {
                                        utils::delete::<ProjectsEndpoint>(
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

    let (name, set_name) = utils::lens(editor, |form| &form.name, |form| &mut form.name);
    let (client_name, set_client_name) = utils::lens(
        editor,
        |form| &form.client_name,
        |form| &mut form.client_name,
    );
    let (start_date, set_start_date) =
        utils::lens(editor, |form| &form.start_date, |form| &mut form.start_date);
    let (completed_date, set_completed_date) = utils::lens(
        editor,
        |form| &form.completed_date,
        |form| &mut form.completed_date,
    );
    let (is_featured, set_is_featured) =
        utils::lens(editor, |form| &form.is_featured, |form| &mut form.is_featured);
    let (description, set_description) = utils::lens(
        editor,
        |form| &form.description,
        |form| &mut form.description,
    );
    let (content, set_content) =
        utils::lens(editor, |form| &form.content, |form| &mut form.content);
    let (tech_stacks, set_tech_stacks) = utils::lens(
        editor,
        |form| &form.tech_stacks,
        |form| &mut form.tech_stacks,
    );
    let (live_demo_url, set_live_demo_url) = utils::lens(
        editor,
        |form| &form.live_demo_url,
        |form| &mut form.live_demo_url,
    );
    let (source_code_url, set_source_code_url) = utils::lens(
        editor,
        |form| &form.source_code_url,
        |form| &mut form.source_code_url,
    );
    let (thumbnail, set_thumbnail) = utils::lens(
        editor,
        |form| &form.thumbnail_url,
        |form| &mut form.thumbnail_url,
    );
    let modal_title = Signal::derive(move || {
        if editor.with(|editor| editor.editing().is_some()) {
            "Edit project".to_string()
        } else {
            "New project".to_string()
        }
    });
    let save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        utils::submit::<ProjectsEndpoint, _>(editor, client, notifications, move || {
            loader.refresh()
        });
    };

    view! {
        <AdminLayout>
            <div class="level">
                <h2 class="title level-left">"Projects"</h2>
                <button
                    class="button is-primary level-right"
                    on:click=move |_ev| editor.update(|editor| editor.open_create(ProjectForm::default()))
                >
                    "New project"
                </button>
            </div>
            <div class="columns">
                <div class="column">
                    <TextField
                        label="Search"
                        placeholder="Name or client"
                        value=keyword
                        on_input=Callback::new(move |keyword: String| loader.edit_filter(|filter| filter.keyword = keyword))
                    />
                </div>
                <div class="column">
                    <ToggleSelect
                        label="Featured"
                        value=featured
                        on_select=Callback::new(move |featured: Toggle| loader.select_filter(|filter| filter.featured = featured))
                        yes="Featured"
                        no="Not featured"
                    />
                </div>
                <div class="column">
                    <TextField
                        label="From"
                        input_type="date"
                        value=date(|filter| filter.from_date)
                        on_input=Callback::new(move |from: String| loader.edit_filter(|filter| filter.from_date = parse_filter_date(&from)))
                    />
                </div>
                <div class="column">
                    <TextField
                        label="To"
                        input_type="date"
                        value=date(|filter| filter.to_date)
                        on_input=Callback::new(move |to: String| loader.edit_filter(|filter| filter.to_date = parse_filter_date(&to)))
                    />
                </div>
                <div class="column is-narrow buttons">
                    <button class="button is-link" on:click=move |_ev| loader.apply()>"Apply"</button>
                    <button class="button" on:click=move |_ev| loader.reset()>"Reset"</button>
                </div>
            </div>
            <table class="table is-fullwidth is-hoverable">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Client"</th>
                        <th>"Tech stack"</th>
                        <th>"Period"</th>
                        <th></th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
            {move || loader.page.with(|page| page.listing().is_loading()).then(|| utils::loading_fallback("Loading projects..."))}
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
                    <TextField label="Name" value=name on_input=set_name error=utils::field_error(editor, "name")/>
                    <TextField label="Client" value=client_name on_input=set_client_name/>
                    <div class="columns">
                        <div class="column">
                            <TextField
                                label="Start date"
                                input_type="date"
                                value=start_date
                                on_input=set_start_date
                                error=utils::field_error(editor, "startDate")
                            />
                        </div>
                        <div class="column">
                            <TextField
                                label="Completed date"
                                input_type="date"
                                value=completed_date
                                on_input=set_completed_date
                                error=utils::field_error(editor, "completedDate")
                            />
                        </div>
                    </div>
                    <Checkbox label="Featured" checked=is_featured on_toggle=set_is_featured/>
                    <TextArea label="Description" value=description on_input=set_description rows=3/>
                    <TextArea label="Content" value=content on_input=set_content rows=8/>
                    <TextField
                        label="Tech stack"
                        placeholder="Rust, PostgreSQL, ..."
                        value=tech_stacks
                        on_input=set_tech_stacks
                    />
                    <TextField label="Live demo URL" input_type="url" value=live_demo_url on_input=set_live_demo_url/>
                    <TextField label="Source code URL" input_type="url" value=source_code_url on_input=set_source_code_url/>
                    <label class="label">"Thumbnail"</label>
                    <ImageUpload folder=PROJECT_UPLOAD_FOLDER value=thumbnail on_change=set_thumbnail/>
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
