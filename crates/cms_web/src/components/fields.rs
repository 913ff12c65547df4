//! Form inputs bound to a value signal and a setter.

use cms_api::request::Toggle;
use leptos::prelude::*;

#[component]
pub fn FieldError(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || error.get().map(|error| view! { <p class="help is-danger">{error}</p> })
}

#[component]
pub fn TextField(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into, optional)] error: Signal<Option<String>>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let class = move || {
        if error.with(Option::is_some) {
            "input is-danger"
        } else {
            "input"
        }
    };
    view! {
        <div class="field">
            <label class="label">{label}</label>
            <div class="control">
                <input
                    class=class
                    type=input_type
                    placeholder=placeholder
                    prop:value=value
                    on:input=move |ev| on_input.run(event_target_value(&ev))
                />
            </div>
            <FieldError error/>
        </div>
    }
}

#[component]
pub fn TextArea(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into, optional)] error: Signal<Option<String>>,
    #[prop(default = 4)] rows: u32,
) -> impl IntoView {
    view! {
        <div class="field">
            <label class="label">{label}</label>
            <div class="control">
                <textarea
                    class="textarea"
                    rows=rows
                    prop:value=value
                    on:input=move |ev| on_input.run(event_target_value(&ev))
                ></textarea>
            </div>
            <FieldError error/>
        </div>
    }
}

#[component]
pub fn Checkbox(
    label: &'static str,
    #[prop(into)] checked: Signal<bool>,
    on_toggle: Callback<bool>,
) -> impl IntoView {
    view! {
        <div class="field">
            <label class="checkbox">
                <input
                    type="checkbox"
                    class="mr-2"
                    prop:checked=checked
                    on:change=move |ev| on_toggle.run(event_target_checked(&ev))
                />
                {label}
            </label>
        </div>
    }
}

/// A select of `(value, label)` options with an empty first option.
#[component]
pub fn Select(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_select: Callback<String>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    empty_label: &'static str,
    #[prop(into, optional)] error: Signal<Option<String>>,
) -> impl IntoView {
    let options = move || {
        options
            .get()
            .into_iter()
            .map(|(id, text)| {
                let selected = id.clone();
                view! {
                    <option value=id selected=move || value.with(|value| *value == selected)>
                        {text}
                    </option>
                }
            })
            .collect_view()
    };
    view! {
        <div class="field">
            <label class="label">{label}</label>
            <div class="control">
                <div class="select">
                    <select on:change=move |ev| on_select.run(event_target_value(&ev))>
                        <option value="" selected=move || value.with(String::is_empty)>{empty_label}</option>
                        {options}
                    </select>
                </div>
            </div>
            <FieldError error/>
        </div>
    }
}

/// A three-way filter over a yes/no column.
#[component]
pub fn ToggleSelect(
    label: &'static str,
    #[prop(into)] value: Signal<Toggle>,
    on_select: Callback<Toggle>,
    yes: &'static str,
    no: &'static str,
) -> impl IntoView {
    let option = move |toggle: Toggle, text: &'static str| {
        view! {
            <option value=toggle.as_str() selected=move || value.get() == toggle>{text}</option>
        }
    };
    view! {
        <div class="field">
            <label class="label">{label}</label>
            <div class="select">
                <select on:change=move |ev| on_select.run(Toggle::from_str_lossy(&event_target_value(&ev)))>
                    {option(Toggle::All, "All")}
                    {option(Toggle::Yes, yes)}
                    {option(Toggle::No, no)}
                </select>
            </div>
        </div>
    }
}
