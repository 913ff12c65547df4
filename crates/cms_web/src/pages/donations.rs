use crate::{
    components::{fields::*, *},
    utils::{self, Loader},
};
use cms::{
    display, endpoints::Donations as DonationsEndpoint, listing::DONATIONS_DEBOUNCE, page::Page,
};
use cms_api::{
    request::{QueryParams, Toggle},
    response::Donation,
};
use leptos::prelude::*;

#[component]
fn DonationDetail(donation: Donation) -> impl IntoView {
    let status = if donation.is_confirmed {
        "Confirmed"
    } else {
        "Pending"
    };
    view! {
        <table class="table is-fullwidth">
            <tbody>
                <tr><th>"Donor"</th><td>{donation.donor_name}</td></tr>
                <tr><th>"Amount"</th><td>{display::format_vnd(donation.amount)}</td></tr>
                <tr><th>"Payment method"</th><td>{donation.payment_method}</td></tr>
                <tr><th>"Status"</th><td>{status}</td></tr>
                <tr><th>"Date"</th><td>{display::format_datetime(&donation.created_at, &chrono::Local)}</td></tr>
                <tr><th>"Message"</th><td>{donation.message.unwrap_or_default()}</td></tr>
            </tbody>
        </table>
    }
}

#[component]
pub fn Donations() -> impl IntoView {
    tracing::info!("Rendering Donations");

    let loader = Loader::<DonationsEndpoint>::new(Page::new(DONATIONS_DEBOUNCE));
    let client = loader.client();
    let notifications = loader.notifications();
    let selected = RwSignal::new(None::<Donation>);

    let keyword = Signal::derive(move || loader.page.with(|page| page.filter().keyword.clone()));
    let confirmed = Signal::derive(move || loader.page.with(|page| page.filter().confirmed));

    let toggle_approval = move |id: String| {
        tracing::info!("Toggling approval of donation {id}");
        leptos::task::spawn_local(async move {
            match client.toggle_donation_approval(&id).await {
                Ok(()) => {
                    notifications.success("Donation status updated");
                    loader.refresh();
                }
                Err(err) => notifications.failure(&err, "Failed to update the donation"),
            }
        });
    };

    let rows = move || {
        loader.page.with(|page| {
            page.listing()
                .rows()
                .iter()
                .map(|donation| {
                    let detail = donation.clone();
                    let toggle_id = donation.id.clone();
                    let delete_id = donation.id.clone();
                    let (status, toggle_label) = if donation.is_confirmed {
                        (
                            view! { <span class="tag is-success">"Confirmed"</span> }.into_any(),
                            "Revoke",
                        )
                    } else {
                        (
                            view! { <span class="tag is-warning">"Pending"</span> }.into_any(),
                            "Approve",
                        )
                    };
                    view! {
                        <tr>
                            <td>{donation.donor_name.clone()}</td>
                            <td class="has-text-right">{display::format_vnd(donation.amount)}</td>
                            <td>{donation.payment_method.clone()}</td>
                            <td>{status}</td>
                            <td>{display::format_datetime(&donation.created_at, &chrono::Local)}</td>
                            <td class="buttons">
                                <button class="button is-small" on:click=move |_ev| selected.set(Some(detail.clone()))>
                                    "Details"
                                </button>
                                <button class="button is-small is-link is-light" on:click=move |_ev| toggle_approval(toggle_id.clone())>
                                    {toggle_label}
                                </button>
                                <button
                                    class="button is-small is-danger is-light"
                                    on:click=move |_ev| {
                                        utils::delete::<DonationsEndpoint>(
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

    view! {
        <AdminLayout>
            <h2 class="title">"Donations"</h2>
            <div class="columns">
                <div class="column">
                    <TextField
                        label="Search"
                        placeholder="Donor"
                        value=keyword
                        on_input=Callback::new(move |keyword: String| loader.edit_filter(|filter| filter.keyword = keyword))
                    />
                </div>
                <div class="column">
                    <ToggleSelect
                        label="Status"
                        value=confirmed
                        on_select=Callback::new(move |confirmed: Toggle| loader.select_filter(|filter| filter.confirmed = confirmed))
                        yes="Confirmed"
                        no="Pending"
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
                        <th>"Donor"</th>
                        <th class="has-text-right">"Amount"</th>
                        <th>"Payment method"</th>
                        <th>"Status"</th>
                        <th>"Date"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
            {move || loader.page.with(|page| page.listing().is_loading()).then(|| utils::loading_fallback("Loading donations..."))}
            <Pagination
                page_number=Signal::derive(move || loader.page.with(|page| page.filter().paging().page_number))
                page_size=Signal::derive(move || loader.page.with(|page| page.filter().paging().page_size))
                total=Signal::derive(move || loader.page.with(|page| page.listing().total()))
                on_page=Callback::new(move |page_number| loader.set_page(page_number))
                on_page_size=Callback::new(move |page_size| loader.set_page_size(page_size))
            />
            <Modal
                title="Donation details".to_string()
                open=Signal::derive(move || selected.with(Option::is_some))
                on_close=Callback::new(move |()| selected.set(None))
            >
                {move || selected.get().map(|donation| view! { <DonationDetail donation/> })}
            </Modal>
        </AdminLayout>
    }
}
