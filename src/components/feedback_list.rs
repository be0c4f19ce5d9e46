//! Feedback List Page
//!
//! Filter bar plus a table or kanban rendering of the shared item list.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::cancel::LatestRequest;
use crate::components::badges::Spinner;
use crate::components::feedback_kanban::FeedbackKanban;
use crate::components::feedback_table::FeedbackTable;
use crate::context::use_app;
use crate::models::{Feedback, FeedbackFilters, Ordering, Status};
use crate::router::{AppLink, Route};
use crate::store::{store_replace_item, store_set_items, use_feedback_store, FeedbackStateStoreFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Table,
    Kanban,
}

#[component]
pub fn FeedbackList() -> impl IntoView {
    let ctx = use_app();
    let store = use_feedback_store();
    let filters = RwSignal::new(FeedbackFilters::default());
    let (mode, set_mode) = signal(ViewMode::Table);
    let requests = StoredValue::new_local(LatestRequest::new());

    // Re-fetch whenever a filter changes; only the newest response lands
    Effect::new(move |_| {
        let filters = filters.get();
        let ticket = requests.with_value(|r| r.begin());
        let api = ctx.api();
        store.loading().set(true);
        spawn_local(async move {
            let items = api.list_feedback(&filters).await;
            if !ticket.is_current() {
                log::debug!("[FEEDBACK] discarded stale list response ({} items)", items.len());
                return;
            }
            log::info!("[FEEDBACK] loaded {} items", items.len());
            store_set_items(&store, items);
            store.loading().set(false);
        });
    });

    on_cleanup(move || {
        requests.with_value(|r| r.cancel_all());
    });

    // Children report every local copy they want shown
    let on_change = Callback::new(move |item: Feedback| store_replace_item(&store, item));

    let first_load = Memo::new(move |_| store.loading().get() && store.items().read().is_empty());

    let count = move || {
        let n = store.items().read().len();
        if n == 1 { "1 result".to_string() } else { format!("{} results", n) }
    };

    view! {
        <div class="feedback-list-page">
            <header class="page-header">
                <h1>"Feedback"</h1>
                <AppLink to=Route::CreateFeedback class="btn btn-primary">"New feedback"</AppLink>
            </header>

            <div class="filter-bar">
                <input
                    type="search"
                    placeholder="Search feedback..."
                    prop:value=move || filters.with(|f| f.search.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        filters.update(|f| f.search = value);
                    }
                />
                <select on:change=move |ev| {
                    let status = Status::from_str(&event_target_value(&ev));
                    filters.update(|f| f.status = status);
                }>
                    <option value="" selected=move || filters.with(|f| f.status.is_none())>"All statuses"</option>
                    {Status::ALL.into_iter().map(|status| view! {
                        <option
                            value=status.as_str()
                            selected=move || filters.with(|f| f.status == Some(status))
                        >
                            {status.label()}
                        </option>
                    }).collect_view()}
                </select>
                <select on:change=move |ev| {
                    let ordering = Ordering::from_param(&event_target_value(&ev));
                    filters.update(|f| f.ordering = ordering);
                }>
                    {Ordering::ALL.into_iter().map(|ordering| view! {
                        <option
                            value=ordering.as_param()
                            selected=move || filters.with(|f| f.ordering == ordering)
                        >
                            {ordering.label()}
                        </option>
                    }).collect_view()}
                </select>
                <div class="view-toggle">
                    <button
                        class=move || if mode.get() == ViewMode::Table { "toggle-btn active" } else { "toggle-btn" }
                        on:click=move |_| set_mode.set(ViewMode::Table)
                    >
                        "Table"
                    </button>
                    <button
                        class=move || if mode.get() == ViewMode::Kanban { "toggle-btn active" } else { "toggle-btn" }
                        on:click=move |_| set_mode.set(ViewMode::Kanban)
                    >
                        "Kanban"
                    </button>
                </div>
                <span class="results-count">{count}</span>
            </div>

            {move || {
                if first_load.get() {
                    return view! { <Spinner /> }.into_any();
                }
                match mode.get() {
                    ViewMode::Table => view! { <FeedbackTable on_change=on_change /> }.into_any(),
                    ViewMode::Kanban => view! { <FeedbackKanban on_change=on_change /> }.into_any(),
                }
            }}
        </div>
    }
}
