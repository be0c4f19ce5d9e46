//! Feedback Table Component
//!
//! Row view with selection, per-row status changes and bulk status updates.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{bulk_update_status, change_status};
use crate::components::badges::{PriorityBadge, StatusBadge};
use crate::context::{use_app, FlashKind};
use crate::kanban::can_drag;
use crate::models::{Feedback, Status};
use crate::router::{AppLink, Route};
use crate::store::{use_feedback_store, FeedbackStateStoreFields};

/// Toggle `id` in the selection
fn toggle_selected(selected: &mut Vec<u32>, id: u32) {
    if let Some(pos) = selected.iter().position(|s| *s == id) {
        selected.remove(pos);
    } else {
        selected.push(id);
    }
}

/// Select every visible row, or clear when all are already selected
fn toggle_all(selected: &[u32], visible: &[u32]) -> Vec<u32> {
    let all_selected = !visible.is_empty() && visible.iter().all(|id| selected.contains(id));
    if all_selected {
        Vec::new()
    } else {
        visible.to_vec()
    }
}

#[component]
pub fn FeedbackTable(#[prop(into)] on_change: Callback<Feedback>) -> impl IntoView {
    let ctx = use_app();
    let store = use_feedback_store();
    let selected = RwSignal::new(Vec::<u32>::new());
    let (bulk_status, set_bulk_status) = signal(Status::Completed);
    let (bulk_running, set_bulk_running) = signal(false);

    let visible_ids = move || store.items().read().iter().map(|item| item.id).collect::<Vec<_>>();
    let all_checked = move || {
        let ids = visible_ids();
        !ids.is_empty() && selected.with(|s| ids.iter().all(|id| s.contains(id)))
    };

    let run_bulk = move |_| {
        let ids = selected.get_untracked();
        if ids.is_empty() || bulk_running.get_untracked() {
            return;
        }
        let to = bulk_status.get_untracked();
        let items = store.items().get_untracked();
        let api = ctx.api();
        set_bulk_running.set(true);
        spawn_local(async move {
            let report = move |item: Feedback| on_change.run(item);
            let outcome = bulk_update_status(&api, &items, &ids, to, &report).await;
            if outcome.failed.is_empty() {
                ctx.notify(FlashKind::Success, format!("Updated {} items to {}", outcome.updated.len(), to.label()));
            } else {
                ctx.notify(
                    FlashKind::Error,
                    format!("{} of {} updates failed", outcome.failed.len(), outcome.failed.len() + outcome.updated.len()),
                );
            }
            selected.try_set(Vec::new());
            set_bulk_running.try_set(false);
        });
    };

    let change_row = move |item: Feedback, to: Status| {
        if item.status == to {
            return;
        }
        let api = ctx.api();
        spawn_local(async move {
            let report = move |copy: Feedback| on_change.run(copy);
            if let Err(err) = change_status(&api, &item, to, &report).await {
                ctx.notify(FlashKind::Error, format!("Failed to update status: {}", err.user_message()));
            }
        });
    };

    let rows = move || {
        let user = ctx.current_user();
        store
            .items()
            .get()
            .into_iter()
            .map(|item| {
                let id = item.id;
                let editable = user.as_ref().is_some_and(|u| can_drag(u, &item));
                let status = item.status;
                let row_item = item.clone();
                let status_cell = if editable {
                    view! {
                        <select
                            class="status-select"
                            on:change=move |ev| {
                                if let Some(to) = Status::from_str(&event_target_value(&ev)) {
                                    change_row(row_item.clone(), to);
                                }
                            }
                        >
                            {Status::ALL.into_iter().map(|option| view! {
                                <option value=option.as_str() selected=option == status>{option.label()}</option>
                            }).collect_view()}
                        </select>
                    }
                    .into_any()
                } else {
                    view! { <StatusBadge status=status /> }.into_any()
                };
                let title = item.title.clone();
                view! {
                    <tr class=move || if selected.with(|s| s.contains(&id)) { "selected" } else { "" }>
                        <td>
                            <input
                                type="checkbox"
                                prop:checked=move || selected.with(|s| s.contains(&id))
                                on:change=move |_| selected.update(|s| toggle_selected(s, id))
                            />
                        </td>
                        <td class="title-cell">
                            <AppLink to=Route::FeedbackDetail(id)>{title}</AppLink>
                            <span class="meta">{item.author_display()}</span>
                        </td>
                        <td>{status_cell}</td>
                        <td><PriorityBadge priority=item.priority /></td>
                        <td class="num">{item.vote_count()}</td>
                        <td class="num">{item.comment_count}</td>
                        <td class="date">{item.created_at.format("%Y-%m-%d").to_string()}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <div class="feedback-table">
            // Open to every role; the service rejects rows the user may not change
            <Show when=move || !selected.with(Vec::is_empty)>
                <div class="bulk-bar">
                    <span>{move || format!("{} selected", selected.with(Vec::len))}</span>
                    <select on:change=move |ev| {
                        if let Some(status) = Status::from_str(&event_target_value(&ev)) {
                            set_bulk_status.set(status);
                        }
                    }>
                        {Status::ALL.into_iter().map(|status| view! {
                            <option value=status.as_str() selected=move || bulk_status.get() == status>
                                {status.label()}
                            </option>
                        }).collect_view()}
                    </select>
                    <button class="btn btn-primary" disabled=move || bulk_running.get() on:click=run_bulk>
                        {move || if bulk_running.get() { "Updating..." } else { "Apply" }}
                    </button>
                    <button class="btn btn-secondary" on:click=move |_| selected.set(Vec::new())>"Clear"</button>
                </div>
            </Show>
            <table>
                <thead>
                    <tr>
                        <th>
                            <input
                                type="checkbox"
                                prop:checked=all_checked
                                on:change=move |_| {
                                    let ids = visible_ids();
                                    selected.update(|s| *s = toggle_all(s, &ids));
                                }
                            />
                        </th>
                        <th>"Title"</th>
                        <th>"Status"</th>
                        <th>"Priority"</th>
                        <th>"Votes"</th>
                        <th>"Comments"</th>
                        <th>"Created"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows}
                </tbody>
            </table>
            <Show when=move || store.items().read().is_empty()>
                <p class="empty">"No feedback matches these filters"</p>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_selected() {
        let mut selected = vec![1, 2];
        toggle_selected(&mut selected, 2);
        assert_eq!(selected, vec![1]);
        toggle_selected(&mut selected, 5);
        assert_eq!(selected, vec![1, 5]);
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let visible = [1, 2, 3];
        assert_eq!(toggle_all(&[2], &visible), vec![1, 2, 3]);
        assert!(toggle_all(&[1, 2, 3], &visible).is_empty());
        assert!(toggle_all(&[], &[]).is_empty());
    }
}
