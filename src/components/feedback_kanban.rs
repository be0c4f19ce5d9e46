//! Feedback Kanban Component
//!
//! One column per status; dragging a card onto another column changes its status.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::*;

use crate::actions::{drop_on_column, DropOutcome};
use crate::components::badges::PriorityBadge;
use crate::context::{use_app, FlashKind};
use crate::kanban::{can_drag, group_by_status, DeniedDrag, DRAG_DENIED_MESSAGE};
use crate::models::{Feedback, Status};
use crate::router::{AppLink, Route};
use crate::store::{use_feedback_store, FeedbackStateStoreFields};

#[component]
pub fn FeedbackKanban(#[prop(into)] on_change: Callback<Feedback>) -> impl IntoView {
    let ctx = use_app();
    let store = use_feedback_store();
    let dnd = create_dnd_signals::<Status>();

    let listeners = bind_global_handlers(dnd, move |dragged_id, target| {
        let Some(user) = ctx.auth.with_untracked(|state| state.user().cloned()) else {
            return;
        };
        let items = store.items().get_untracked();
        let api = ctx.api();
        spawn_local(async move {
            let report = move |item: Feedback| on_change.run(item);
            match drop_on_column(&api, &user, &items, dragged_id, target, &report).await {
                DropOutcome::Moved(item) => {
                    ctx.notify(FlashKind::Success, format!("Moved \"{}\" to {}", item.title, item.status.label()));
                }
                DropOutcome::Denied(message) | DropOutcome::Failed(message) => {
                    ctx.notify(FlashKind::Error, message);
                }
                DropOutcome::Unchanged => {}
                DropOutcome::Missing => log::warn!("[KANBAN] dropped card #{} is not on the board", dragged_id),
            }
        });
    });
    // Listeners detach from the document when this value is dropped
    let listeners = StoredValue::new_local(Some(listeners));
    on_cleanup(move || {
        listeners.try_update_value(|l| *l = None);
    });

    let columns = move || {
        let user = ctx.current_user();
        group_by_status(&store.items().read())
            .into_iter()
            .map(|(status, cards)| {
                let on_enter = make_on_target_mouseenter(dnd, status);
                let on_leave = make_on_mouseleave(dnd);
                let count = cards.len();
                let cards = cards
                    .into_iter()
                    .map(|item| {
                        let draggable = user.as_ref().is_some_and(|u| can_drag(u, &item));
                        view! { <KanbanCard item=item draggable=draggable dnd=dnd /> }
                    })
                    .collect_view();
                view! {
                    <div
                        class=move || if dnd.is_over(status) { "kanban-column drop-over" } else { "kanban-column" }
                        on:mouseenter=on_enter
                        on:mouseleave=on_leave
                    >
                        <div class="kanban-column-header">
                            <span>{status.label()}</span>
                            <span class="count">{count}</span>
                        </div>
                        <div class="kanban-cards">{cards}</div>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <div class=move || if dnd.is_active() { "kanban dragging" } else { "kanban" }>
            {columns}
        </div>
    }
}

#[component]
fn KanbanCard(item: Feedback, draggable: bool, dnd: DndSignals<Status>) -> impl IntoView {
    let ctx = use_app();
    let id = item.id;
    let on_drag_start = make_on_mousedown(dnd, id);
    let denied = StoredValue::new(DeniedDrag::default());

    let on_mousedown = move |ev: web_sys::MouseEvent| {
        if draggable {
            on_drag_start(ev);
        } else {
            denied.update_value(|d| d.press(ev.button(), (ev.client_x(), ev.client_y())));
        }
    };
    let on_mousemove = move |ev: web_sys::MouseEvent| {
        if draggable {
            return;
        }
        let dragging = denied.try_update_value(|d| d.moved((ev.client_x(), ev.client_y())));
        if dragging == Some(true) {
            ctx.notify(FlashKind::Error, DRAG_DENIED_MESSAGE);
        }
    };
    let on_release = move |_: web_sys::MouseEvent| denied.update_value(DeniedDrag::release);

    let class = move || {
        let mut class = String::from("kanban-card");
        if draggable {
            class.push_str(" draggable");
        }
        if dnd.is_dragging(id) {
            class.push_str(" dragging");
        }
        class
    };

    let title = item.title.clone();
    view! {
        <div
            class=class
            on:mousedown=on_mousedown
            on:mousemove=on_mousemove
            on:mouseup=on_release
            on:mouseleave=move |ev| {
                // Leaving mid-press is a drag past the card edge
                on_mousemove(ev.clone());
                on_release(ev);
            }
        >
            // Following the link is not a drag attempt
            <div class="kanban-card-title" on:mousedown=|ev: web_sys::MouseEvent| ev.stop_propagation()>
                <AppLink to=Route::FeedbackDetail(id)>{title}</AppLink>
            </div>
            <div class="kanban-card-meta">
                <PriorityBadge priority=item.priority />
                <span class="votes">{format!("▲ {}", item.vote_count())}</span>
                <span class="comments">{format!("💬 {}", item.comment_count)}</span>
            </div>
            <div class="kanban-card-author">{item.author_display()}</div>
        </div>
    }
}
