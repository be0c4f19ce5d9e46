//! Board Management Page
//!
//! Lists boards with membership controls; admins and moderators can delete
//! boards and add members.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::toggle_membership;
use crate::components::badges::Spinner;
use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::context::{use_app, FlashKind};
use crate::markdown::render_markdown_inline;
use crate::models::{Board, BoardPatch, User};
use crate::router::{AppLink, Route};
use crate::store::{store_remove_board, store_replace_board, store_set_boards, use_feedback_store, FeedbackStateStoreFields};

#[component]
pub fn BoardManagement() -> impl IntoView {
    let ctx = use_app();
    let store = use_feedback_store();
    let (loaded, set_loaded) = signal(false);
    let (users, set_users) = signal(Vec::<User>::new());

    let api = ctx.api();
    let elevated = ctx.auth.with_untracked(|state| state.role().is_some_and(|role| role.is_elevated()));
    spawn_local(async move {
        let boards = api.list_boards().await;
        log::info!("[API] loaded {} boards", boards.len());
        store_set_boards(&store, boards);
        set_loaded.try_set(true);
        // Username suggestions for adding members
        if elevated {
            set_users.try_set(api.list_users().await);
        }
    });

    let list = move || {
        let boards = store.boards().get();
        if boards.is_empty() {
            return view! { <p class="empty">"No boards yet"</p> }.into_any();
        }
        boards
            .into_iter()
            .map(|board| view! { <BoardCard board=board /> })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="boards-page">
            <datalist id="known-users">
                {move || users.get().into_iter().map(|user| view! { <option value=user.username></option> }).collect_view()}
            </datalist>
            <header class="page-header">
                <h1>"Boards"</h1>
                <Show when=move || ctx.is_elevated()>
                    <AppLink to=Route::CreateBoard class="btn btn-primary">"New board"</AppLink>
                </Show>
            </header>
            {move || if loaded.get() {
                view! { <div class="board-grid">{list}</div> }.into_any()
            } else {
                view! { <Spinner /> }.into_any()
            }}
        </div>
    }
}

#[component]
fn BoardCard(board: Board) -> impl IntoView {
    let ctx = use_app();
    let store = use_feedback_store();
    let board = StoredValue::new(board);
    let (busy, set_busy) = signal(false);
    let (new_member, set_new_member) = signal(String::new());

    let member = move || {
        let user = ctx.current_user();
        user.is_some_and(|u| board.with_value(|b| b.is_member(u.id)))
    };

    let on_toggle = move |_| {
        let Some(user) = ctx.current_user() else { return };
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        let current = board.get_value();
        let api = ctx.api();
        spawn_local(async move {
            match toggle_membership(&api, &current, user.id).await {
                Ok(updated) => {
                    let joined = updated.is_member(user.id);
                    ctx.notify(
                        FlashKind::Success,
                        if joined { format!("Joined {}", updated.name) } else { format!("Left {}", updated.name) },
                    );
                    store_replace_board(&store, updated);
                }
                Err(err) => ctx.notify(FlashKind::Error, format!("Membership change failed: {}", err.user_message())),
            }
            set_busy.try_set(false);
        });
    };

    let on_delete = move |_: ()| {
        let current = board.get_value();
        let api = ctx.api();
        spawn_local(async move {
            match api.delete_board(current.id).await {
                Ok(()) => {
                    log::info!("[API] deleted board #{}", current.id);
                    ctx.notify(FlashKind::Success, format!("Deleted {}", current.name));
                    store_remove_board(&store, current.id);
                }
                Err(err) => ctx.notify(FlashKind::Error, format!("Delete failed: {}", err.user_message())),
            }
        });
    };

    let on_add_member = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let username = new_member.get_untracked().trim().to_string();
        if username.is_empty() {
            return;
        }
        let current = board.get_value();
        let api = ctx.api();
        spawn_local(async move {
            match api.add_board_member(current.id, &username).await {
                Ok(()) => {
                    set_new_member.try_set(String::new());
                    ctx.notify(FlashKind::Success, format!("Added {} to {}", username, current.name));
                    // The response has no member id; reload the board for it
                    match api.get_board(current.id).await {
                        Ok(updated) => store_replace_board(&store, updated),
                        Err(err) => log::warn!("[API] reloading board #{} failed: {}", current.id, err),
                    }
                }
                Err(err) => ctx.notify(FlashKind::Error, format!("Could not add member: {}", err.user_message())),
            }
        });
    };

    let on_visibility = move |_| {
        let current = board.get_value();
        let patch = BoardPatch {
            is_public: Some(!current.is_public),
            ..Default::default()
        };
        let api = ctx.api();
        spawn_local(async move {
            match api.update_board(current.id, &patch).await {
                Ok(updated) => store_replace_board(&store, updated),
                Err(err) => ctx.notify(FlashKind::Error, format!("Update failed: {}", err.user_message())),
            }
        });
    };

    let (name, description, is_public, members, feedback) = board.with_value(|b| {
        (b.name.clone(), render_markdown_inline(&b.description), b.is_public, b.member_total(), b.feedback_count.unwrap_or(0))
    });

    view! {
        <div class="board-card">
            <div class="board-card-header">
                <h2>{name}</h2>
                <span class="badge">{if is_public { "Public" } else { "Private" }}</span>
            </div>
            <p class="board-description" inner_html=description></p>
            <div class="board-stats">
                <span>{format!("{} members", members)}</span>
                <span>{format!("{} feedback", feedback)}</span>
            </div>
            <div class="board-actions">
                <button class="btn btn-secondary" disabled=move || busy.get() on:click=on_toggle>
                    {move || if member() { "Leave" } else { "Join" }}
                </button>
                <Show when=move || ctx.is_elevated()>
                    <button class="btn btn-secondary" on:click=on_visibility>
                        {if is_public { "Make private" } else { "Make public" }}
                    </button>
                    <DeleteConfirmButton label="Delete" on_confirm=on_delete />
                </Show>
            </div>
            <Show when=move || ctx.is_elevated()>
                <form class="add-member" on:submit=on_add_member>
                    <input
                        type="text"
                        placeholder="Add member by username"
                        list="known-users"
                        prop:value=move || new_member.get()
                        on:input=move |ev| set_new_member.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn btn-secondary">"Add"</button>
                </form>
            </Show>
        </div>
    }
}
