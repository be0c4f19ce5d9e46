//! Create Board Page (admins and moderators)

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiError;
use crate::context::{use_app, FlashKind};
use crate::forms::BoardDraft;
use crate::router::{use_router, AppLink, Route};

#[component]
pub fn CreateBoard() -> impl IntoView {
    let ctx = use_app();
    let router = use_router();

    let draft = RwSignal::new(BoardDraft::default());
    let (errors, set_errors) = signal(Vec::<String>::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let new_board = match draft.get_untracked().validate() {
            Ok(new_board) => new_board,
            Err(fields) => {
                set_errors.set(fields.lines());
                return;
            }
        };
        set_errors.set(Vec::new());
        set_submitting.set(true);
        let api = ctx.api();
        spawn_local(async move {
            match api.create_board(&new_board).await {
                Ok(board) => {
                    log::info!("[API] created board #{}", board.id);
                    ctx.notify(FlashKind::Success, format!("Board {} created", board.name));
                    router.navigate(Route::Boards);
                }
                Err(ApiError::Validation(fields)) if !fields.is_empty() => {
                    set_errors.try_set(fields.lines());
                }
                Err(err) => {
                    set_errors.try_set(vec![err.user_message()]);
                }
            }
            set_submitting.try_set(false);
        });
    };

    let form = move || {
        view! {
            <form class="form-card" on:submit=on_submit>
                <Show when=move || !errors.get().is_empty()>
                    <ul class="form-error">
                        {move || errors.get().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                    </ul>
                </Show>
                <label for="board-name">"Name"</label>
                <input
                    id="board-name"
                    type="text"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.name = value);
                    }
                />
                <label for="board-description">"Description"</label>
                <textarea
                    id="board-description"
                    rows="4"
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.description = value);
                    }
                ></textarea>
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || draft.with(|d| d.is_public)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            draft.update(|d| d.is_public = checked);
                        }
                    />
                    "Public board"
                </label>
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Creating..." } else { "Create board" }}
                    </button>
                    <AppLink to=Route::Boards class="btn btn-secondary">"Cancel"</AppLink>
                </div>
            </form>
        }
    };

    view! {
        <div class="form-page">
            <h1>"New board"</h1>
            <Show
                when=move || ctx.is_elevated()
                fallback=|| view! {
                    <div class="error-box">"Access denied: only admins and moderators can create boards."</div>
                }
            >
                {form}
            </Show>
        </div>
    }
}
