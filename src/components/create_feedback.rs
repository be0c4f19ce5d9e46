//! Create Feedback Page

use futures::future::join_all;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiError;
use crate::components::tag_autocomplete::TagAutocomplete;
use crate::context::{use_app, FlashKind};
use crate::forms::FeedbackDraft;
use crate::models::{Board, Priority, Tag};
use crate::router::{use_router, Route};

#[component]
pub fn CreateFeedback() -> impl IntoView {
    let ctx = use_app();
    let router = use_router();

    let (boards, set_boards) = signal(Vec::<Board>::new());
    let (all_tags, set_all_tags) = signal(Vec::<Tag>::new());
    let draft = RwSignal::new(FeedbackDraft::default());
    let tags = RwSignal::new(String::new());
    let (errors, set_errors) = signal(Vec::<String>::new());
    let (submitting, set_submitting) = signal(false);

    let api = ctx.api();
    spawn_local(async move {
        let (loaded_boards, loaded_tags) = futures::join!(api.list_boards(), api.list_tags());
        // First board preselected
        if let Some(first) = loaded_boards.first() {
            let first = first.id;
            draft.try_update(|d| {
                if d.board.is_none() {
                    d.board = Some(first);
                }
            });
        }
        set_boards.try_set(loaded_boards);
        set_all_tags.try_set(loaded_tags);
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let mut current = draft.get_untracked();
        current.tags = tags.get_untracked();
        let new_feedback = match current.validate() {
            Ok(new_feedback) => new_feedback,
            Err(fields) => {
                set_errors.set(fields.lines());
                return;
            }
        };
        set_errors.set(Vec::new());
        set_submitting.set(true);
        let api = ctx.api();
        let known = all_tags.get_untracked();
        spawn_local(async move {
            // Register unknown tags first so they are suggested next time
            let missing: Vec<&String> = new_feedback
                .tags
                .iter()
                .filter(|name| !known.iter().any(|tag| tag.name.eq_ignore_ascii_case(name)))
                .collect();
            let created = join_all(missing.iter().map(|name| api.create_tag(name))).await;
            for (name, result) in missing.iter().zip(created) {
                if let Err(err) = result {
                    log::warn!("[API] creating tag {} failed: {}", name, err);
                }
            }

            match api.create_feedback(&new_feedback).await {
                Ok(created) => {
                    log::info!("[FEEDBACK] created #{}", created.id);
                    ctx.notify(FlashKind::Success, "Feedback submitted");
                    router.navigate(Route::FeedbackList);
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

    view! {
        <div class="form-page">
            <h1>"New feedback"</h1>
            <form class="form-card" on:submit=on_submit>
                <Show when=move || !errors.get().is_empty()>
                    <ul class="form-error">
                        {move || errors.get().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                    </ul>
                </Show>

                <label for="feedback-title">"Title"</label>
                <input
                    id="feedback-title"
                    type="text"
                    placeholder="Short summary"
                    prop:value=move || draft.with(|d| d.title.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.title = value);
                    }
                />

                <label for="feedback-content">"Description"</label>
                <textarea
                    id="feedback-content"
                    rows="8"
                    placeholder="Describe the request or problem (Markdown supported)"
                    prop:value=move || draft.with(|d| d.content.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.content = value);
                    }
                ></textarea>

                <div class="form-row">
                    <div>
                        <label for="feedback-board">"Board"</label>
                        <select id="feedback-board" on:change=move |ev| {
                            let board = event_target_value(&ev).parse().ok();
                            draft.update(|d| d.board = board);
                        }>
                            {move || boards.get().into_iter().map(|board| {
                                let id = board.id;
                                view! {
                                    <option value=id.to_string() selected=move || draft.with(|d| d.board == Some(id))>
                                        {board.name}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                    </div>
                    <div>
                        <label for="feedback-priority">"Priority"</label>
                        <select id="feedback-priority" on:change=move |ev| {
                            if let Some(priority) = Priority::from_str(&event_target_value(&ev)) {
                                draft.update(|d| d.priority = priority);
                            }
                        }>
                            {Priority::ALL.into_iter().map(|priority| view! {
                                <option
                                    value=priority.as_str()
                                    selected=move || draft.with(|d| d.priority == priority)
                                >
                                    {priority.as_str()}
                                </option>
                            }).collect_view()}
                        </select>
                    </div>
                </div>

                <label>"Tags"</label>
                <TagAutocomplete all_tags=all_tags value=tags />

                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Submitting..." } else { "Submit" }}
                    </button>
                    <button type="button" class="btn btn-secondary" on:click=move |_| router.navigate(Route::FeedbackList)>
                        "Cancel"
                    </button>
                </div>
            </form>
        </div>
    }
}
