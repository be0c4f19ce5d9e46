//! Feedback Detail Page
//!
//! Full item with rendered content, voting, status and the comment thread.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{change_status, post_comment, toggle_vote};
use crate::components::badges::{PriorityBadge, Spinner, StatusBadge};
use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::context::{use_app, FlashKind};
use crate::kanban::can_drag;
use crate::markdown::render_markdown;
use crate::models::{Comment, Feedback, Status};
use crate::router::{AppLink, Route};
use crate::store::{store_replace_item, use_feedback_store};

#[derive(Debug, Clone, PartialEq)]
enum Load {
    Loading,
    Failed,
    Ready,
}

/// Drops a deleted comment from the thread and returns the item with one
/// comment fewer. `None` once the page has been unmounted.
fn forget_comment(item: RwSignal<Option<Feedback>>, comments: RwSignal<Vec<Comment>>, comment_id: u32) -> Option<Feedback> {
    comments.try_update(|thread| thread.retain(|c| c.id != comment_id));
    let mut current = item.try_get_untracked().flatten()?;
    current.comment_count = current.comment_count.saturating_sub(1);
    Some(current)
}

#[component]
pub fn FeedbackDetails(id: u32) -> impl IntoView {
    let ctx = use_app();
    let store = use_feedback_store();
    let (load, set_load) = signal(Load::Loading);
    let item = RwSignal::new(None::<Feedback>);
    let comments = RwSignal::new(Vec::<Comment>::new());
    let (voting, set_voting) = signal(false);
    let (draft, set_draft) = signal(String::new());
    let (posting, set_posting) = signal(false);
    // Comment being edited and its working text
    let editing = RwSignal::new(None::<(u32, String)>);

    let api = ctx.api();
    spawn_local(async move {
        let (loaded, thread) = futures::join!(api.get_feedback(id), api.list_comments(Some(id)));
        match loaded {
            Ok(feedback) => {
                item.try_set(Some(feedback));
                comments.try_set(thread);
                set_load.try_set(Load::Ready);
            }
            Err(err) => {
                log::error!("[FEEDBACK] loading #{} failed: {}", id, err);
                set_load.try_set(Load::Failed);
            }
        }
    });

    // Local copy and shared list stay in step
    let show = move |updated: Feedback| {
        item.try_set(Some(updated.clone()));
        store_replace_item(&store, updated);
    };

    let on_vote = move |_| {
        let Some(current) = item.get_untracked() else { return };
        let Some(user) = ctx.current_user() else { return };
        if voting.get_untracked() {
            return;
        }
        set_voting.set(true);
        let api = ctx.api();
        spawn_local(async move {
            match toggle_vote(&api, &current, user.id).await {
                Ok(updated) => show(updated),
                Err(err) => ctx.notify(FlashKind::Error, format!("Vote failed: {}", err.user_message())),
            }
            set_voting.try_set(false);
        });
    };

    let on_status = move |to: Status| {
        let Some(current) = item.get_untracked() else { return };
        if current.status == to {
            return;
        }
        let api = ctx.api();
        spawn_local(async move {
            match change_status(&api, &current, to, &show).await {
                Ok(updated) => ctx.notify(FlashKind::Success, format!("Status set to {}", updated.status.label())),
                Err(err) => ctx.notify(FlashKind::Error, format!("Failed to update status: {}", err.user_message())),
            }
        });
    };

    let on_comment = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = item.get_untracked() else { return };
        if posting.get_untracked() {
            return;
        }
        let content = draft.get_untracked();
        set_posting.set(true);
        let api = ctx.api();
        spawn_local(async move {
            match post_comment(&api, &current, &content).await {
                Ok((comment, updated)) => {
                    comments.try_update(|thread| thread.push(comment));
                    show(updated);
                    set_draft.try_set(String::new());
                }
                Err(err) => ctx.notify(FlashKind::Error, err.user_message()),
            }
            set_posting.try_set(false);
        });
    };

    let on_delete_comment = move |comment_id: u32| {
        let api = ctx.api();
        spawn_local(async move {
            match api.delete_comment(comment_id).await {
                Ok(()) => {
                    if let Some(current) = forget_comment(item, comments, comment_id) {
                        show(current);
                    }
                }
                Err(err) => ctx.notify(FlashKind::Error, format!("Failed to delete comment: {}", err.user_message())),
            }
        });
    };

    let on_save_edit = move |_| {
        let Some((comment_id, content)) = editing.get_untracked() else { return };
        if content.trim().is_empty() {
            ctx.notify(FlashKind::Error, "Comment cannot be empty.");
            return;
        }
        let api = ctx.api();
        spawn_local(async move {
            match api.update_comment(comment_id, content.trim()).await {
                Ok(updated) => {
                    comments.try_update(|thread| {
                        if let Some(slot) = thread.iter_mut().find(|c| c.id == comment_id) {
                            *slot = updated;
                        }
                    });
                    editing.try_set(None);
                }
                Err(err) => ctx.notify(FlashKind::Error, format!("Failed to update comment: {}", err.user_message())),
            }
        });
    };

    let header = move || {
        let feedback = item.get()?;
        let user = ctx.current_user();
        let voted = user.as_ref().is_some_and(|u| feedback.has_voted(u.id));
        let editable = user.as_ref().is_some_and(|u| can_drag(u, &feedback));
        let status = feedback.status;
        Some(view! {
            <header class="detail-header">
                <h1>{feedback.title.clone()}</h1>
                <div class="detail-meta">
                    <StatusBadge status=status />
                    <PriorityBadge priority=feedback.priority />
                    <span>{format!("by {}", feedback.author_display())}</span>
                    <span>{feedback.created_at.format("%Y-%m-%d %H:%M").to_string()}</span>
                    {feedback.board_name.clone().map(|name| view! { <span class="board">{name}</span> })}
                </div>
                <div class="detail-actions">
                    <button
                        class=if voted { "btn vote-btn voted" } else { "btn vote-btn" }
                        disabled=move || voting.get()
                        on:click=on_vote
                    >
                        {format!("▲ {}", feedback.vote_count())}
                    </button>
                    <Show when=move || editable>
                        <select class="status-select" on:change=move |ev| {
                            if let Some(to) = Status::from_str(&event_target_value(&ev)) {
                                on_status(to);
                            }
                        }>
                            {Status::ALL.into_iter().map(|option| view! {
                                <option value=option.as_str() selected=option == status>{option.label()}</option>
                            }).collect_view()}
                        </select>
                    </Show>
                </div>
                <div class="tags">
                    {feedback.tags.iter().map(|tag| view! { <span class="tag">{tag.label()}</span> }).collect_view()}
                </div>
            </header>
            <article class="markdown-body" inner_html=render_markdown(&feedback.content)></article>
        })
    };

    let thread = move || {
        let user = ctx.current_user();
        let elevated = ctx.is_elevated();
        comments
            .get()
            .into_iter()
            .map(|comment| {
                let comment_id = comment.id;
                let own = comment
                    .author
                    .as_ref()
                    .zip(user.as_ref())
                    .is_some_and(|(author, user)| author.id() == user.id);
                let original = comment.content.clone();
                let rendered = render_markdown(&comment.content);
                let is_editing = move || editing.with(|e| e.as_ref().is_some_and(|(id, _)| *id == comment_id));
                view! {
                    <li class="comment">
                        <div class="comment-meta">
                            <strong>{comment.author_display()}</strong>
                            <span>{comment.created_at.format("%Y-%m-%d %H:%M").to_string()}</span>
                            <Show when=move || own && !is_editing()>
                                <button
                                    class="btn btn-link"
                                    on:click={
                                        let original = original.clone();
                                        move |_| editing.set(Some((comment_id, original.clone())))
                                    }
                                >
                                    "Edit"
                                </button>
                            </Show>
                            <Show when=move || own || elevated>
                                <DeleteConfirmButton label="Delete" on_confirm=move |_: ()| on_delete_comment(comment_id) />
                            </Show>
                        </div>
                        <Show
                            when=is_editing
                            fallback={
                                let rendered = rendered.clone();
                                move || view! { <div class="markdown-body" inner_html=rendered.clone()></div> }
                            }
                        >
                            <div class="comment-edit">
                                <textarea
                                    prop:value=move || editing.with(|e| e.as_ref().map(|(_, text)| text.clone()).unwrap_or_default())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        editing.update(|e| {
                                            if let Some((_, text)) = e {
                                                *text = value;
                                            }
                                        });
                                    }
                                ></textarea>
                                <button class="btn btn-primary" on:click=on_save_edit>"Save"</button>
                                <button class="btn btn-secondary" on:click=move |_| editing.set(None)>"Cancel"</button>
                            </div>
                        </Show>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div class="feedback-detail">
            <AppLink to=Route::FeedbackList class="back-link">"← Back to feedback"</AppLink>
            {move || match load.get() {
                Load::Loading => view! { <Spinner /> }.into_any(),
                Load::Failed => view! { <div class="error-box">"Failed to load feedback details"</div> }.into_any(),
                Load::Ready => view! {
                    {header}
                    <section class="comments">
                        <h2>{move || format!("Comments ({})", item.with(|i| i.as_ref().map_or(0, |f| f.comment_count)))}</h2>
                        <ul class="comment-list">{thread}</ul>
                        <form class="comment-form" on:submit=on_comment>
                            <textarea
                                placeholder="Add a comment (Markdown supported)"
                                prop:value=move || draft.get()
                                on:input=move |ev| set_draft.set(event_target_value(&ev))
                            ></textarea>
                            <button type="submit" class="btn btn-primary" disabled=move || posting.get() || draft.with(|d| d.trim().is_empty())>
                                {move || if posting.get() { "Posting..." } else { "Comment" }}
                            </button>
                        </form>
                    </section>
                }
                .into_any(),
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::sample_feedback;
    use chrono::Utc;

    fn comment(id: u32) -> Comment {
        Comment {
            id,
            feedback: Some(1),
            author: None,
            author_name: None,
            content: format!("comment {}", id),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_forget_comment_decrements_count() {
        let owner = Owner::new();
        owner.with(|| {
            let mut feedback = sample_feedback(1, 2, Status::Open);
            feedback.comment_count = 2;
            let item = RwSignal::new(Some(feedback));
            let comments = RwSignal::new(vec![comment(10), comment(11)]);

            let updated = forget_comment(item, comments, 10).unwrap();

            assert_eq!(updated.comment_count, 1);
            assert_eq!(comments.get_untracked().iter().map(|c| c.id).collect::<Vec<_>>(), vec![11]);
        });
    }

    #[test]
    fn test_forget_comment_after_unmount_is_ignored() {
        let owner = Owner::new();
        let (item, comments) = owner.with(|| {
            (RwSignal::new(Some(sample_feedback(1, 2, Status::Open))), RwSignal::new(vec![comment(10)]))
        });
        owner.cleanup();

        assert_eq!(forget_comment(item, comments, 10), None);
    }
}
