//! Feedback and Board Actions
//!
//! Async operations behind the list, detail and board views. Each one talks
//! to the API and reports every local copy it wants displayed through a
//! callback, so optimistic state and rollbacks stay outside the view code.

use futures::future::join_all;

use crate::api::{ApiClient, ApiError, ApiResult, FieldErrors};
use crate::kanban::{can_drag, move_failure_message, plan_drop, DropPlan, DRAG_DENIED_MESSAGE};
use crate::models::{Board, Comment, Feedback, FeedbackPatch, Status, User, UserRef, VoteAction, VoteResult};
use crate::optimistic::Mutation;

/// Optimistically set a status, then commit the server copy or roll back.
/// `report` sees the optimistic copy first and the settled copy last.
pub async fn change_status(
    api: &ApiClient,
    item: &Feedback,
    to: Status,
    report: &dyn Fn(Feedback),
) -> ApiResult<Feedback> {
    let mutation = Mutation::begin(item, |f| f.status = to);
    report(mutation.current().clone());

    match api.update_feedback(item.id, &FeedbackPatch::status(to)).await {
        Ok(server) => {
            let mutation = mutation.commit(server);
            report(mutation.current().clone());
            Ok(mutation.current().clone())
        }
        Err(err) => {
            log::warn!("[FEEDBACK] status change of #{} to {} rolled back: {}", item.id, to.as_str(), err);
            let mutation = mutation.rollback();
            report(mutation.current().clone());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Not the user's card; nothing was sent
    Denied(String),
    /// Dropped on its own column; nothing was sent
    Unchanged,
    Moved(Feedback),
    /// Server refused; the card is back in its original column
    Failed(String),
    Missing,
}

pub async fn drop_on_column(
    api: &ApiClient,
    user: &User,
    items: &[Feedback],
    id: u32,
    target: Status,
    report: &dyn Fn(Feedback),
) -> DropOutcome {
    let Some(item) = items.iter().find(|item| item.id == id) else {
        return DropOutcome::Missing;
    };
    if !can_drag(user, item) {
        log::info!("[KANBAN] user {} may not move #{}", user.id, id);
        return DropOutcome::Denied(DRAG_DENIED_MESSAGE.to_string());
    }
    match plan_drop(items, id, target) {
        None => DropOutcome::Missing,
        Some(DropPlan::Unchanged) => DropOutcome::Unchanged,
        Some(DropPlan::Move { from, to, .. }) => {
            log::info!("[KANBAN] moving #{} {} -> {}", id, from.as_str(), to.as_str());
            match change_status(api, item, to, report).await {
                Ok(updated) => DropOutcome::Moved(updated),
                Err(err) => DropOutcome::Failed(move_failure_message(&err, user.role)),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub updated: Vec<u32>,
    pub failed: Vec<u32>,
}

/// One concurrent status update per selected item; done when all resolve
pub async fn bulk_update_status(
    api: &ApiClient,
    items: &[Feedback],
    selected: &[u32],
    to: Status,
    report: &dyn Fn(Feedback),
) -> BulkOutcome {
    let targets: Vec<&Feedback> = items.iter().filter(|item| selected.contains(&item.id)).collect();
    let results = join_all(targets.iter().map(|item| change_status(api, item, to, report))).await;

    let mut outcome = BulkOutcome::default();
    for (item, result) in targets.iter().zip(results) {
        match result {
            Ok(_) => outcome.updated.push(item.id),
            Err(_) => outcome.failed.push(item.id),
        }
    }
    if !outcome.failed.is_empty() {
        log::error!("[TABLE] bulk update to {} failed for {:?}", to.as_str(), outcome.failed);
    }
    outcome
}

/// Local copy after the server toggled `user_id`'s vote
pub fn apply_vote(item: &Feedback, user_id: u32, result: &VoteResult) -> Feedback {
    let mut updated = item.clone();
    match result.action {
        VoteAction::Added => {
            if !updated.upvotes.contains(&user_id) {
                updated.upvotes.push(user_id);
            }
        }
        VoteAction::Removed => updated.upvotes.retain(|id| *id != user_id),
    }
    updated.upvote_count = Some(result.upvotes);
    updated
}

pub async fn toggle_vote(api: &ApiClient, item: &Feedback, user_id: u32) -> ApiResult<Feedback> {
    let result = api.vote_feedback(item.id).await?;
    Ok(apply_vote(item, user_id, &result))
}

/// Create a comment; the item's count only changes once the server confirms
pub async fn post_comment(api: &ApiClient, item: &Feedback, content: &str) -> ApiResult<(Comment, Feedback)> {
    let content = content.trim();
    if content.is_empty() {
        let mut errors = FieldErrors::default();
        errors.push("content", "Comment cannot be empty.");
        return Err(ApiError::Validation(errors));
    }
    let comment = api.add_comment(item.id, content).await?;
    let mut updated = item.clone();
    updated.comment_count += 1;
    Ok((comment, updated))
}

/// Join or leave, then reflect the new membership locally
pub async fn toggle_membership(api: &ApiClient, board: &Board, user_id: u32) -> ApiResult<Board> {
    let mut updated = board.clone();
    if board.is_member(user_id) {
        api.leave_board(board.id).await?;
        updated.members.retain(|member| member.id() != user_id);
        updated.member_count = Some(board.member_total().saturating_sub(1));
    } else {
        api.join_board(board.id).await?;
        updated.members.push(UserRef::Id(user_id));
        updated.member_count = Some(board.member_total() + 1);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::api::Method;
    use crate::models::Role;
    use crate::optimistic::replace_by_id;
    use serde_json::json;
    use std::cell::RefCell;

    fn server_copy(item: &Feedback, status: Status) -> serde_json::Value {
        let mut copy = item.clone();
        copy.status = status;
        serde_json::to_value(copy).unwrap()
    }

    #[tokio::test]
    async fn test_drop_on_same_column_sends_nothing() {
        let h = signed_in_harness(sample_user(1, Role::Admin));
        let items = vec![sample_feedback(5, 1, Status::InProgress)];
        let reports = RefCell::new(Vec::new());

        let outcome = drop_on_column(&h.api, &sample_user(1, Role::Admin), &items, 5, Status::InProgress, &|f: Feedback| {
            reports.borrow_mut().push(f)
        })
        .await;

        assert_eq!(outcome, DropOutcome::Unchanged);
        assert!(h.transport.requests().is_empty());
        assert!(reports.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_drop_denied_for_other_authors() {
        let h = signed_in_harness(sample_user(2, Role::Contributor));
        let items = vec![sample_feedback(5, 1, Status::Open)];

        let outcome = drop_on_column(&h.api, &sample_user(2, Role::Contributor), &items, 5, Status::Completed, &|_: Feedback| {})
            .await;

        assert_eq!(outcome, DropOutcome::Denied(DRAG_DENIED_MESSAGE.to_string()));
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_drop_moves_then_commits() {
        let user = sample_user(1, Role::Contributor);
        let h = signed_in_harness(user.clone());
        let item = sample_feedback(5, 1, Status::Open);
        h.transport.respond(Method::Patch, "feedback/5/", 200, server_copy(&item, Status::UnderReview));
        let items = RefCell::new(vec![item.clone()]);
        let snapshot = items.borrow().clone();

        let outcome = drop_on_column(&h.api, &user, &snapshot, 5, Status::UnderReview, &|f: Feedback| {
            replace_by_id(&mut items.borrow_mut(), f);
        })
        .await;

        assert!(matches!(outcome, DropOutcome::Moved(ref f) if f.status == Status::UnderReview));
        assert_eq!(items.borrow()[0].status, Status::UnderReview);
        assert_eq!(h.transport.requests()[0].body, Some(json!({"status": "under_review"})));
    }

    #[tokio::test]
    async fn test_drop_failure_reverts_and_explains() {
        let user = sample_user(1, Role::Contributor);
        let h = signed_in_harness(user.clone());
        let item = sample_feedback(5, 1, Status::Open);
        h.transport.respond(Method::Patch, "feedback/5/", 403, json!({"detail": "nope"}));
        let shown = RefCell::new(Vec::new());

        let outcome = drop_on_column(&h.api, &user, &[item.clone()], 5, Status::Completed, &|f: Feedback| {
            shown.borrow_mut().push(f.status)
        })
        .await;

        // moved immediately, then back
        assert_eq!(*shown.borrow(), vec![Status::Completed, Status::Open]);
        match outcome {
            DropOutcome::Failed(message) => assert!(message.contains("Permission denied")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bulk_update_issues_one_call_per_item() {
        let h = signed_in_harness(sample_user(1, Role::Admin));
        let items: Vec<Feedback> = (1..=3).map(|id| sample_feedback(id, 7, Status::Open)).collect();
        for item in &items {
            h.transport.respond(
                Method::Patch,
                &format!("feedback/{}/", item.id),
                200,
                server_copy(item, Status::Completed),
            );
        }
        let table = RefCell::new(items.clone());

        let outcome = bulk_update_status(&h.api, &items, &[1, 2, 3], Status::Completed, &|f: Feedback| {
            replace_by_id(&mut table.borrow_mut(), f);
        })
        .await;

        assert_eq!(outcome.updated, vec![1, 2, 3]);
        assert!(outcome.failed.is_empty());
        assert_eq!(h.transport.requests().len(), 3);
        assert!(table.borrow().iter().all(|f| f.status == Status::Completed));
    }

    #[tokio::test]
    async fn test_bulk_update_rolls_back_failures() {
        let h = signed_in_harness(sample_user(1, Role::Admin));
        let items: Vec<Feedback> = (1..=2).map(|id| sample_feedback(id, 7, Status::Open)).collect();
        h.transport.respond(Method::Patch, "feedback/1/", 200, server_copy(&items[0], Status::Rejected));
        h.transport.respond(Method::Patch, "feedback/2/", 500, json!({}));
        let table = RefCell::new(items.clone());

        let outcome = bulk_update_status(&h.api, &items, &[1, 2], Status::Rejected, &|f: Feedback| {
            replace_by_id(&mut table.borrow_mut(), f);
        })
        .await;

        assert_eq!(outcome, BulkOutcome { updated: vec![1], failed: vec![2] });
        assert_eq!(table.borrow()[0].status, Status::Rejected);
        assert_eq!(table.borrow()[1].status, Status::Open);
    }

    #[tokio::test]
    async fn test_contributor_bulk_update_keeps_only_permitted_rows() {
        let h = signed_in_harness(sample_user(7, Role::Contributor));
        let own = sample_feedback(1, 7, Status::Open);
        let other = sample_feedback(2, 9, Status::Open);
        h.transport.respond(Method::Patch, "feedback/1/", 200, server_copy(&own, Status::Completed));
        h.transport.respond(
            Method::Patch,
            "feedback/2/",
            403,
            json!({"detail": "You do not have permission to perform this action."}),
        );
        let items = vec![own, other];
        let table = RefCell::new(items.clone());

        let outcome = bulk_update_status(&h.api, &items, &[1, 2], Status::Completed, &|f: Feedback| {
            replace_by_id(&mut table.borrow_mut(), f);
        })
        .await;

        assert_eq!(outcome, BulkOutcome { updated: vec![1], failed: vec![2] });
        assert_eq!(h.transport.requests().len(), 2);
        assert_eq!(table.borrow()[0].status, Status::Completed);
        assert_eq!(table.borrow()[1].status, Status::Open);
        assert!(h.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_voting_twice_restores_count() {
        let h = signed_in_harness(sample_user(4, Role::Contributor));
        h.transport.queue(Method::Post, "feedback/5/vote/", 200, json!({"success": true, "action": "added", "upvotes": 3}));
        h.transport.queue(Method::Post, "feedback/5/vote/", 200, json!({"success": true, "action": "removed", "upvotes": 2}));
        let mut item = sample_feedback(5, 1, Status::Open);
        item.upvotes = vec![8, 9];

        let voted = toggle_vote(&h.api, &item, 4).await.unwrap();
        assert!(voted.has_voted(4));
        assert_eq!(voted.vote_count(), 3);

        let unvoted = toggle_vote(&h.api, &voted, 4).await.unwrap();
        assert!(!unvoted.has_voted(4));
        assert_eq!(unvoted.vote_count(), item.vote_count());
    }

    #[tokio::test]
    async fn test_comment_counted_only_after_creation() {
        let h = signed_in_harness(sample_user(4, Role::Contributor));
        let item = sample_feedback(5, 1, Status::Open);

        let blank = post_comment(&h.api, &item, "   ").await;
        assert!(matches!(blank, Err(ApiError::Validation(_))));
        assert!(h.transport.requests().is_empty());

        h.transport.respond(Method::Post, "comments/", 500, json!({}));
        assert!(post_comment(&h.api, &item, "Nice").await.is_err());

        h.transport.respond(
            Method::Post,
            "comments/",
            201,
            json!({"id": 1, "feedback": 5, "content": "Nice", "created_at": "2024-03-03T12:00:00Z"}),
        );
        let (comment, updated) = post_comment(&h.api, &item, " Nice ").await.unwrap();
        assert_eq!(comment.content, "Nice");
        assert_eq!(updated.comment_count, item.comment_count + 1);
    }

    #[tokio::test]
    async fn test_toggle_membership() {
        let h = signed_in_harness(sample_user(4, Role::Contributor));
        h.transport.respond(Method::Post, "boards/1/join/", 200, json!({"message": "joined"}));
        h.transport.respond(Method::Post, "boards/1/leave/", 200, json!({"message": "left"}));
        let board: Board = serde_json::from_value(json!({"id": 1, "name": "General", "members": [2]})).unwrap();

        let joined = toggle_membership(&h.api, &board, 4).await.unwrap();
        assert!(joined.is_member(4));
        assert_eq!(joined.member_total(), 2);

        let left = toggle_membership(&h.api, &joined, 4).await.unwrap();
        assert!(!left.is_member(4));
        assert_eq!(left.member_total(), 1);
    }
}
