//! Feedback Endpoints

use super::{ApiClient, ApiResult};
use crate::models::{Feedback, FeedbackCounts, FeedbackFilters, FeedbackPatch, NewFeedback, TrendPoint, VoteResult};

impl ApiClient {
    pub async fn list_feedback(&self, filters: &FeedbackFilters) -> Vec<Feedback> {
        self.get_list("feedback/", &filters.to_query()).await
    }

    pub async fn get_feedback(&self, id: u32) -> ApiResult<Feedback> {
        self.get(&format!("feedback/{}/", id), &[]).await
    }

    pub async fn create_feedback(&self, feedback: &NewFeedback) -> ApiResult<Feedback> {
        self.post("feedback/", feedback).await
    }

    pub async fn update_feedback(&self, id: u32, patch: &FeedbackPatch) -> ApiResult<Feedback> {
        self.patch(&format!("feedback/{}/", id), patch).await
    }

    /// Toggle the current user's vote
    pub async fn vote_feedback(&self, id: u32) -> ApiResult<VoteResult> {
        self.post_action(&format!("feedback/{}/vote/", id)).await
    }

    /// Server-side per-status totals (the dashboard derives its own)
    #[allow(dead_code)]
    pub async fn feedback_counts(&self) -> FeedbackCounts {
        match self.get("feedback/counts/", &[]).await {
            Ok(counts) => counts,
            Err(err) => {
                log::warn!("[API] feedback counts unavailable: {}", err);
                FeedbackCounts::default()
            }
        }
    }

    #[allow(dead_code)]
    pub async fn top_voted_feedback(&self) -> Vec<Feedback> {
        self.get_list("feedback/top_voted/", &[]).await
    }

    pub async fn feedback_trends(&self) -> Vec<TrendPoint> {
        self.get_list("feedback/trends/", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::{ApiError, Method};
    use crate::models::{FeedbackFilters, FeedbackPatch, Ordering, Role, Status};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_filters_as_query() {
        let h = harness();
        let item = sample_feedback(1, 2, Status::Open);
        h.transport.respond(Method::Get, "feedback/", 200, json!([item]));

        let filters = FeedbackFilters {
            status: Some(Status::Open),
            search: "export csv".to_string(),
            ordering: Ordering::TitleAsc,
            board: None,
        };
        let items = h.api.list_feedback(&filters).await;

        assert_eq!(items, vec![item]);
        assert_eq!(
            h.transport.requests()[0].url,
            format!("{}/feedback/?status=open&search=export%20csv&ordering=title", TEST_BASE_URL)
        );
    }

    #[tokio::test]
    async fn test_update_failure_propagates() {
        let h = signed_in_harness(sample_user(5, Role::Contributor));
        h.transport.respond(Method::Patch, "feedback/4/", 403, json!({"detail": "Not allowed"}));

        let result = h.api.update_feedback(4, &FeedbackPatch::status(Status::Completed)).await;

        assert!(matches!(result, Err(ApiError::Forbidden { .. })));
        assert_eq!(h.transport.requests()[0].body, Some(json!({"status": "completed"})));
        assert!(h.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_counts_default_on_failure() {
        let h = harness();
        h.transport.respond(Method::Get, "feedback/counts/", 500, json!({}));
        assert_eq!(h.api.feedback_counts().await, Default::default());

        h.transport.respond(
            Method::Get,
            "feedback/counts/",
            200,
            json!({"total": 4, "active": 2, "completed": 1, "in_progress": 1, "under_review": 0}),
        );
        assert_eq!(h.api.feedback_counts().await.total, 4);
    }

    #[tokio::test]
    async fn test_trends_and_top_voted() {
        let h = harness();
        h.transport.respond(
            Method::Get,
            "feedback/trends/",
            200,
            json!([{"day": "2024-03-01", "count": 3}, {"day": "2024-03-02", "count": 1}]),
        );
        h.transport.respond(Method::Get, "feedback/top_voted/", 200, json!([sample_feedback(3, 1, Status::Open)]));

        let trends = h.api.feedback_trends().await;
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].count, 3);
        assert_eq!(h.api.top_voted_feedback().await[0].id, 3);
    }
}
