//! Comment Endpoints

use serde::Serialize;

use super::{ApiClient, ApiResult};
use crate::models::{Comment, NewComment};

#[derive(Serialize)]
struct CommentEdit<'a> {
    content: &'a str,
}

impl ApiClient {
    /// Comments, optionally narrowed to one feedback item
    pub async fn list_comments(&self, feedback: Option<u32>) -> Vec<Comment> {
        let query: Vec<(&str, String)> = feedback
            .map(|id| vec![("feedback", id.to_string())])
            .unwrap_or_default();
        self.get_list("comments/", &query).await
    }

    pub async fn add_comment(&self, feedback: u32, content: &str) -> ApiResult<Comment> {
        self.post("comments/", &NewComment { feedback, content }).await
    }

    pub async fn update_comment(&self, id: u32, content: &str) -> ApiResult<Comment> {
        self.patch(&format!("comments/{}/", id), &CommentEdit { content }).await
    }

    pub async fn delete_comment(&self, id: u32) -> ApiResult<()> {
        self.delete(&format!("comments/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_comments_filters_by_feedback() {
        let h = harness();
        h.transport.respond(
            Method::Get,
            "comments/",
            200,
            json!([{"id": 1, "feedback": 6, "author_name": "ana", "content": "+1", "created_at": "2024-03-02T08:00:00Z"}]),
        );

        let comments = h.api.list_comments(Some(6)).await;

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_display(), "ana");
        assert!(h.transport.requests()[0].url.ends_with("comments/?feedback=6"));
    }

    #[tokio::test]
    async fn test_add_comment_body() {
        let h = harness();
        h.transport.respond(
            Method::Post,
            "comments/",
            201,
            json!({"id": 2, "feedback": 6, "content": "Agreed", "created_at": "2024-03-02T08:00:00Z"}),
        );

        let comment = h.api.add_comment(6, "Agreed").await.unwrap();

        assert_eq!(comment.id, 2);
        assert_eq!(h.transport.requests()[0].body, Some(json!({"feedback": 6, "content": "Agreed"})));
    }

    #[tokio::test]
    async fn test_delete_comment_accepts_empty_body() {
        let h = harness();
        h.transport.respond(Method::Delete, "comments/2/", 204, serde_json::Value::Null);
        assert!(h.api.delete_comment(2).await.is_ok());
    }
}
