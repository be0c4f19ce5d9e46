//! Tag Endpoints

use serde::Serialize;

use super::{ApiClient, ApiResult};
use crate::models::Tag;

#[derive(Serialize)]
struct NewTag<'a> {
    name: &'a str,
}

impl ApiClient {
    pub async fn list_tags(&self) -> Vec<Tag> {
        self.get_list("tags/", &[]).await
    }

    pub async fn create_tag(&self, name: &str) -> ApiResult<Tag> {
        self.post("tags/", &NewTag { name }).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_tag() {
        let h = harness();
        h.transport.respond(Method::Post, "tags/", 201, json!({"id": 5, "name": "ux"}));

        let tag = h.api.create_tag("ux").await.unwrap();

        assert_eq!(tag.name, "ux");
        assert_eq!(h.transport.requests()[0].body, Some(json!({"name": "ux"})));
    }
}
