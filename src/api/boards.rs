//! Board Endpoints

use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, ApiResult};
use crate::models::{Board, BoardPatch, NewBoard};

#[derive(Serialize)]
struct MemberArgs<'a> {
    username: &'a str,
}

impl ApiClient {
    pub async fn list_boards(&self) -> Vec<Board> {
        self.get_list("boards/", &[]).await
    }

    pub async fn get_board(&self, id: u32) -> ApiResult<Board> {
        self.get(&format!("boards/{}/", id), &[]).await
    }

    pub async fn create_board(&self, board: &NewBoard) -> ApiResult<Board> {
        self.post("boards/", board).await
    }

    pub async fn update_board(&self, id: u32, patch: &BoardPatch) -> ApiResult<Board> {
        self.patch(&format!("boards/{}/", id), patch).await
    }

    pub async fn delete_board(&self, id: u32) -> ApiResult<()> {
        self.delete(&format!("boards/{}/", id)).await
    }

    pub async fn join_board(&self, id: u32) -> ApiResult<()> {
        self.post_action::<Value>(&format!("boards/{}/join/", id)).await.map(|_| ())
    }

    pub async fn leave_board(&self, id: u32) -> ApiResult<()> {
        self.post_action::<Value>(&format!("boards/{}/leave/", id)).await.map(|_| ())
    }

    /// Elevated roles only; the service answers 403 otherwise
    pub async fn add_board_member(&self, id: u32, username: &str) -> ApiResult<()> {
        self.post::<_, Value>(&format!("boards/{}/add_member/", id), &MemberArgs { username })
            .await
            .map(|_| ())
    }
}
