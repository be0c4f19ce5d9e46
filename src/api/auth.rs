//! Auth Endpoints

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiResult};
use crate::models::{AuthTokens, Credentials, RegisterForm, User};

#[derive(Serialize)]
struct RefreshArgs<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshedToken {
    access: String,
}

impl ApiClient {
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthTokens> {
        self.post("users/login/", &Credentials { username, password }).await
    }

    pub async fn register(&self, form: &RegisterForm) -> ApiResult<AuthTokens> {
        self.post("users/register/", form).await
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh_token(&self, refresh: &str) -> ApiResult<String> {
        let token: RefreshedToken = self.post("token/refresh/", &RefreshArgs { refresh }).await?;
        Ok(token.access)
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.get("users/me/", &[]).await
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.get_list("users/", &[]).await
    }
}
