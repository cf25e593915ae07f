use super::{ApiClient, ClientResult, check};
use crate::models::{AuthResponse, LoginRequest, RefreshRequest, UserProfile};

impl ApiClient {
    /// Logs in and keeps the access token for later calls
    pub async fn login(&mut self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        check(request)?;
        let response: AuthResponse = self.post("/auth/login", request).await?;
        self.set_token(Some(response.access_token.clone()));
        Ok(response)
    }

    pub async fn refresh(&mut self, refresh_token: &str) -> ClientResult<AuthResponse> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response: AuthResponse = self.post("/auth/refresh", &request).await?;
        self.set_token(Some(response.access_token.clone()));
        Ok(response)
    }

    pub async fn me(&self) -> ClientResult<UserProfile> {
        self.get("/auth/me").await
    }
}
