//! Typed HTTP client for the REST API. One method per backend operation;
//! each unwraps the response envelope and returns its `data`. Mutations run
//! the same request validation as the server before anything is sent.

mod auth;
mod cash_register;
mod collections;
mod customers;
mod deliveries;
mod expenses;
mod inventory;
mod loyalty;
mod orders;
mod products;
mod promotions;
pub mod query;
mod reports;
mod settings;

pub use query::{ListState, QueryCache};

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::AppError;
use crate::models::{ApiResponse, Validate};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing next to a form or list
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::ValidationError(message) => ClientError::Validation(message),
            other => ClientError::Validation(other.to_string()),
        }
    }
}

/// Runs a request's local checks
pub(crate) fn check(request: &impl Validate) -> ClientResult<()> {
    request.validate().map_err(ClientError::from)
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8080/api/v1`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<Q, B, T>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_envelope(status, &bytes)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<(), (), T>(Method::GET, path, None, None).await
    }

    pub(crate) async fn get_with<Q, T>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send::<Q, (), T>(Method::GET, path, Some(query), None)
            .await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send::<(), B, T>(Method::POST, path, None, Some(body))
            .await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<(), (), T>(Method::POST, path, None, None).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send::<(), B, T>(Method::PUT, path, None, Some(body))
            .await
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send::<(), B, T>(Method::PATCH, path, None, Some(body))
            .await
    }

    pub(crate) async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<(), (), T>(Method::PATCH, path, None, None).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        let _: serde_json::Value = self
            .send::<(), (), serde_json::Value>(Method::DELETE, path, None, None)
            .await?;
        Ok(())
    }
}

/// Turns a response body into the envelope's `data`, or the envelope's
/// error for non-2xx statuses.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> ClientResult<T> {
    if !status.is_success() {
        let (code, message) = match serde_json::from_slice::<ApiResponse<serde_json::Value>>(body)
        {
            Ok(ApiResponse {
                error: Some(error), ..
            }) => (error.code, error.message),
            _ => (
                "HTTP_ERROR".to_string(),
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
            ),
        };
        return Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        });
    }

    let envelope: ApiResponse<T> =
        serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    if !envelope.success {
        let error = envelope.error.unwrap_or(crate::models::ApiError {
            code: "UNKNOWN".to_string(),
            message: "Request was not successful".to_string(),
        });
        return Err(ClientError::Api {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
        });
    }
    envelope
        .data
        .ok_or_else(|| ClientError::Decode("Response has no data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_unwraps_data() {
        let body = br#"{"success":true,"data":[1,2,3]}"#;
        let data: Vec<i32> = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_error_uses_envelope_message() {
        let body = br#"{"success":false,"error":{"code":"NOT_FOUND","message":"Order not found"}}"#;
        let err = decode_envelope::<serde_json::Value>(StatusCode::NOT_FOUND, body).unwrap_err();
        match err {
            ClientError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "NOT_FOUND");
                assert_eq!(message, "Order not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_without_envelope() {
        let err = decode_envelope::<serde_json::Value>(StatusCode::BAD_GATEWAY, b"<html>")
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_decode_garbage_success_body() {
        let err = decode_envelope::<Vec<i32>>(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/api/v1/");
        assert_eq!(client.url("/orders"), "http://localhost:8080/api/v1/orders");
    }
}
