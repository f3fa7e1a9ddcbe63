use reqwest::{header, Client, Method};
use serde_json::Value;
use std::time::Duration;

use super::auth::AuthContext;
use super::error::{ApiError, ApiResult};
use crate::routes::ErrorResponse;

/// Sends JSON requests relative to the API base, attaching the bearer token
/// from the session when there is one.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: Client,
    base_url: String,
    auth: AuthContext,
}

impl Transport {
    pub fn new(base_url: &str, timeout: Option<Duration>, auth: AuthContext) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build().map_err(ApiError::Network)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "api request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.auth.token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&bytes)
                .ok()
                .map(|body| body.error);
            tracing::debug!(method = %method, url = %url, status = %status, "api request failed");
            return Err(ApiError::Http { status, message });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
