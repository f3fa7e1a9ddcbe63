//! Data-access client for the portfolio API.
//!
//! Reads are expressed as [`Query`] values and writes as [`Mutation`]
//! values. The API only serves whole collections, so [`ApiClient::execute`]
//! fetches the collection once and applies filters, ordering and limits
//! locally. The bearer token lives in an explicit [`AuthContext`].

pub mod auth;
pub mod error;
pub mod mutation;
pub mod query;
pub mod resource;
mod transport;

pub use auth::{decode_session, AuthContext};
pub use error::{ApiError, ApiResult};
pub use mutation::Mutation;
pub use query::{Filter, FilterOp, OrderBy, Query};
pub use resource::{Access, Record, Resource};

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::routes::auth::{LoginRequest, LoginResponse, SessionUser, UpdatePasswordRequest};
use crate::routes::DataResponse;
use transport::Transport;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base, including the `/api` prefix.
    pub base_url: String,
    /// No timeout when `None`.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("PORTFOLIO_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    pub fn new(config: ClientConfig, auth: AuthContext) -> ApiResult<Self> {
        Ok(Self {
            transport: Transport::new(&config.base_url, config.timeout, auth)?,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        self.transport.auth()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// One GET of the query's collection, then [`Query::apply`].
    pub async fn execute(&self, query: &Query) -> ApiResult<Vec<Value>> {
        let body = self.transport.send(Method::GET, query.path(), None).await?;
        let envelope: DataResponse<Vec<Value>> = serde_json::from_value(body)?;
        Ok(query.apply(envelope.data))
    }

    /// [`execute`](Self::execute), decoded into the resource's record type.
    pub async fn fetch<T: Record>(&self, query: &Query) -> ApiResult<Vec<T>> {
        debug_assert_eq!(query.resource, T::RESOURCE);
        self.execute(query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(ApiError::from))
            .collect()
    }

    /// First row after processing, if any.
    pub async fn single<T: Record>(&self, query: &Query) -> ApiResult<Option<T>> {
        let query = query.clone().limit(1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Run one write. Inserts and updates return the stored row as the
    /// server sent it; deletes return `None`.
    pub async fn mutate(&self, mutation: &Mutation) -> ApiResult<Option<Value>> {
        let (method, path, body) = mutation.request()?;
        let response = self.transport.send(method, &path, body.as_ref()).await?;

        match mutation {
            Mutation::Delete { .. } => Ok(None),
            _ => {
                let envelope: DataResponse<Option<Value>> = serde_json::from_value(response)?;
                Ok(envelope.data)
            }
        }
    }

    pub async fn insert<T: Record>(&self, record: &impl Serialize) -> ApiResult<Option<T>> {
        let mutation = Mutation::Insert {
            resource: T::RESOURCE,
            record: serde_json::to_value(record)?,
        };
        self.mutate(&mutation).await?.map(decode::<T>).transpose()
    }

    /// Patch the row whose key is `key`. A missing row is an `Http` 404.
    pub async fn update<T: Record>(&self, key: &str, patch: Map<String, Value>) -> ApiResult<T> {
        let mutation = Mutation::Update {
            resource: T::RESOURCE,
            key: key.to_string(),
            patch,
        };
        let row = self
            .mutate(&mutation)
            .await?
            .ok_or_else(|| ApiError::Decode("update returned no data".to_string()))?;
        decode(row)
    }

    pub async fn delete(&self, resource: Resource, key: &str) -> ApiResult<()> {
        self.mutate(&Mutation::Delete {
            resource,
            key: key.to_string(),
        })
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// Log in and keep the issued token in this client's session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<SessionUser> {
        let request = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let body = self
            .transport
            .send(Method::POST, "/auth/login", Some(&request))
            .await?;
        let login: LoginResponse = serde_json::from_value(body)?;
        self.auth().set_token(login.token).await;
        tracing::debug!(user_id = %login.user.id, "signed in");
        Ok(login.user)
    }

    /// Forget the token. Nothing is sent to the server.
    pub async fn sign_out(&self) {
        self.auth().clear().await;
    }

    pub async fn session(&self) -> Option<SessionUser> {
        self.auth().session().await
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.session().await
    }

    pub async fn update_password(&self, password: &str) -> ApiResult<()> {
        let request = serde_json::to_value(UpdatePasswordRequest {
            password: password.to_string(),
        })?;
        self.transport
            .send(Method::POST, "/auth/update-password", Some(&request))
            .await?;
        Ok(())
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<SessionUser>> {
        self.auth().subscribe()
    }
}

fn decode<T: DeserializeOwned>(row: Value) -> ApiResult<T> {
    Ok(serde_json::from_value(row)?)
}
