use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use url::Url;

use super::error::ClientError;
use super::storage::{keys, KeyValueStore};
use crate::types::{LoginRequest, LoginResponse, ProfileUpdate, Record, RecordInput, UserProfile};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Message carried by [`Unauthorized`] when the server gives none
pub const UNAUTHORIZED_MESSAGE: &str = "Your session has expired or is not valid";

/// Raised whenever any request comes back 401
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthorized {
    /// Client location at the time of the failure
    pub path: String,
    pub message: String,
}

/// Shared HTTP client for the records API.
///
/// Every request picks up the current token from storage. A 401 response
/// removes the token and broadcasts an [`Unauthorized`] event before the
/// error is handed back to the caller.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStore>,
    unauthorized: broadcast::Sender<Unauthorized>,
    location: watch::Receiver<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        storage: Arc<dyn KeyValueStore>,
        location: watch::Receiver<String>,
    ) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, storage, location, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        storage: Arc<dyn KeyValueStore>,
        location: watch::Receiver<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Unreachable)?;

        let (unauthorized, _) = broadcast::channel(16);

        Ok(Self {
            http,
            base_url,
            storage,
            unauthorized,
            location,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// Receive every [`Unauthorized`] event raised after this call
    pub fn subscribe_unauthorized(&self) -> broadcast::Receiver<Unauthorized> {
        self.unauthorized.subscribe()
    }

    // Typed endpoints

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("login", &body).await
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile, ClientError> {
        self.get("profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ClientError> {
        self.put("profile", update).await
    }

    pub async fn fetch_records(&self) -> Result<Vec<Record>, ClientError> {
        self.get("records").await
    }

    pub async fn fetch_record(&self, id: u64) -> Result<Record, ClientError> {
        self.get(&format!("records/{}", id)).await
    }

    pub async fn create_record(&self, input: &RecordInput) -> Result<Record, ClientError> {
        self.post("records", input).await
    }

    pub async fn update_record(&self, id: u64, input: &RecordInput) -> Result<Record, ClientError> {
        self.put(&format!("records/{}", id), input).await
    }

    pub async fn delete_record(&self, id: u64) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, &format!("records/{}", id), None).await?;
        Ok(())
    }

    // Generic verbs

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let mut request = self.http.request(method.clone(), url);

        if let Some(token) = self.storage.get(keys::TOKEN) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} /{} failed: {}", method, path, e);
            ClientError::Unreachable(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let (message, field_errors) = error_body(response).await;

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }

        Err(ClientError::Status {
            status,
            message,
            field_errors,
        })
    }

    /// The server's 401 text stays on the returned error; the session only
    /// ever sees the fixed message.
    fn handle_unauthorized(&self) {
        if let Err(e) = self.storage.remove(keys::TOKEN) {
            tracing::warn!("Failed to clear stored token: {}", e);
        }

        let event = Unauthorized {
            path: self.location.borrow().clone(),
            message: UNAUTHORIZED_MESSAGE.to_string(),
        };
        tracing::info!("Request unauthorized at {}", event.path);

        // No subscribers is fine
        let _ = self.unauthorized.send(event);
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn error_body(response: reqwest::Response) -> (Option<String>, HashMap<String, String>) {
    let Ok(body) = response.json::<Value>().await else {
        return (None, HashMap::new());
    };

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(str::to_string);

    let field_errors = body
        .get("field_errors")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default();

    (message, field_errors)
}
