//! HTTP client wrapper for the BradBoard REST API.
//!
//! Builds requests against the configured base URL, attaches the bearer
//! credential, and normalizes every failure into an [`ApiError`] so callers
//! never see raw transport errors.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::auth::{self, Auth};
use super::error::{ApiError, Result};
use crate::storage::SharedStorage;

/// Default API base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Authenticated JSON-over-HTTP client.
#[derive(Debug)]
pub struct HttpClient {
    /// The HTTP client.
    client: Client,
    /// The API base URL, without a trailing slash.
    base_url: String,
    /// The bearer credential currently held.
    auth: RwLock<Auth>,
    /// Durable mirror of the credential.
    storage: SharedStorage,
}

impl HttpClient {
    /// Create a client with no request timeout.
    ///
    /// Any access token already in `storage` is picked up, so a restarted
    /// process resumes the previous session.
    pub fn new(base_url: &str, storage: SharedStorage) -> Result<Self> {
        Self::with_timeout(base_url, storage, None)
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        storage: SharedStorage,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = Self::build_http_client(timeout)?;
        let auth = Auth::from_storage(storage.as_ref());
        debug!(has_token = auth.is_present(), "HTTP client created");

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            auth: RwLock::new(auth),
            storage,
        })
    }

    fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(ApiError::Network)
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The storage the credential is mirrored into.
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// True when a bearer token is held.
    pub fn has_token(&self) -> bool {
        self.auth.read().map(|a| a.is_present()).unwrap_or(false)
    }

    /// Adopt a new token pair and persist it.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        if let Ok(mut auth) = self.auth.write() {
            *auth = Auth::bearer(access_token);
        }
        auth::store_tokens(self.storage.as_ref(), access_token, refresh_token)?;
        Ok(())
    }

    /// Drop the held token and remove the persisted token pair and cached user.
    pub fn clear_token(&self) {
        if let Ok(mut auth) = self.auth.write() {
            *auth = Auth::default();
        }
        auth::clear_tokens(self.storage.as_ref());
    }

    /// `GET` a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    /// `GET` a resource as raw text.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        response.text().await.map_err(ApiError::Network)
    }

    /// `POST` a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    /// `POST` without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::POST, path, None).await?;
        decode(response).await
    }

    /// `PUT` a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    /// `DELETE` a resource.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::DELETE, path, None).await?;
        decode(response).await
    }

    /// Send one request and turn any non-2xx answer into an error.
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        let auth_header = self
            .auth
            .read()
            .ok()
            .and_then(|a| a.header_value().map(str::to_string));
        if let Some(value) = auth_header {
            request = request.header(header::AUTHORIZATION, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Server rejected credentials, clearing session");
            self.clear_token();
            return Err(ApiError::Unauthorized);
        }

        let error_body = response.text().await.unwrap_or_default();
        debug!("Error response body: {}", error_body);
        Err(ApiError::from_status(status, extract_detail(&error_body)))
    }
}

/// Decode a successful response.
///
/// Bodies without a JSON content type decode as an empty object, which is
/// what delete and logout return.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        let text = response.text().await.map_err(ApiError::Network)?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    } else {
        serde_json::from_value(serde_json::Value::Object(serde_json::Map::new()))
            .map_err(|e| ApiError::InvalidResponse(format!("Expected a JSON body: {}", e)))
    }
}

/// Pull the human-readable `detail` string out of an error body.
fn extract_detail(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("detail")?.as_str().map(str::to_string)
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. Tokens will travel in clear text.", url);
    }

    url.to_string()
}
