//! Async client for the CareerLink REST backend.
//!
//! Every call goes through [`ApiClient::send`], which attaches the JSON
//! content type and bearer token and turns non-2xx answers into
//! [`ApiError::Http`]. List responses are handed to the [`Normalizer`], so
//! callers only ever see [`ListPage`]s.

mod endpoints;
mod error;

pub use error::ApiError;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::normalize::{Envelope, ListPage, Normalizer};
use crate::query::FilterSpec;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    normalizer: Normalizer,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, default_page_size: usize) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
            normalizer: Normalizer::new(default_page_size),
        }
    }

    /// Client for the configured backend, or `None` when no base URL is set.
    pub fn from_config(config: &ApiConfig) -> Option<Self> {
        let base_url = config.base_url.as_deref()?;
        let client = Self::new(base_url, config.default_page_size);
        Some(match &config.token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Performs one request and returns the decoded body (`null` when empty).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "backend request");

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let text = String::from_utf8_lossy(&bytes);

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends a request and wraps the body in an [`Envelope`]. An envelope the
    /// backend marks unsuccessful becomes [`ApiError::Rejected`].
    pub async fn fetch_envelope(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Envelope<Value>, ApiError> {
        let envelope = Envelope::from_body(self.send(method, path, &[], body).await?);
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope)
    }

    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: Option<&FilterSpec>,
        collection_key: Option<&str>,
    ) -> Result<ListPage<T>, ApiError> {
        let query = filters.map(FilterSpec::to_query_pairs).unwrap_or_default();
        let raw = self.send(Method::GET, path, &query, None).await?;

        if raw.get("success") == Some(&Value::Bool(false)) {
            let message = raw
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(ApiError::Rejected(message));
        }

        let page = match collection_key {
            Some(key) => self
                .normalizer
                .clone()
                .with_collection_key(key)
                .list_as(raw),
            None => self.normalizer.list_as(raw),
        };
        Ok(page)
    }

    pub(crate) async fn entity<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let envelope = self.fetch_envelope(method, path, body).await?;
        let data = envelope.data.unwrap_or(Value::Null);
        Ok(self.normalizer.entity_as(data)?)
    }

    /// Request whose only interesting outcome is success and its message.
    pub(crate) async fn command(&self, method: Method, path: &str) -> Result<String, ApiError> {
        let envelope = self.fetch_envelope(method, path, None).await?;
        Ok(envelope.message)
    }
}

fn to_body<T: Serialize>(payload: &T) -> Result<Option<Value>, ApiError> {
    Ok(Some(serde_json::to_value(payload)?))
}
