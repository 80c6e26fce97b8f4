//! [`ComparisonService`] backed by the ShopAssist REST API.
//!
//! Routes:
//! - `GET  /api/products/search/?q=&zip_code=`
//! - `GET  /api/products/{id}/variants/`
//! - `POST /api/recommendations/`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use shopassist_core::config::BackendConfig;
use shopassist_core::domain::preferences::PreferenceWeights;
use shopassist_core::domain::product::{ProductId, ProductVariant, SearchResult};
use shopassist_core::domain::recommendation::RecommendationResult;
use shopassist_core::errors::{RecommendationError, SearchError};
use shopassist_core::service::{ComparisonService, RecommendationRequest};

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid backend base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("could not build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct HttpComparisonService {
    client: Client,
    base_url: Url,
    api_token: Option<SecretString>,
}

impl std::fmt::Debug for HttpComparisonService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpComparisonService")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_token", &self.api_token.is_some())
            .finish()
    }
}

impl HttpComparisonService {
    pub fn new(
        base_url: &str,
        api_token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let invalid = |reason: String| ClientBuildError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let base_url = Url::parse(base_url.trim()).map_err(|error| invalid(error.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("expected an http:// or https:// url".to_owned()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url, api_token })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientBuildError> {
        Self::new(
            &config.base_url,
            config.api_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Search with the shopper's zip code forwarded to the backend.
    pub async fn search_near(
        &self,
        query: &str,
        zip_code: Option<&str>,
    ) -> Result<SearchResult, SearchError> {
        let url = self.endpoint(&["api", "products", "search", ""])?;
        let mut params = vec![("q", query)];
        if let Some(zip_code) = zip_code {
            params.push(("zip_code", zip_code));
        }
        let request = self.client.get(url).query(&params);
        Ok(self.send_json(request, "search").await?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CallError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CallError::Transport("backend base url cannot carry a path".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send_json<T>(&self, request: RequestBuilder, operation: &'static str) -> Result<T, CallError>
    where
        T: DeserializeOwned,
    {
        let response = self.authorized(request).send().await.map_err(|error| {
            warn!(
                event_name = "http.request.failed",
                operation,
                error = %error,
                "backend request failed"
            );
            CallError::Transport(error.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_owned))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(
                event_name = "http.request.rejected",
                operation,
                status = status.as_u16(),
                message = %message,
                "backend rejected request"
            );
            return Err(CallError::Server { status: status.as_u16(), message });
        }

        debug!(event_name = "http.request.completed", operation, status = status.as_u16(), "backend request completed");
        response.json::<T>().await.map_err(|error| CallError::Decode(error.to_string()))
    }
}

#[async_trait]
impl ComparisonService for HttpComparisonService {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        self.search_near(query, None).await
    }

    async fn variants(&self, product_id: &ProductId) -> Result<Vec<ProductVariant>, SearchError> {
        let url = self.endpoint(&["api", "products", product_id.as_str(), "variants", ""])?;
        Ok(self.send_json(self.client.get(url), "variants").await?)
    }

    async fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, RecommendationError> {
        let url = self.endpoint(&["api", "recommendations", ""])?;
        let body = RecommendationBody::from(request);
        Ok(self.send_json(self.client.post(url).json(&body), "recommendations").await?)
    }
}

#[derive(Debug, Serialize)]
struct RecommendationBody<'a> {
    product_id: &'a str,
    preferences: PreferencesBody,
    zip_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PreferencesBody {
    value_weight: f64,
    speed_weight: f64,
    trust_weight: f64,
    quality_weight: f64,
}

impl<'a> From<&'a RecommendationRequest> for RecommendationBody<'a> {
    fn from(request: &'a RecommendationRequest) -> Self {
        Self {
            product_id: &request.product_or_variant_id,
            preferences: PreferencesBody::from(&request.weights),
            zip_code: request.zip_code.as_deref(),
        }
    }
}

impl From<&PreferenceWeights> for PreferencesBody {
    fn from(weights: &PreferenceWeights) -> Self {
        Self {
            value_weight: weights.value,
            speed_weight: weights.speed,
            trust_weight: weights.trust,
            quality_weight: weights.quality,
        }
    }
}

#[derive(Debug)]
enum CallError {
    Transport(String),
    Server { status: u16, message: String },
    Decode(String),
}

impl From<CallError> for SearchError {
    fn from(error: CallError) -> Self {
        match error {
            CallError::Transport(message) => Self::Transport(message),
            CallError::Server { status, message } => Self::Server { status, message },
            CallError::Decode(message) => Self::Decode(message),
        }
    }
}

impl From<CallError> for RecommendationError {
    fn from(error: CallError) -> Self {
        match error {
            CallError::Transport(message) => Self::Transport(message),
            CallError::Server { status, message } => Self::Server { status, message },
            CallError::Decode(message) => Self::Decode(message),
        }
    }
}

/// Pulls a readable message out of an error body: `detail`, `message`,
/// `non_field_errors[0]`, then the first field error. Plain-text bodies are used as is.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_owned());
    };

    match value {
        Value::String(message) => Some(message),
        Value::Object(fields) => {
            for key in ["detail", "message"] {
                if let Some(Value::String(message)) = fields.get(key) {
                    return Some(message.clone());
                }
            }
            if let Some(first) = fields
                .get("non_field_errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(Value::as_str)
            {
                return Some(first.to_owned());
            }
            fields.iter().find_map(|(field, errors)| {
                errors
                    .as_array()
                    .and_then(|errors| errors.first())
                    .and_then(Value::as_str)
                    .map(|message| format!("{field}: {message}"))
            })
        }
        _ => None,
    }
}
