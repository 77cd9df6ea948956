//! HTTP client for the influencer-search webhooks.
//!
//! Wraps `reqwest` with typed request bodies, lenient response decoding and
//! normalization into `infdb-core` types. Every call issues exactly one
//! request; there is no retry layer.

use std::time::Duration;

use infdb_core::{AppConfig, Offer, Platform, SearchQuery, SearchResult};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::WebhookError;
use crate::normalize::{normalize_offer, normalize_search};
use crate::types::{OfferPayload, SearchResponse, TrialRequest, TrialResponse};

const DEFAULT_BASE_URL: &str = "https://workflow.influencersss.com/";

/// Client for the search, locations, trial and offer webhooks.
///
/// Use [`WebhookClient::new`] for production or
/// [`WebhookClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    base_url: Url,
}

impl WebhookClient {
    /// Creates a client pointed at the production webhook host.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, WebhookError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`WebhookClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, WebhookError> {
        Self::with_base_url(
            &config.webhook_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`WebhookError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends below any path prefix
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| WebhookError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(WebhookError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs a search and returns the normalized preview.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Http`] on network failure.
    /// - [`WebhookError::UnexpectedStatus`] on a non-2xx status.
    /// - [`WebhookError::Deserialize`] if the body is not the expected shape.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, WebhookError> {
        let url = self.endpoint("search", &[]);
        tracing::debug!(url = %url, platform = %query.platform, category = %query.category, "webhook search");

        let response = self.client.post(url.clone()).json(query).send().await?;
        let response = Self::check_status(response, &url).await?;
        let body: SearchResponse = Self::decode(response, "search").await?;
        Ok(normalize_search(body))
    }

    /// Fetches the locations the backend allows for `platform`.
    ///
    /// Blank and duplicate labels are dropped; order is preserved.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Http`] on network failure.
    /// - [`WebhookError::UnexpectedStatus`] on a non-2xx status.
    /// - [`WebhookError::Deserialize`] if the body is not a JSON array.
    pub async fn locations(&self, platform: Platform) -> Result<Vec<String>, WebhookError> {
        let url = self.endpoint("locations", &[("platform", platform.as_str())]);
        tracing::debug!(url = %url, "webhook locations");

        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_status(response, &url).await?;
        let raw: Vec<serde_json::Value> = Self::decode(response, "locations").await?;

        let mut labels: Vec<String> = Vec::with_capacity(raw.len());
        for label in raw.iter().filter_map(serde_json::Value::as_str) {
            let label = label.trim();
            if !label.is_empty() && !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        Ok(labels)
    }

    /// Requests the free trial package for `offer_id`, delivered to `email`.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Http`] on network failure.
    /// - [`WebhookError::UnexpectedStatus`] on a non-2xx status, carrying the
    ///   body's `error` message when present.
    /// - [`WebhookError::Api`] when the body reports `"success": false`.
    /// - [`WebhookError::Deserialize`] if a 2xx body is not JSON.
    pub async fn request_trial(&self, offer_id: i64, email: &str) -> Result<(), WebhookError> {
        let url = self.endpoint("trial", &[]);
        tracing::debug!(url = %url, offer_id, "webhook trial request");

        let response = self
            .client
            .post(url.clone())
            .json(&TrialRequest { offer_id, email })
            .send()
            .await?;
        let response = Self::check_status(response, &url).await?;
        let body: TrialResponse = Self::decode(response, "trial").await?;

        if body.success {
            Ok(())
        } else {
            Err(WebhookError::Api(body.error.filter(|m| !m.trim().is_empty())))
        }
    }

    /// Fetches a stored offer by identifier.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::NotFound`] on 404, or when the body is `null`, empty,
    ///   or an object without an `id`.
    /// - [`WebhookError::Http`] on network failure.
    /// - [`WebhookError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`WebhookError::Deserialize`] if the offer does not match the
    ///   expected shape.
    pub async fn get_offer(&self, offer_id: i64) -> Result<Offer, WebhookError> {
        let id = offer_id.to_string();
        let url = self.endpoint("offer", &[("id", &id)]);
        tracing::debug!(url = %url, offer_id, "webhook offer fetch");

        let response = self.client.get(url.clone()).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(WebhookError::NotFound {
                url: url.to_string(),
            });
        }
        let response = Self::check_status(response, &url).await?;
        let text = response.text().await?;

        let value: serde_json::Value = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| WebhookError::Deserialize {
                context: format!("offer(id={offer_id})"),
                source: e,
            })?
        };
        if value.get("id").is_none_or(serde_json::Value::is_null) {
            return Err(WebhookError::NotFound {
                url: url.to_string(),
            });
        }

        let payload: OfferPayload =
            serde_json::from_value(value).map_err(|e| WebhookError::Deserialize {
                context: format!("offer(id={offer_id})"),
                source: e,
            })?;
        Ok(normalize_offer(payload))
    }

    /// Builds `<base>/webhook/<name>` with percent-encoded query parameters.
    fn endpoint(&self, name: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        // `with_base_url` rejects cannot-be-a-base URLs, so this always applies.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("webhook").push(name);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Passes 2xx responses through; turns anything else into
    /// [`WebhookError::UnexpectedStatus`], keeping the body's `error` message.
    async fn check_status(response: Response, url: &Url) -> Result<Response, WebhookError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
            .filter(|m| !m.trim().is_empty());

        tracing::warn!(url = %url, status = status.as_u16(), "webhook returned non-success status");
        Err(WebhookError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, WebhookError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WebhookError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
