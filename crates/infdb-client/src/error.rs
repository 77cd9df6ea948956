use thiserror::Error;

/// Errors returned by the webhook client.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered 404 for the requested record.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx status. `message` carries the body's `error` field
    /// when the webhook supplied one.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        message: Option<String>,
    },

    /// A 2xx response whose body reports failure (e.g. `"success": false`).
    #[error("webhook rejected the request{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Api(Option<String>),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl WebhookError {
    /// Message the webhook itself supplied, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            WebhookError::Api(message) | WebhookError::UnexpectedStatus { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// True for failures that never reached an HTTP response.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, WebhookError::Http(e) if e.status().is_none())
    }
}
