mod filters;
mod locations;
mod offers;
mod pricing;
mod search;
mod trial;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use infdb_client::{WebhookClient, WebhookError};
use infdb_core::{AppConfig, SearchPolicy};
use infdb_funnel::{DisplayOptions, FunnelError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub client: WebhookClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    fn policy(&self) -> SearchPolicy {
        SearchPolicy {
            require_location: self.config.require_location,
        }
    }

    fn display_options(&self) -> DisplayOptions {
        DisplayOptions::from_config(&self.config)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    environment: String,
    purchase_enabled: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// A blocked submit: missing filters, a bad email, or a request already
/// in flight.
pub(super) fn map_funnel_error(request_id: String, error: &FunnelError) -> ApiError {
    tracing::debug!(error = %error, "funnel action blocked");
    ApiError::new(request_id, "validation_error", error.to_string())
}

pub(super) fn map_webhook_error(request_id: String, error: &WebhookError) -> ApiError {
    tracing::error!(error = %error, "webhook request failed");
    match error {
        WebhookError::NotFound { .. } => {
            ApiError::new(request_id, "not_found", "resource not found")
        }
        _ => ApiError::new(request_id, "upstream_error", "webhook request failed"),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn funnel_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/filters/options", get(filters::filter_options))
        .route("/api/v1/locations", get(locations::list_locations))
        .route("/api/v1/search", post(search::run_search))
        .route("/api/v1/trial", post(trial::request_trial))
        .route("/api/v1/offers/{id}", get(offers::get_offer))
        .route("/api/v1/offers/{id}/trial", post(offers::request_offer_trial))
        .route("/api/v1/pricing", get(pricing::get_pricing))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(funnel_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            environment: state.config.env.to_string(),
            purchase_enabled: state.config.stripe.is_some(),
        },
        req_id.0,
    ))
}

/// Limiter allowing `per_minute` funnel requests per one-minute window.
pub fn rate_limit_state(per_minute: usize) -> RateLimitState {
    RateLimitState::new(per_minute, Duration::from_secs(60))
}
