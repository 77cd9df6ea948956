use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 64;

/// Correlation id for one funnel request, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct FunnelWindow {
    opened_at: Instant,
    served: usize,
}

/// Fixed-window budget shared by every funnel route. Health is not counted.
///
/// Once `window` has elapsed since the window opened the budget refills; a
/// request arriving after `budget` requests were served is rejected until then.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: usize,
    window: Duration,
    current: Arc<Mutex<FunnelWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: usize, window: Duration) -> Self {
        Self {
            budget,
            window,
            current: Arc::new(Mutex::new(FunnelWindow {
                opened_at: Instant::now(),
                served: 0,
            })),
        }
    }

    /// Counts one request. Returns the time left in the window when the
    /// budget is already spent.
    async fn admit(&self) -> Result<(), Duration> {
        let mut current = self.current.lock().await;
        let elapsed = current.opened_at.elapsed();
        if elapsed >= self.window {
            current.opened_at = Instant::now();
            current.served = 0;
        } else if current.served >= self.budget {
            return Err(self.window - elapsed);
        }
        current.served += 1;
        Ok(())
    }
}

/// Accepts a caller-supplied id only when it is short printable ASCII.
fn accepted_request_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?;
    let printable = id.bytes().all(|b| b.is_ascii_graphic());
    (!id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && printable).then(|| id.to_string())
}

/// Tags every request with a [`RequestId`] and echoes it as `x-request-id`.
///
/// A usable incoming `x-request-id` is kept; anything else is replaced by a
/// fresh `UUIDv4`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(accepted_request_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Rejects funnel requests over budget with a `rate_limited` envelope and a
/// `Retry-After` hint in whole seconds.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let Err(remaining) = rate_limit.admit().await else {
        return next.run(req).await;
    };

    let retry_after = remaining.as_secs().max(1);
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(String::new, |id| id.0.clone());
    tracing::warn!(
        path = %req.uri().path(),
        request_id = %request_id,
        retry_after,
        "funnel request budget exhausted"
    );

    let mut res = ApiError::new(
        request_id,
        "rate_limited",
        format!("too many funnel requests; retry in {retry_after}s"),
    )
    .into_response();
    res.headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    res
}
