use axum::{extract::Query, Extension, Json};
use infdb_core::pricing::CUSTOM_MIN_RECORDS;
use infdb_funnel::{pricing_view, PricingView};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::ApiResponse;

#[derive(Debug, Deserialize)]
pub(super) struct PricingQuery {
    /// Match total of the search the catalog is shown for.
    #[serde(default)]
    pub total: u64,
    /// Requested custom package size.
    pub records: Option<u32>,
}

pub(super) async fn get_pricing(
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PricingQuery>,
) -> Json<ApiResponse<PricingView>> {
    let view = pricing_view(query.total, query.records.unwrap_or(CUSTOM_MIN_RECORDS));
    Json(ApiResponse::new(view, req_id.0))
}
