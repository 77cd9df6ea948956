use axum::{
    extract::{Query, State},
    Extension, Json,
};
use infdb_core::Platform;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_webhook_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LocationsQuery {
    pub platform: Platform,
}

pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LocationsQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let labels = state
        .client
        .locations(query.platform)
        .await
        .map_err(|e| map_webhook_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(labels, req_id.0)))
}
