use axum::{
    extract::{Path, State},
    Extension, Json,
};
use infdb_funnel::{OfferPage, OfferPageState, OfferPageView, Rendered};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_funnel_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct OfferTrialRequest {
    pub email: String,
}

async fn load_page(state: &AppState, req_id: &RequestId, id: i64) -> Result<OfferPage, ApiError> {
    let mut page = OfferPage::new(id, state.display_options());
    if matches!(page.load(&state.client).await, OfferPageState::NotFound) {
        return Err(ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("offer {id} not found"),
        ));
    }
    Ok(page)
}

pub(super) async fn get_offer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Rendered<OfferPageView>>>, ApiError> {
    let mut page = load_page(&state, &req_id, id).await?;
    Ok(Json(ApiResponse::new(page.render(), req_id.0)))
}

/// Requests the free trial for a stored offer and returns the refreshed
/// offer page.
pub(super) async fn request_offer_trial(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<OfferTrialRequest>,
) -> Result<Json<ApiResponse<Rendered<OfferPageView>>>, ApiError> {
    let mut page = load_page(&state, &req_id, id).await?;
    if page.offer().is_some_and(|o| o.free_trial_used) {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "the free trial for this offer was already used",
        ));
    }

    page.trial_mut().set_email(body.email);
    page.submit_trial(&state.client)
        .await
        .map_err(|e| map_funnel_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(page.render(), req_id.0)))
}
