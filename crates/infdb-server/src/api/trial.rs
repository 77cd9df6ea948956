use axum::{extract::State, Extension, Json};
use infdb_funnel::{TrialForm, TrialView};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_funnel_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct TrialRequest {
    pub offer_id: i64,
    pub email: String,
}

/// Rejections from the trial webhook are reported in the view's outcome,
/// not as an HTTP error.
pub(super) async fn request_trial(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TrialRequest>,
) -> Result<Json<ApiResponse<TrialView>>, ApiError> {
    let mut form = TrialForm::default();
    form.set_email(body.email);
    form.submit(&state.client, Some(body.offer_id))
        .await
        .map_err(|e| map_funnel_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(form.view(Some(body.offer_id)), req_id.0)))
}
