use axum::{extract::State, Extension, Json};
use infdb_core::FilterCriteria;
use infdb_funnel::{Rendered, SearchPage, SearchPageView};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_funnel_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    #[serde(default)]
    pub filters: FilterCriteria,
    /// Requests the free trial for the resulting search in the same call.
    pub trial_email: Option<String>,
}

/// Runs one search. Webhook failures come back as an empty result with a
/// 200; only blocked submissions are errors.
pub(super) async fn run_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Rendered<SearchPageView>>>, ApiError> {
    let mut page = SearchPage::new(state.policy(), state.display_options())
        .with_criteria(body.filters);

    page.search(&state.client)
        .await
        .map_err(|e| map_funnel_error(req_id.0.clone(), &e))?;

    let has_offer = page.result().and_then(|r| r.offer_id).is_some();
    if let Some(email) = body.trial_email.filter(|_| has_offer) {
        page.trial_mut().set_email(email);
        page.submit_trial(&state.client)
            .await
            .map_err(|e| map_funnel_error(req_id.0.clone(), &e))?;
    }

    Ok(Json(ApiResponse::new(page.render(), req_id.0)))
}
