use axum::{
    extract::{Query, State},
    Extension, Json,
};
use infdb_core::Platform;
use infdb_funnel::{FilterChange, FilterPanel, FilterPanelView};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

/// Values already picked in the panel. Each one is applied as a change so
/// the returned view reflects selection state and category suggestions.
#[derive(Debug, Default, Deserialize)]
pub(super) struct FilterOptionsQuery {
    pub platform: Option<Platform>,
    pub location: Option<String>,
    pub category: Option<String>,
}

pub(super) async fn filter_options(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FilterOptionsQuery>,
) -> Json<ApiResponse<FilterPanelView>> {
    let mut panel = FilterPanel::new(state.policy());

    if let Some(platform) = query.platform {
        panel.apply(FilterChange::Platform(platform));
        // The static country list stays in place when the lookup fails.
        if let Err(error) = panel.load_locations(&state.client).await {
            tracing::warn!(error = %error, %platform, "location list unavailable");
        }
    }
    if let Some(location) = query.location.filter(|l| !l.is_empty()) {
        panel.apply(FilterChange::Location(location));
    }
    if let Some(category) = query.category {
        panel.apply(FilterChange::Category(category));
    }

    Json(ApiResponse::new(panel.view(false), req_id.0))
}
