//! Result display: turns a search result into the bounded preview with its
//! lock overlay and calls to action.

use infdb_core::{AppConfig, InfluencerSummary, Platform, SearchResult};
use serde::Serialize;

use crate::format::{compact_count, initials, percent, thousands};
use crate::purchase::{PricingTableConfig, PurchaseWidget};
use crate::variant::{Button, ButtonSize, ButtonVariant};

/// Maximum number of real rows a preview shows.
pub const PREVIEW_SIZE: usize = 5;
/// Maximum number of placeholder rows drawn under the lock overlay.
pub const MAX_PLACEHOLDER_ROWS: usize = 3;

pub const LOADING_MESSAGE: &str = "Searching influencers...";
pub const EMPTY_MESSAGE: &str =
    "No influencers found matching your criteria. Try adjusting your filters.";

/// Rendering knobs that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Totals below this render as the empty state.
    pub min_display_total: u64,
    /// `None` hides the purchase widget.
    pub pricing_table: Option<PricingTableConfig>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            min_display_total: 1,
            pricing_table: None,
        }
    }
}

impl DisplayOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_display_total: config.min_display_total,
            pricing_table: config.stripe.as_ref().map(PricingTableConfig::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallToAction {
    RequestTrial,
    Purchase,
}

impl CallToAction {
    #[must_use]
    pub fn button(self) -> Button {
        match self {
            CallToAction::RequestTrial => {
                Button::new("Get 5 Influencers Free", ButtonVariant::Hero)
            }
            CallToAction::Purchase => Button::new("Unlock All Results", ButtonVariant::Premium),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerRow {
    pub user_id: String,
    pub name: String,
    pub handle: String,
    pub picture_url: String,
    pub initials: String,
    pub platform: String,
    pub followers: String,
    pub engagement: String,
    pub actions: Vec<Button>,
}

impl InfluencerRow {
    fn new(summary: &InfluencerSummary, platform: &str) -> Self {
        let handle = if summary.username.is_empty() || summary.username.starts_with('@') {
            summary.username.clone()
        } else {
            format!("@{}", summary.username)
        };
        Self {
            user_id: summary.user_id.clone(),
            name: summary.full_name.clone(),
            handle,
            picture_url: summary.picture_url.clone(),
            initials: initials(&summary.full_name),
            platform: platform.to_string(),
            followers: format!("{} followers", compact_count(summary.follower_count)),
            engagement: format!(
                "{} engagement",
                percent(summary.engagement_rate_percent)
            ),
            actions: vec![
                Button::sized("View Profile", ButtonVariant::Default, ButtonSize::Sm),
                Button::sized("Contact", ButtonVariant::Outline, ButtonSize::Sm),
            ],
        }
    }
}

/// Obscures the rows beyond the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockOverlay {
    pub hidden_count: u64,
    pub message: String,
    pub call_to_action: CallToAction,
    pub button: Button,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewView {
    pub offer_id: Option<i64>,
    pub platform: String,
    pub total: u64,
    pub headline: String,
    pub rows: Vec<InfluencerRow>,
    /// Rows drawn as skeletons; they carry no data.
    pub placeholder_rows: usize,
    pub lock: Option<LockOverlay>,
    pub purchase: Option<PurchaseWidget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultView {
    /// No search has been run since the last filter change.
    Hidden,
    Loading { message: &'static str },
    Empty { message: &'static str },
    Preview(Box<PreviewView>),
}

impl ResultView {
    #[must_use]
    pub fn preview(&self) -> Option<&PreviewView> {
        match self {
            ResultView::Preview(preview) => Some(preview),
            _ => None,
        }
    }
}

/// True when `result` should render as the empty state.
#[must_use]
pub fn is_displayable(result: &SearchResult, options: &DisplayOptions) -> bool {
    !result.is_empty() && result.total >= options.min_display_total
}

/// Renders the result area.
///
/// `free_trial_used` swaps the trial call to action for a purchase prompt.
#[must_use]
pub fn render_results(
    result: Option<&SearchResult>,
    loading: bool,
    free_trial_used: bool,
    options: &DisplayOptions,
) -> ResultView {
    if loading {
        return ResultView::Loading {
            message: LOADING_MESSAGE,
        };
    }
    let Some(result) = result else {
        return ResultView::Hidden;
    };
    if !is_displayable(result, options) {
        return ResultView::Empty {
            message: EMPTY_MESSAGE,
        };
    }

    let platform = display_platform(&result.platform);
    let rows: Vec<InfluencerRow> = result
        .accounts
        .iter()
        .take(PREVIEW_SIZE)
        .map(|summary| InfluencerRow::new(summary, &platform))
        .collect();

    // The remainder counts from the preview size, not from the rows the
    // backend happened to send.
    let preview_size = PREVIEW_SIZE as u64;
    let lock = (result.total > preview_size).then(|| {
        let hidden_count = result.total - preview_size;
        let call_to_action = if free_trial_used {
            CallToAction::Purchase
        } else {
            CallToAction::RequestTrial
        };
        LockOverlay {
            hidden_count,
            message: format!(
                "{} more influencers match your criteria",
                thousands(hidden_count)
            ),
            call_to_action,
            button: call_to_action.button(),
        }
    });
    let placeholder_rows = lock.as_ref().map_or(0, |l| {
        usize::try_from(l.hidden_count)
            .unwrap_or(usize::MAX)
            .min(MAX_PLACEHOLDER_ROWS)
    });

    let purchase = match (result.offer_id, &options.pricing_table) {
        (Some(id), Some(table)) => Some(table.widget_for(id)),
        _ => None,
    };

    ResultView::Preview(Box::new(PreviewView {
        offer_id: result.offer_id,
        platform,
        total: result.total,
        headline: format!(
            "Showing first {} influencers • {} total results found",
            rows.len(),
            thousands(result.total)
        ),
        rows,
        placeholder_rows,
        lock,
        purchase,
    }))
}

fn display_platform(raw: &str) -> String {
    raw.parse::<Platform>()
        .map_or_else(|_| raw.to_string(), |p| p.label().to_string())
}
