//! Filter panel state: applies control changes, owns the location option
//! list, and decides whether search may be submitted.

use infdb_client::{WebhookClient, WebhookError};
use infdb_core::filters::{
    clamp_avg_views, clamp_engagement_rate, AVG_VIEWS_MAX, AVG_VIEWS_MIN, AVG_VIEWS_STEP,
    ENGAGEMENT_MAX, ENGAGEMENT_MIN,
};
use infdb_core::{
    category_suggestions, AudienceSize, FilterCriteria, FilterError, FilterField, Platform,
    SearchPolicy, SearchQuery, COUNTRIES,
};
use serde::Serialize;

use crate::format::thousands;
use crate::variant::{Button, ButtonVariant};

const ENGAGEMENT_STEP: f64 = 0.1;

/// One interaction with a panel control.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Platform(Platform),
    Size(AudienceSize),
    /// Selecting the already-selected location clears it.
    Location(String),
    Category(String),
    MinAvgViews(u32),
    MinEngagementRate(f64),
}

/// Where the location choices come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationList {
    /// The built-in country list; values are country codes.
    Static,
    /// Labels the backend allows for one platform; values are the labels.
    Loaded {
        platform: Platform,
        labels: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderView {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPanelView {
    pub criteria: FilterCriteria,
    pub platforms: Vec<SelectOption>,
    pub sizes: Vec<SelectOption>,
    pub locations: Vec<SelectOption>,
    pub location_required: bool,
    pub category_suggestions: Vec<&'static str>,
    pub avg_views: SliderView,
    pub engagement_rate: SliderView,
    pub missing_fields: Vec<FilterField>,
    pub search: Button,
}

#[derive(Debug, Clone)]
pub struct FilterPanel {
    criteria: FilterCriteria,
    policy: SearchPolicy,
    locations: LocationList,
}

impl FilterPanel {
    #[must_use]
    pub fn new(policy: SearchPolicy) -> Self {
        Self::with_criteria(policy, FilterCriteria::default())
    }

    /// Starts from existing criteria, normalizing the slider values.
    #[must_use]
    pub fn with_criteria(policy: SearchPolicy, mut criteria: FilterCriteria) -> Self {
        criteria.min_avg_views = clamp_avg_views(criteria.min_avg_views);
        criteria.min_engagement_rate = clamp_engagement_rate(criteria.min_engagement_rate);
        Self {
            criteria,
            policy,
            locations: LocationList::Static,
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    #[must_use]
    pub fn locations(&self) -> &LocationList {
        &self.locations
    }

    /// Applies one control change and returns the complete updated criteria.
    pub fn apply(&mut self, change: FilterChange) -> &FilterCriteria {
        let mut next = self.criteria.clone();
        match change {
            FilterChange::Platform(platform) => {
                if next.platform != Some(platform) {
                    // A list loaded for another platform no longer applies.
                    if matches!(&self.locations, LocationList::Loaded { platform: p, .. } if *p != platform)
                    {
                        self.locations = LocationList::Static;
                    }
                }
                next.platform = Some(platform);
            }
            FilterChange::Size(size) => next.size = size,
            FilterChange::Location(location) => {
                next.location = if location == next.location {
                    String::new()
                } else {
                    location
                };
            }
            FilterChange::Category(category) => next.category = category,
            FilterChange::MinAvgViews(views) => next.min_avg_views = clamp_avg_views(views),
            FilterChange::MinEngagementRate(rate) => {
                next.min_engagement_rate = clamp_engagement_rate(rate);
            }
        }
        self.criteria = next;
        &self.criteria
    }

    /// Installs a location list fetched for `platform`.
    ///
    /// Returns `false` and changes nothing when the platform has moved on
    /// since the fetch began. A selected location absent from the new list is
    /// cleared.
    pub fn set_locations(&mut self, platform: Platform, labels: Vec<String>) -> bool {
        if self.criteria.platform != Some(platform) {
            tracing::debug!(%platform, "dropping location list for a deselected platform");
            return false;
        }
        if !self.criteria.location.is_empty() && !labels.contains(&self.criteria.location) {
            tracing::debug!(
                location = %self.criteria.location,
                %platform,
                "selected location not offered for platform; clearing"
            );
            self.criteria.location.clear();
        }
        self.locations = LocationList::Loaded { platform, labels };
        true
    }

    /// Fetches the allowed locations for the selected platform.
    ///
    /// Does nothing when no platform is selected. On failure the current
    /// list stays in place.
    ///
    /// # Errors
    ///
    /// Propagates the [`WebhookError`] from the locations endpoint.
    pub async fn load_locations(&mut self, client: &WebhookClient) -> Result<(), WebhookError> {
        let Some(platform) = self.criteria.platform else {
            return Ok(());
        };
        let labels = client.locations(platform).await?;
        self.set_locations(platform, labels);
        Ok(())
    }

    #[must_use]
    pub fn missing_fields(&self) -> Vec<FilterField> {
        self.policy.missing_fields(&self.criteria)
    }

    #[must_use]
    pub fn search_enabled(&self) -> bool {
        self.policy.can_search(&self.criteria)
    }

    /// # Errors
    ///
    /// Returns [`FilterError::MissingFields`] while a required filter is empty.
    pub fn query(&self) -> Result<SearchQuery, FilterError> {
        self.policy.query(&self.criteria)
    }

    #[must_use]
    pub fn location_options(&self) -> Vec<SelectOption> {
        let selected = self.criteria.location.as_str();
        match &self.locations {
            LocationList::Static => COUNTRIES
                .iter()
                .map(|(code, label)| SelectOption {
                    value: (*code).to_string(),
                    label: (*label).to_string(),
                    selected: *code == selected,
                })
                .collect(),
            LocationList::Loaded { labels, .. } => labels
                .iter()
                .map(|label| SelectOption {
                    value: label.clone(),
                    label: label.clone(),
                    selected: label == selected,
                })
                .collect(),
        }
    }

    /// Renders the panel. `searching` disables the search button while a
    /// request is in flight.
    #[must_use]
    pub fn view(&self, searching: bool) -> FilterPanelView {
        let criteria = &self.criteria;
        let platforms = Platform::ALL
            .iter()
            .map(|p| SelectOption {
                value: p.as_str().to_string(),
                label: p.label().to_string(),
                selected: criteria.platform == Some(*p),
            })
            .collect();
        let sizes = AudienceSize::ALL
            .iter()
            .map(|s| SelectOption {
                value: s.as_str().to_string(),
                label: s.label().to_string(),
                selected: criteria.size == *s,
            })
            .collect();

        let label = if searching {
            "Searching..."
        } else {
            "Search Influencers"
        };

        FilterPanelView {
            criteria: criteria.clone(),
            platforms,
            sizes,
            locations: self.location_options(),
            location_required: self.policy.require_location,
            category_suggestions: category_suggestions(&criteria.category),
            avg_views: SliderView {
                min: f64::from(AVG_VIEWS_MIN),
                max: f64::from(AVG_VIEWS_MAX),
                step: f64::from(AVG_VIEWS_STEP),
                value: f64::from(criteria.min_avg_views),
                caption: format!("From: {}", thousands(u64::from(criteria.min_avg_views))),
            },
            engagement_rate: SliderView {
                min: ENGAGEMENT_MIN,
                max: ENGAGEMENT_MAX,
                step: ENGAGEMENT_STEP,
                value: criteria.min_engagement_rate,
                caption: format!("From: {:.1}%", criteria.min_engagement_rate),
            },
            missing_fields: self.missing_fields(),
            search: Button::new(label, ButtonVariant::Hero)
                .enabled(self.search_enabled() && !searching),
        }
    }
}
