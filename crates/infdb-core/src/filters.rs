//! Search filter state and the policy deciding when it can be submitted.
//!
//! [`FilterCriteria`] is the editable, possibly incomplete state behind the
//! filter panel. [`SearchQuery`] is the validated form sent to the search
//! webhook; it is also the shape the backend stores as an offer's filter
//! snapshot, so both directions share the backend field names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FilterError;

pub const AVG_VIEWS_MIN: u32 = 100;
pub const AVG_VIEWS_MAX: u32 = 10_000;
pub const AVG_VIEWS_STEP: u32 = 100;
pub const AVG_VIEWS_DEFAULT: u32 = 2_500;

pub const ENGAGEMENT_MIN: f64 = 0.1;
pub const ENGAGEMENT_MAX: f64 = 2.0;
pub const ENGAGEMENT_DEFAULT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
    Twitter,
    Twitch,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Twitter,
        Platform::Twitch,
    ];

    /// Backend identifier, e.g. `"youtube"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Twitch => "twitch",
        }
    }

    /// Human-facing name, e.g. `"YouTube"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Youtube => "YouTube",
            Platform::Tiktok => "TikTok",
            Platform::Twitter => "Twitter",
            Platform::Twitch => "Twitch",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| FilterError::UnknownPlatform(s.to_string()))
    }
}

/// Audience size tier, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceSize {
    Nano,
    #[default]
    Micro,
    Mid,
    Macro,
    Mega,
}

impl AudienceSize {
    pub const ALL: [AudienceSize; 5] = [
        AudienceSize::Nano,
        AudienceSize::Micro,
        AudienceSize::Mid,
        AudienceSize::Macro,
        AudienceSize::Mega,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AudienceSize::Nano => "nano",
            AudienceSize::Micro => "micro",
            AudienceSize::Mid => "mid",
            AudienceSize::Macro => "macro",
            AudienceSize::Mega => "mega",
        }
    }

    /// Label including the follower band, e.g. `"Micro (10K-50K)"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AudienceSize::Nano => "Nano (1K-10K)",
            AudienceSize::Micro => "Micro (10K-50K)",
            AudienceSize::Mid => "Mid (50K-500K)",
            AudienceSize::Macro => "Macro (500K-1M)",
            AudienceSize::Mega => "Mega (1M+)",
        }
    }
}

impl std::fmt::Display for AudienceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudienceSize {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AudienceSize::ALL
            .into_iter()
            .find(|size| size.as_str() == wanted)
            .ok_or_else(|| FilterError::UnknownAudienceSize(s.to_string()))
    }
}

/// A filter that can block submission when left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Platform,
    Category,
    Location,
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterField::Platform => write!(f, "platform"),
            FilterField::Category => write!(f, "category"),
            FilterField::Location => write!(f, "location"),
        }
    }
}

/// The user's current search criteria.
///
/// The numeric fields are lower bounds; the backend has no upper bound for
/// either of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub platform: Option<Platform>,
    pub size: AudienceSize,
    /// Location identifier; empty means "any".
    pub location: String,
    /// Free text, usually one of [`CATEGORY_SUGGESTIONS`].
    pub category: String,
    pub min_avg_views: u32,
    pub min_engagement_rate: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            platform: None,
            size: AudienceSize::default(),
            location: String::new(),
            category: String::new(),
            min_avg_views: AVG_VIEWS_DEFAULT,
            min_engagement_rate: ENGAGEMENT_DEFAULT,
        }
    }
}

/// Clamps an average-views value into the slider range and snaps it to the
/// nearest step.
#[must_use]
pub fn clamp_avg_views(value: u32) -> u32 {
    let clamped = value.clamp(AVG_VIEWS_MIN, AVG_VIEWS_MAX);
    let snapped = (clamped + AVG_VIEWS_STEP / 2) / AVG_VIEWS_STEP * AVG_VIEWS_STEP;
    snapped.clamp(AVG_VIEWS_MIN, AVG_VIEWS_MAX)
}

/// Clamps an engagement-rate percentage into the slider range, rounded to one
/// decimal place. NaN collapses to the minimum.
#[must_use]
pub fn clamp_engagement_rate(value: f64) -> f64 {
    if value.is_nan() {
        return ENGAGEMENT_MIN;
    }
    let rounded = (value * 10.0).round() / 10.0;
    rounded.clamp(ENGAGEMENT_MIN, ENGAGEMENT_MAX)
}

/// Which filters must be filled before a search may be submitted.
///
/// Platform and category are always required; location is optional unless
/// `require_location` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchPolicy {
    pub require_location: bool,
}

impl SearchPolicy {
    /// Returns the required fields that are still empty, in panel order.
    #[must_use]
    pub fn missing_fields(&self, criteria: &FilterCriteria) -> Vec<FilterField> {
        let mut missing = Vec::new();
        if criteria.platform.is_none() {
            missing.push(FilterField::Platform);
        }
        if self.require_location && criteria.location.trim().is_empty() {
            missing.push(FilterField::Location);
        }
        if criteria.category.trim().is_empty() {
            missing.push(FilterField::Category);
        }
        missing
    }

    #[must_use]
    pub fn can_search(&self, criteria: &FilterCriteria) -> bool {
        self.missing_fields(criteria).is_empty()
    }

    /// Converts criteria into a submittable query.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MissingFields`] listing every empty required field.
    pub fn query(&self, criteria: &FilterCriteria) -> Result<SearchQuery, FilterError> {
        let missing = self.missing_fields(criteria);
        match criteria.platform {
            Some(platform) if missing.is_empty() => Ok(SearchQuery {
                platform,
                size: criteria.size,
                location: criteria.location.trim().to_string(),
                category: criteria.category.trim().to_string(),
                avg_views: criteria.min_avg_views,
                er: criteria.min_engagement_rate,
            }),
            _ => Err(FilterError::MissingFields(missing)),
        }
    }
}

/// Validated search request in the backend's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub platform: Platform,
    #[serde(default)]
    pub size: AudienceSize,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub avg_views: u32,
    #[serde(default)]
    pub er: f64,
}

impl SearchQuery {
    /// Rebuilds editable criteria, e.g. to prefill the panel from an offer.
    #[must_use]
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            platform: Some(self.platform),
            size: self.size,
            location: self.location.clone(),
            category: self.category.clone(),
            min_avg_views: self.avg_views,
            min_engagement_rate: self.er,
        }
    }
}

/// Static location list used until a platform-specific list is loaded.
pub const COUNTRIES: [(&str, &str); 20] = [
    ("us", "United States"),
    ("uk", "United Kingdom"),
    ("de", "Germany"),
    ("fr", "France"),
    ("br", "Brazil"),
    ("ca", "Canada"),
    ("au", "Australia"),
    ("es", "Spain"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("kr", "South Korea"),
    ("in", "India"),
    ("mx", "Mexico"),
    ("nl", "Netherlands"),
    ("se", "Sweden"),
    ("no", "Norway"),
    ("dk", "Denmark"),
    ("fi", "Finland"),
    ("ch", "Switzerland"),
    ("at", "Austria"),
];

#[must_use]
pub fn country_label(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, label)| *label)
}

pub const CATEGORY_SUGGESTIONS: [&str; 20] = [
    "Fashion",
    "Beauty",
    "Lifestyle",
    "Fitness & Health",
    "Food & Cooking",
    "Travel",
    "Technology",
    "Gaming",
    "Music",
    "Art & Design",
    "Business",
    "Education",
    "Sports",
    "Entertainment",
    "Photography",
    "DIY & Crafts",
    "Parenting",
    "Pets & Animals",
    "Home & Decor",
    "Automotive",
];

/// Suggestions matching what the user has typed so far (case-insensitive
/// substring). Empty input returns the full list.
#[must_use]
pub fn category_suggestions(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    CATEGORY_SUGGESTIONS
        .iter()
        .copied()
        .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FilterCriteria {
        FilterCriteria {
            platform: Some(Platform::Instagram),
            category: "Fashion".to_string(),
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn defaults_match_landing_page() {
        let c = FilterCriteria::default();
        assert!(c.platform.is_none());
        assert_eq!(c.size, AudienceSize::Micro);
        assert!(c.location.is_empty());
        assert!(c.category.is_empty());
        assert_eq!(c.min_avg_views, 2_500);
        assert!((c.min_engagement_rate - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn search_disabled_without_platform() {
        let c = FilterCriteria {
            platform: None,
            ..complete()
        };
        let policy = SearchPolicy::default();
        assert!(!policy.can_search(&c));
        assert_eq!(policy.missing_fields(&c), vec![FilterField::Platform]);
    }

    #[test]
    fn search_disabled_with_blank_category() {
        let c = FilterCriteria {
            category: "   ".to_string(),
            ..complete()
        };
        assert!(!SearchPolicy::default().can_search(&c));
    }

    #[test]
    fn search_disabled_for_every_platform_when_category_empty() {
        let policy = SearchPolicy::default();
        for platform in Platform::ALL {
            let c = FilterCriteria {
                platform: Some(platform),
                ..FilterCriteria::default()
            };
            assert!(!policy.can_search(&c), "{platform} with empty category");
        }
    }

    #[test]
    fn location_only_required_when_policy_says_so() {
        let c = complete();
        assert!(SearchPolicy::default().can_search(&c));
        let strict = SearchPolicy {
            require_location: true,
        };
        assert_eq!(strict.missing_fields(&c), vec![FilterField::Location]);
    }

    #[test]
    fn query_maps_to_backend_field_names() {
        let c = FilterCriteria {
            location: " us ".to_string(),
            ..complete()
        };
        let query = SearchPolicy::default().query(&c).unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "platform": "instagram",
                "size": "micro",
                "location": "us",
                "category": "Fashion",
                "avg_views": 2500,
                "er": 0.8
            })
        );
    }

    #[test]
    fn query_reports_all_missing_fields() {
        let err = SearchPolicy {
            require_location: true,
        }
        .query(&FilterCriteria::default())
        .unwrap_err();
        assert_eq!(
            err,
            FilterError::MissingFields(vec![
                FilterField::Platform,
                FilterField::Location,
                FilterField::Category
            ])
        );
        assert_eq!(
            err.to_string(),
            "search blocked; missing required filters: platform, location, category"
        );
    }

    #[test]
    fn query_round_trips_to_criteria() {
        let c = complete();
        let query = SearchPolicy::default().query(&c).unwrap();
        assert_eq!(query.to_criteria(), c);
    }

    #[test]
    fn clamp_avg_views_snaps_to_step() {
        assert_eq!(clamp_avg_views(0), 100);
        assert_eq!(clamp_avg_views(2_549), 2_500);
        assert_eq!(clamp_avg_views(2_550), 2_600);
        assert_eq!(clamp_avg_views(50_000), 10_000);
    }

    #[test]
    fn clamp_engagement_rate_bounds_and_rounds() {
        assert!((clamp_engagement_rate(0.0) - 0.1).abs() < 1e-9);
        assert!((clamp_engagement_rate(1.26) - 1.3).abs() < 1e-9);
        assert!((clamp_engagement_rate(9.0) - 2.0).abs() < 1e-9);
        assert!((clamp_engagement_rate(f64::NAN) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::Youtube);
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(FilterError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn audience_size_parses_and_labels() {
        let size: AudienceSize = "MEGA".parse().unwrap();
        assert_eq!(size, AudienceSize::Mega);
        assert_eq!(size.label(), "Mega (1M+)");
    }

    #[test]
    fn country_label_lookup() {
        assert_eq!(country_label("de"), Some("Germany"));
        assert_eq!(country_label("UK"), Some("United Kingdom"));
        assert_eq!(country_label("zz"), None);
    }

    #[test]
    fn category_suggestions_filter_by_substring() {
        assert_eq!(category_suggestions("").len(), 20);
        assert_eq!(category_suggestions("cook"), vec!["Food & Cooking"]);
        assert_eq!(category_suggestions("ART"), vec!["Art & Design"]);
        assert_eq!(
            category_suggestions(" &  "),
            category_suggestions("&"),
            "input is trimmed before matching"
        );
        assert!(category_suggestions("underwater basket").is_empty());
    }
}
