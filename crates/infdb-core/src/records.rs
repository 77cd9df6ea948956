use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::SearchQuery;

/// One matching account in a search preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerSummary {
    /// Unique within a single [`SearchResult`].
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    pub picture_url: String,
    pub follower_count: u64,
    pub engagement_rate_percent: f64,
}

/// Outcome of one search, or the sample attached to an offer.
///
/// `accounts` is the backend's preview in rank order and is usually much
/// shorter than `total`. A new result always replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub offer_id: Option<i64>,
    pub accounts: Vec<InfluencerSummary>,
    pub total: u64,
    pub platform: String,
}

impl SearchResult {
    /// The result shown when a search fails or matches nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Free,
    Starter,
    Professional,
    Enterprise,
    Custom,
    #[serde(other)]
    Unknown,
}

impl PackageType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PackageType::Free => "Free Trial",
            PackageType::Starter => "Starter",
            PackageType::Professional => "Professional",
            PackageType::Enterprise => "Enterprise",
            PackageType::Custom => "Custom",
            PackageType::Unknown => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Pending,
    Sent,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl PackageStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PackageStatus::Pending => "Pending",
            PackageStatus::Sent => "Sent",
            PackageStatus::Completed => "Completed",
            PackageStatus::Failed => "Failed",
            PackageStatus::Unknown => "Unknown",
        }
    }
}

/// A trial or paid delivery recorded against an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: i64,
    pub offer_id: i64,
    pub email: String,
    pub package_type: PackageType,
    pub platform: String,
    pub record_limit: u64,
    pub status: PackageStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored search with its trial and purchase history. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub filters: SearchQuery,
    pub total: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub free_trial_used: bool,
    pub packages: Vec<PackageRecord>,
    pub packages_total: u64,
    /// Preview accounts when the backend embeds them in the offer payload.
    pub sample: Option<SearchResult>,
}

impl Offer {
    /// True while the purchased record count is below the number of matches.
    #[must_use]
    pub fn needs_more_packages(&self) -> bool {
        self.total > self.packages_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{AudienceSize, Platform};

    fn offer(total: u64, packages_total: u64) -> Offer {
        Offer {
            id: 7,
            filters: SearchQuery {
                platform: Platform::Tiktok,
                size: AudienceSize::Nano,
                location: "fr".to_string(),
                category: "Beauty".to_string(),
                avg_views: 500,
                er: 1.2,
            },
            total,
            created_at: None,
            updated_at: None,
            free_trial_used: false,
            packages: Vec::new(),
            packages_total,
            sample: None,
        }
    }

    #[test]
    fn empty_result_has_no_identifier() {
        let r = SearchResult::empty();
        assert!(r.is_empty());
        assert!(r.offer_id.is_none());
        assert!(r.accounts.is_empty());
    }

    #[test]
    fn needs_more_packages_compares_totals() {
        assert!(offer(120, 30).needs_more_packages());
        assert!(!offer(30, 30).needs_more_packages());
    }

    #[test]
    fn unknown_package_values_deserialize_leniently() {
        let t: PackageType = serde_json::from_str("\"bundle\"").unwrap();
        assert_eq!(t, PackageType::Unknown);
        let s: PackageStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(s, PackageStatus::Unknown);
        let known: PackageType = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(known.label(), "Free Trial");
    }
}
