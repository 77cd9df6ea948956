//! Conversion of webhook payloads into `infdb-core` domain types.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use infdb_core::{InfluencerSummary, Offer, PackageRecord, SearchResult};

use crate::types::{AccountPayload, OfferPayload, PackagePayload, SearchResponse};

/// Parses the timestamp formats the webhook has been seen to emit: RFC 3339,
/// and naive `YYYY-MM-DD HH:MM:SS[.f]` / `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[must_use]
pub fn normalize_account(payload: AccountPayload) -> InfluencerSummary {
    let profile = payload.profile;
    let username = profile.username.unwrap_or_default();
    let full_name = profile
        .full_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    InfluencerSummary {
        user_id: payload.user_id,
        full_name,
        username,
        picture_url: profile.picture.unwrap_or_default(),
        follower_count: profile.followers,
        engagement_rate_percent: profile.engagement_percent.unwrap_or(0.0),
    }
}

/// Normalizes accounts in rank order, dropping repeated `user_id`s after the
/// first occurrence.
#[must_use]
pub fn normalize_accounts(payloads: Vec<AccountPayload>) -> Vec<InfluencerSummary> {
    let mut seen = HashSet::new();
    payloads
        .into_iter()
        .filter(|p| seen.insert(p.user_id.clone()))
        .map(normalize_account)
        .collect()
}

/// Converts a search response into a [`SearchResult`].
///
/// `total` is the backend's match count as sent; a zero total stays zero
/// even when preview accounts came along with it.
#[must_use]
pub fn normalize_search(response: SearchResponse) -> SearchResult {
    SearchResult {
        offer_id: response.id,
        accounts: normalize_accounts(response.accounts.unwrap_or_default()),
        total: response.total,
        platform: response.platform.unwrap_or_default(),
    }
}

#[must_use]
pub fn normalize_package(payload: PackagePayload) -> PackageRecord {
    PackageRecord {
        id: payload.id,
        offer_id: payload.offer_id,
        email: payload.email,
        package_type: payload.package_type,
        platform: payload.platform,
        record_limit: payload.limit,
        status: payload.status,
        created_at: payload.created_at.as_deref().and_then(parse_timestamp),
    }
}

/// Converts an offer payload into an [`Offer`], keeping the embedded sample
/// when the backend supplied one.
#[must_use]
pub fn normalize_offer(payload: OfferPayload) -> Offer {
    let id = payload.id;
    let total = payload.total;
    let fallback_platform = payload.filters.platform.as_str().to_string();
    let sample = payload.accounts.map(|accounts| SearchResult {
        offer_id: Some(id),
        accounts: normalize_accounts(accounts),
        total,
        platform: payload
            .platform
            .filter(|p| !p.is_empty())
            .unwrap_or(fallback_platform),
    });

    Offer {
        id,
        filters: payload.filters,
        total,
        created_at: payload.created_at.as_deref().and_then(parse_timestamp),
        updated_at: payload.updated_at.as_deref().and_then(parse_timestamp),
        free_trial_used: payload.free_package_used.unwrap_or(false),
        packages: payload
            .packages
            .unwrap_or_default()
            .into_iter()
            .map(normalize_package)
            .collect(),
        packages_total: payload.packages_total,
        sample,
    }
}
