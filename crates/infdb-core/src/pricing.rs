//! Package catalog shown next to the billing widget, and custom-volume quotes.
//!
//! Checkout itself happens in the hosted pricing table; these figures only
//! drive what the funnel displays.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::records::PackageType;

pub const CUSTOM_MIN_RECORDS: u32 = 600;
pub const CUSTOM_MAX_RECORDS: u32 = 10_000;
/// Custom volumes are offered only when the search matched more than this.
pub const CUSTOM_AVAILABLE_ABOVE: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageTier {
    pub package_type: PackageType,
    pub name: &'static str,
    pub records: u32,
    pub price_usd: u32,
    pub description: &'static str,
    pub features: [&'static str; 3],
    pub recommended: bool,
}

impl PackageTier {
    #[must_use]
    pub fn price(&self) -> Decimal {
        Decimal::from(self.price_usd)
    }
}

pub const PACKAGE_TIERS: [PackageTier; 3] = [
    PackageTier {
        package_type: PackageType::Starter,
        name: "Starter",
        records: 30,
        price_usd: 99,
        description: "Perfect for first-time users",
        features: ["30 verified influencers", "Basic analytics", "Email support"],
        recommended: false,
    },
    PackageTier {
        package_type: PackageType::Professional,
        name: "Professional",
        records: 100,
        price_usd: 199,
        description: "For serious campaigns",
        features: [
            "100 verified influencers",
            "Advanced analytics",
            "Priority support",
        ],
        recommended: false,
    },
    PackageTier {
        package_type: PackageType::Enterprise,
        name: "Enterprise",
        records: 500,
        price_usd: 299,
        description: "Maximum efficiency",
        features: [
            "500 verified influencers",
            "Full analytics",
            "Personal manager",
        ],
        recommended: true,
    },
];

/// What the custom-volume control resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PurchaseOption {
    Custom {
        records: u32,
        total: Decimal,
        per_record: Decimal,
    },
    /// Volumes at the top of the range are negotiated by hand.
    ContactSales { records: u32 },
}

/// Per-record price for a custom volume, by band.
fn custom_rate(records: u32) -> Decimal {
    match records {
        0..=1_000 => Decimal::new(50, 2),
        1_001..=3_000 => Decimal::new(40, 2),
        _ => Decimal::new(30, 2),
    }
}

/// Quotes a custom package of `requested` records for a search with
/// `match_total` matches.
///
/// The request is clamped to `[600, min(match_total, 10 000)]`. Returns `None`
/// when the search is too small for custom volumes.
#[must_use]
pub fn custom_quote(requested: u32, match_total: u64) -> Option<PurchaseOption> {
    if match_total <= CUSTOM_AVAILABLE_ABOVE {
        return None;
    }

    let upper = u32::try_from(match_total)
        .unwrap_or(u32::MAX)
        .min(CUSTOM_MAX_RECORDS)
        .max(CUSTOM_MIN_RECORDS);
    let records = requested.clamp(CUSTOM_MIN_RECORDS, upper);

    if records >= CUSTOM_MAX_RECORDS {
        return Some(PurchaseOption::ContactSales { records });
    }

    let per_record = custom_rate(records);
    Some(PurchaseOption::Custom {
        records,
        total: Decimal::from(records) * per_record,
        per_record,
    })
}
