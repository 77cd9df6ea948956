pub mod app_config;
pub mod config;
pub mod email;
pub mod filters;
pub mod pricing;
pub mod records;

pub use app_config::{AppConfig, Environment, StripeConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use email::is_valid_email;
pub use filters::{
    category_suggestions, country_label, AudienceSize, FilterCriteria, FilterField, Platform,
    SearchPolicy, SearchQuery, CATEGORY_SUGGESTIONS, COUNTRIES,
};
pub use pricing::{custom_quote, PackageTier, PurchaseOption, PACKAGE_TIERS};
pub use records::{
    InfluencerSummary, Offer, PackageRecord, PackageStatus, PackageType, SearchResult,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Reasons a [`FilterCriteria`] cannot be turned into a submittable query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("search blocked; missing required filters: {}", join_fields(.0))]
    MissingFields(Vec<FilterField>),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown audience size: {0}")]
    UnknownAudienceSize(String),
}

fn join_fields(fields: &[FilterField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
