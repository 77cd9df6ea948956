//! Typed client for the influencer-search webhooks.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::WebhookClient;
pub use error::WebhookError;
pub use normalize::parse_timestamp;
