//! Wire types for the webhook endpoints.
//!
//! The webhooks are loosely typed: counts sometimes arrive as strings or
//! floats, identifiers as numbers or strings, and lists as `null`. The
//! lenient helpers in [`de`] absorb that so normalization only deals with
//! well-formed values.

use infdb_core::{PackageStatus, PackageType, SearchQuery};
use serde::{Deserialize, Serialize};

/// Response of `POST /webhook/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub accounts: Option<Vec<AccountPayload>>,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub total: u64,
    #[serde(default)]
    pub platform: Option<String>,
}

/// One account entry: `{ "user_id": ..., "profile": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct AccountPayload {
    #[serde(deserialize_with = "de::string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub profile: ProfilePayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub followers: u64,
    #[serde(default)]
    pub engagement_percent: Option<f64>,
}

/// Body of `POST /webhook/trial`.
#[derive(Debug, Serialize)]
pub struct TrialRequest<'a> {
    pub offer_id: i64,
    pub email: &'a str,
}

/// Response of `POST /webhook/trial`.
#[derive(Debug, Default, Deserialize)]
pub struct TrialResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /webhook/offer?id=`.
#[derive(Debug, Deserialize)]
pub struct OfferPayload {
    #[serde(deserialize_with = "de::i64_required")]
    pub id: i64,
    pub filters: SearchQuery,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub total: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub packages: Option<Vec<PackagePayload>>,
    #[serde(default)]
    pub free_package_used: Option<bool>,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub packages_total: u64,
    /// Present only when the backend embeds the sample in the offer.
    #[serde(default)]
    pub accounts: Option<Vec<AccountPayload>>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PackagePayload {
    #[serde(deserialize_with = "de::i64_required")]
    pub id: i64,
    #[serde(deserialize_with = "de::i64_required")]
    pub offer_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type")]
    pub package_type: PackageType,
    #[serde(default)]
    pub platform: String,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub limit: u64,
    pub status: PackageStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

pub(crate) mod de {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn value_to_u64(value: &Value) -> Option<u64> {
        match value {
            Value::Null => Some(0),
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
    }

    fn value_to_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn u64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        value_to_u64(&value)
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative count, got {value}")))
    }

    pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(d)?;
        if value.is_null() {
            return Ok(None);
        }
        value_to_i64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an identifier, got {value}")))
    }

    pub fn i64_required<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(d)?;
        value_to_i64(&value)
            .ok_or_else(|| D::Error::custom(format!("expected an identifier, got {value}")))
    }

    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!(
                "expected a string or number, got {other}"
            ))),
        }
    }
}
