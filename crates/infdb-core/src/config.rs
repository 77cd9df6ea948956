use crate::app_config::{AppConfig, Environment, StripeConfig};
use crate::ConfigError;

const DEFAULT_WEBHOOK_BASE_URL: &str = "https://workflow.influencersss.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("INFDB_ENV", "development"))?;

    let bind_addr = or_default("INFDB_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("INFDB_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("INFDB_LOG_LEVEL", "info");

    let webhook_base_url = or_default("INFDB_WEBHOOK_BASE_URL", DEFAULT_WEBHOOK_BASE_URL);
    if !(webhook_base_url.starts_with("http://") || webhook_base_url.starts_with("https://")) {
        return Err(invalid(
            "INFDB_WEBHOOK_BASE_URL",
            format!("expected an http(s) URL, got '{webhook_base_url}'"),
        ));
    }

    let request_timeout_secs = parse_u64("INFDB_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "INFDB_REQUEST_TIMEOUT_SECS",
            "timeout must be at least one second".to_string(),
        ));
    }
    let user_agent = or_default("INFDB_USER_AGENT", "infdb/0.1 (lead-funnel)");

    let pricing_table_id = lookup("INFDB_STRIPE_PRICING_TABLE_ID")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let publishable_key = lookup("INFDB_STRIPE_PUBLISHABLE_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let stripe = match (pricing_table_id, publishable_key) {
        (Some(pricing_table_id), Some(publishable_key)) => Some(StripeConfig {
            pricing_table_id,
            publishable_key,
        }),
        (None, _) if env == Environment::Production => {
            return Err(ConfigError::MissingEnvVar(
                "INFDB_STRIPE_PRICING_TABLE_ID".to_string(),
            ))
        }
        (_, None) if env == Environment::Production => {
            return Err(ConfigError::MissingEnvVar(
                "INFDB_STRIPE_PUBLISHABLE_KEY".to_string(),
            ))
        }
        _ => None,
    };

    let require_location = parse_bool(
        "INFDB_REQUIRE_LOCATION",
        &or_default("INFDB_REQUIRE_LOCATION", "false"),
    )?;
    let min_display_total = parse_u64("INFDB_MIN_DISPLAY_TOTAL", "1")?;
    let rate_limit_per_minute = parse_usize("INFDB_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        webhook_base_url,
        request_timeout_secs,
        user_agent,
        stripe,
        require_location,
        min_display_total,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INFDB_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}
