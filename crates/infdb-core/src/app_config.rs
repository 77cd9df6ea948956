use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Billing widget identifiers baked into the purchase hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeConfig {
    pub pricing_table_id: String,
    pub publishable_key: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub webhook_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub stripe: Option<StripeConfig>,
    pub require_location: bool,
    pub min_display_total: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("webhook_base_url", &self.webhook_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "stripe_pricing_table_id",
                &self.stripe.as_ref().map(|s| s.pricing_table_id.as_str()),
            )
            .field("require_location", &self.require_location)
            .field("min_display_total", &self.min_display_total)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish_non_exhaustive()
    }
}
