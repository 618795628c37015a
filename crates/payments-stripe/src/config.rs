//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.

use payments_core::PaymentError;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Default webhook timestamp tolerance, matching Stripe's SDKs
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook endpoint signing secret (whsec_...)
    pub endpoint_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Maximum age of a webhook signature timestamp, in seconds
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET`
    /// - `STRIPE_ENDPOINT_SECRET`
    ///
    /// Optional:
    /// - `STRIPE_API_BASE_URL`
    /// - `STRIPE_WEBHOOK_TOLERANCE_SECS`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("STRIPE_SECRET")
            .map_err(|_| PaymentError::Configuration("STRIPE_SECRET not set".to_string()))?;

        let endpoint_secret = env::var("STRIPE_ENDPOINT_SECRET").map_err(|_| {
            PaymentError::Configuration("STRIPE_ENDPOINT_SECRET not set".to_string())
        })?;

        let mut config = Self::new(secret_key, endpoint_secret);

        if let Ok(url) = env::var("STRIPE_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }

        if let Ok(raw) = env::var("STRIPE_WEBHOOK_TOLERANCE_SECS") {
            let secs = raw.parse().map_err(|_| {
                PaymentError::Configuration(format!(
                    "STRIPE_WEBHOOK_TOLERANCE_SECS must be an integer, got {:?}",
                    raw
                ))
            })?;
            config = config.with_webhook_tolerance(secs);
        }

        config.validated()
    }

    /// Create config with explicit values
    pub fn new(secret_key: impl Into<String>, endpoint_secret: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            endpoint_secret: endpoint_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    /// Validate key formats
    pub fn validated(self) -> Result<Self, PaymentError> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if !self.endpoint_secret.starts_with("whsec_") {
            return Err(PaymentError::Configuration(
                "STRIPE_ENDPOINT_SECRET must start with whsec_".to_string(),
            ));
        }

        Ok(self)
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set webhook timestamp tolerance (0 disables the check)
    pub fn with_webhook_tolerance(mut self, secs: i64) -> Self {
        self.webhook_tolerance_secs = secs;
        self
    }
}
