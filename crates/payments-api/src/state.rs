//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment strategy, the webhook handler and configuration.

use anyhow::Context;
use payments_core::{BoxedPaymentStrategy, CheckoutUrls};
use payments_stripe::{LoggingWebhookHandler, StripeCheckoutStrategy, WebhookHandler};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Log output format override (`json` or `pretty`)
    pub log_format: Option<String>,
    /// Redirect targets handed to the provider
    pub urls: CheckoutUrls,
}

impl AppConfig {
    /// Load from environment variables
    ///
    /// Required env vars:
    /// - `STRIPE_SUCCESS_URL`
    /// - `STRIPE_CANCEL_URL`
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            Err(_) => 3000,
        };

        let success_url = std::env::var("STRIPE_SUCCESS_URL").context("STRIPE_SUCCESS_URL not set")?;
        let cancel_url = std::env::var("STRIPE_CANCEL_URL").context("STRIPE_CANCEL_URL not set")?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_format: std::env::var("LOG_FORMAT").ok(),
            urls: CheckoutUrls::new(success_url, cancel_url),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// JSON logs when `LOG_FORMAT=json`, or in production unless overridden
    pub fn json_logs(&self) -> bool {
        match &self.log_format {
            Some(format) => format.eq_ignore_ascii_case("json"),
            None => self.is_production(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub strategy: BoxedPaymentStrategy,
    /// Receives verified webhook events
    pub webhook_handler: Arc<dyn WebhookHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let stripe_strategy = StripeCheckoutStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_strategy(config, Arc::new(stripe_strategy)))
    }

    /// Assemble state from parts, logging webhook events by default
    pub fn with_strategy(config: AppConfig, strategy: BoxedPaymentStrategy) -> Self {
        Self {
            strategy,
            webhook_handler: Arc::new(LoggingWebhookHandler),
            config,
        }
    }

    /// Builder: replace the webhook handler
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhook_handler = handler;
        self
    }

    /// Redirect targets for new checkout sessions
    pub fn checkout_urls(&self) -> &CheckoutUrls {
        &self.config.urls
    }
}
