//! # Payment Strategy Trait
//!
//! The seam between the HTTP layer and a concrete payment provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          PaymentStrategy (trait)            │
//! │  ├── create_checkout()                      │
//! │  ├── verify_webhook()                       │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!              ┌────────┴────────┐
//!              │ StripeCheckout  │
//!              │    Strategy     │
//!              └─────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::event::WebhookEvent;
use crate::order::{CheckoutSession, PaymentSessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a one-time payment checkout session.
    ///
    /// # Arguments
    /// * `request` - The order to check out
    /// * `urls` - Where the provider sends the customer afterwards
    async fn create_checkout(
        &self,
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> PaymentResult<CheckoutSession>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes, exactly as received
    /// * `signature` - Signature header from the request
    async fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect targets for a checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// URL to redirect after successful payment
    pub success_url: String,
    /// URL to redirect if the customer cancels
    pub cancel_url: String,
}

impl CheckoutUrls {
    pub fn new(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}
