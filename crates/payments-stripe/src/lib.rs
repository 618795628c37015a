//! # payments-stripe
//!
//! Stripe payment strategy for the payments microservice.
//!
//! [`StripeCheckoutStrategy`] opens hosted Checkout Sessions in `payment`
//! mode and verifies `Stripe-Signature` headers on incoming webhooks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use payments_stripe::StripeCheckoutStrategy;
//! use payments_core::{CheckoutUrls, PaymentStrategy};
//!
//! let strategy = StripeCheckoutStrategy::from_env()?;
//!
//! let session = strategy.create_checkout(&request, &urls).await?;
//!
//! // Redirect user to session.checkout_url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use payments_stripe::{dispatch_webhook_event, WebhookHandler};
//!
//! struct Fulfilment;
//!
//! impl WebhookHandler for Fulfilment {
//!     fn on_charge_succeeded(&self, charge: ChargeRecord) -> PaymentResult<()> {
//!         mark_paid(charge.order_id());
//!         Ok(())
//!     }
//! }
//!
//! let event = strategy.verify_webhook(payload, signature).await?;
//! dispatch_webhook_event(&Fulfilment, event)?;
//! ```

pub mod checkout;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
pub use signature::SIGNATURE_HEADER;
pub use webhook::{construct_event, dispatch_webhook_event, LoggingWebhookHandler, WebhookHandler};
