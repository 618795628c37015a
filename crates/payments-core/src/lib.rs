//! # payments-core
//!
//! Core types and traits for the payments microservice.
//!
//! This crate provides:
//! - `PaymentSessionRequest` and `LineItem` for the checkout flow
//! - `CheckoutSession` returned by a provider
//! - `WebhookEvent` and `ChargeRecord` for payment callbacks
//! - `PaymentStrategy` trait for implementing payment providers
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use payments_core::{CheckoutUrls, PaymentSessionRequest, PaymentStrategy};
//!
//! let request: PaymentSessionRequest = serde_json::from_str(body)?;
//! let urls = CheckoutUrls::new("https://shop.test/success", "https://shop.test/cancel");
//!
//! let session = strategy.create_checkout(&request, &urls).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod error;
pub mod event;
pub mod money;
pub mod order;
pub mod strategy;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{ChargeRecord, WebhookEvent, WebhookEventType, ORDER_ID_METADATA_KEY};
pub use money::{from_minor_units, to_minor_units};
pub use order::{CheckoutSession, LineItem, PaymentSessionRequest, SessionItem};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};
