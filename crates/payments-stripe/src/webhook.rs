//! # Stripe Webhook Handling
//!
//! Turns a verified webhook body into a [`WebhookEvent`] and routes it to a
//! [`WebhookHandler`].

use crate::signature;
use chrono::{DateTime, Utc};
use payments_core::{ChargeRecord, PaymentError, PaymentResult, WebhookEvent, WebhookEventType};
use tracing::{debug, info, warn};

/// Verify the signature of `payload` and parse it into an event.
///
/// Nothing in the body is looked at until the signature checks out.
pub fn construct_event(
    payload: &[u8],
    signature_header: &str,
    endpoint_secret: &str,
    tolerance_secs: i64,
) -> PaymentResult<WebhookEvent> {
    signature::verify(payload, signature_header, endpoint_secret, tolerance_secs)?;
    parse_event(payload)
}

/// Parse a verified body into an event.
///
/// Only a body that is not JSON at all is an error; missing or oddly typed
/// envelope fields fall back to empty values.
fn parse_event(payload: &[u8]) -> PaymentResult<WebhookEvent> {
    let raw: serde_json::Value = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
    })?;

    let event_type = raw.get("type").and_then(|v| v.as_str()).unwrap_or_default();

    debug!("Verified Stripe webhook: type={}", event_type);

    let event_id = raw
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let created_at = raw
        .get("created")
        .and_then(|v| v.as_i64())
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    let livemode = raw.get("livemode").and_then(|v| v.as_bool()).unwrap_or(false);

    let object = raw
        .get("data")
        .and_then(|d| d.get("object"))
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    Ok(WebhookEvent {
        event_id,
        event_type: WebhookEventType::from_provider_type(event_type),
        provider: "stripe".to_string(),
        livemode,
        object,
        created_at,
    })
}

/// Webhook event handler trait
///
/// Implement this trait to act on payment events. The default methods only
/// log.
pub trait WebhookHandler: Send + Sync {
    /// Called when a charge succeeds
    fn on_charge_succeeded(&self, charge: ChargeRecord) -> PaymentResult<()> {
        match charge.order_id() {
            Some(order_id) => info!(order_id = %order_id, charge_id = %charge.id, "Charge succeeded"),
            None => warn!(charge_id = %charge.id, "Charge succeeded without an orderId in metadata"),
        }
        Ok(())
    }

    /// Called for every event type without a dedicated method
    fn on_unhandled_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Unhandled event type {}", event.event_type);
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: WebhookEvent) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::ChargeSucceeded => {
            let charge = ChargeRecord::from_event(&event)?;
            handler.on_charge_succeeded(charge)
        }
        WebhookEventType::Unknown(_) => handler.on_unhandled_event(&event),
    }
}
