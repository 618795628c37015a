//! # Webhook Events
//!
//! Provider-neutral representation of verified webhook events.

use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying the internal order ID on payments
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// `charge.succeeded`
    ChargeSucceeded,
    /// Any other event type (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    pub fn from_provider_type(event_type: &str) -> Self {
        match event_type {
            "charge.succeeded" => WebhookEventType::ChargeSucceeded,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::ChargeSucceeded => "charge.succeeded",
            WebhookEventType::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Whether the event came from live mode
    #[serde(default)]
    pub livemode: bool,

    /// The `data.object` payload of the event
    pub object: serde_json::Value,

    /// When the provider created the event
    pub created_at: DateTime<Utc>,
}

/// The charge carried by a `charge.succeeded` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRecord {
    #[serde(default)]
    pub id: String,

    /// Amount charged in minor units
    #[serde(default)]
    pub amount: i64,

    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub payment_intent: Option<String>,

    /// Metadata copied from the payment intent
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ChargeRecord {
    /// Parse the charge out of a webhook event
    pub fn from_event(event: &WebhookEvent) -> PaymentResult<Self> {
        serde_json::from_value(event.object.clone()).map_err(|e| {
            PaymentError::WebhookParseError(format!("Invalid charge object: {}", e))
        })
    }

    /// Get the internal order ID from metadata
    pub fn order_id(&self) -> Option<&str> {
        self.metadata.get(ORDER_ID_METADATA_KEY).map(String::as_str)
    }
}
