//! # Order Types
//!
//! The payment-session request accepted from clients and the checkout
//! session handed back by the provider.

use crate::money::to_minor_units;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An item inside a payment-session request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SessionItem {
    /// Product name shown on the hosted checkout page
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// Unit price as a decimal amount in the request currency
    #[validate(range(min = 0.0, message = "price must be a non-negative number"))]
    pub price: f64,

    /// Quantity
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
}

/// Request body for creating a payment session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaymentSessionRequest {
    /// Internal order ID, attached to the payment as metadata
    #[validate(length(min = 1, message = "orderId must not be empty"))]
    pub order_id: String,

    /// ISO 4217 currency code
    #[validate(length(min = 1, message = "currency must not be empty"))]
    pub currency: String,

    /// Items to charge for
    #[validate(length(min = 1, message = "items must contain at least one item"), nested)]
    pub items: Vec<SessionItem>,
}

impl PaymentSessionRequest {
    /// Normalized (lowercase) currency code
    pub fn currency_code(&self) -> String {
        self.currency.to_lowercase()
    }

    /// Line items with prices converted to minor units
    pub fn line_items(&self) -> Vec<LineItem> {
        let currency = self.currency_code();
        self.items
            .iter()
            .map(|item| LineItem {
                name: item.name.clone(),
                currency: currency.clone(),
                unit_amount: to_minor_units(item.price),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Order total in minor units, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.line_items()
            .iter()
            .map(LineItem::total)
            .fold(0, i64::saturating_add)
    }

    /// Check if the request has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A priced line item, ready for the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Lowercase ISO 4217 code
    pub currency: String,
    /// Unit price in minor units
    pub unit_amount: i64,
    pub quantity: u32,
}

impl LineItem {
    /// Calculate the total for this line item in minor units, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.unit_amount.saturating_mul(i64::from(self.quantity))
    }
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our internal order ID
    pub order_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect the customer to for payment
    pub checkout_url: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// The session object exactly as the provider returned it
    pub provider_object: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug_request() -> PaymentSessionRequest {
        PaymentSessionRequest {
            order_id: "abc".to_string(),
            currency: "usd".to_string(),
            items: vec![SessionItem {
                name: "Mug".to_string(),
                price: 9.99,
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_line_items_use_minor_units() {
        let items = mug_request().line_items();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_amount, 999);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].currency, "usd");
    }

    #[test]
    fn test_line_total_scales_with_quantity() {
        let mut item = mug_request().line_items().remove(0);
        for quantity in 1..=5 {
            item.quantity = quantity;
            assert_eq!(item.total(), 999 * i64::from(quantity));
        }
    }

    #[test]
    fn test_order_total() {
        let mut request = mug_request();
        request.items.push(SessionItem {
            name: "Coaster".to_string(),
            price: 2.5,
            quantity: 4,
        });

        assert_eq!(request.total(), 1998 + 1000);
    }

    #[test]
    fn test_huge_totals_saturate() {
        let request = PaymentSessionRequest {
            order_id: "abc".to_string(),
            currency: "usd".to_string(),
            items: vec![
                SessionItem {
                    name: "Yacht".to_string(),
                    price: 1e15,
                    quantity: 100,
                },
                SessionItem {
                    name: "Island".to_string(),
                    price: 1e15,
                    quantity: 100,
                },
            ],
        };
        assert!(request.validate().is_ok());

        let items = request.line_items();
        assert_eq!(items[0].total(), i64::MAX);
        assert_eq!(request.total(), i64::MAX);
    }

    #[test]
    fn test_currency_is_lowercased() {
        let mut request = mug_request();
        request.currency = "EUR".to_string();

        assert_eq!(request.line_items()[0].currency, "eur");
    }

    #[test]
    fn test_deserializes_camel_case() {
        let request: PaymentSessionRequest = serde_json::from_value(serde_json::json!({
            "orderId": "abc",
            "currency": "usd",
            "items": [{ "name": "Mug", "price": 9.99, "quantity": 2 }]
        }))
        .unwrap();

        assert_eq!(request.order_id, "abc");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = serde_json::from_value::<PaymentSessionRequest>(serde_json::json!({
            "orderId": "abc",
            "currency": "usd",
            "items": [],
            "discount": 10
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rules() {
        let mut request = mug_request();
        request.items.clear();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));

        let mut request = mug_request();
        request.items[0].quantity = 0;
        request.items[0].price = -1.0;
        assert!(request.validate().is_err());

        let mut request = mug_request();
        request.items[0].price = 0.0;
        assert!(request.validate().is_ok());
    }
}
