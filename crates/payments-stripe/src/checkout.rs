//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API for one-time payments.

use crate::config::StripeConfig;
use crate::webhook::construct_event;
use async_trait::async_trait;
use chrono::DateTime;
use payments_core::{
    from_minor_units, CheckoutSession, CheckoutUrls, PaymentError, PaymentResult,
    PaymentSessionRequest, PaymentStrategy, WebhookEvent, ORDER_ID_METADATA_KEY,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Checkout mode sent with every session; this service only takes one-time payments
const CHECKOUT_MODE: &str = "payment";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page, so card data never touches this service.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Build the form-encoded body for `POST /v1/checkout/sessions`
    fn build_form_params(
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), CHECKOUT_MODE.to_string()),
            ("success_url".to_string(), urls.success_url.clone()),
            ("cancel_url".to_string(), urls.cancel_url.clone()),
            (
                format!("payment_intent_data[metadata][{}]", ORDER_ID_METADATA_KEY),
                request.order_id.clone(),
            ),
        ];

        for (i, item) in request.line_items().into_iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                item.currency,
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name,
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }

    async fn parse_session_response(
        response: reqwest::Response,
        order_id: &str,
    ) -> PaymentResult<CheckoutSession> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let provider_object: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let session: StripeCheckoutSessionResponse =
            serde_json::from_value(provider_object.clone()).map_err(|e| {
                PaymentError::Serialization(format!("Unexpected Stripe session shape: {}", e))
            })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            session_id: session.id,
            order_id: order_id.to_string(),
            provider: "stripe".to_string(),
            checkout_url: session.url.unwrap_or_default(),
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            provider_object,
        })
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, request, urls), fields(order_id = %request.order_id))]
    async fn create_checkout(
        &self,
        request: &PaymentSessionRequest,
        urls: &CheckoutUrls,
    ) -> PaymentResult<CheckoutSession> {
        if request.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Payment session has no items".to_string(),
            ));
        }

        let form_params = Self::build_form_params(request, urls);

        debug!(
            "Creating Stripe checkout session: {} items, total={:.2} {}",
            request.items.len(),
            from_minor_units(request.total()),
            request.currency_code()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        Self::parse_session_response(response, &request.order_id).await
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent> {
        construct_event(
            payload,
            signature,
            &self.config.endpoint_secret,
            self.config.webhook_tolerance_secs,
        )
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_core::SessionItem;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

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

    fn urls() -> CheckoutUrls {
        CheckoutUrls::new("https://shop.test/success", "https://shop.test/cancel")
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn strategy_for(server: &MockServer) -> StripeCheckoutStrategy {
        let config =
            StripeConfig::new("sk_test_abc123", "whsec_secret").with_api_base_url(server.uri());
        StripeCheckoutStrategy::new(config).unwrap()
    }

    #[test]
    fn test_form_params() {
        let params = StripeCheckoutStrategy::build_form_params(&mug_request(), &urls());

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(param(&params, "success_url"), Some("https://shop.test/success"));
        assert_eq!(param(&params, "cancel_url"), Some("https://shop.test/cancel"));
        assert_eq!(
            param(&params, "payment_intent_data[metadata][orderId]"),
            Some("abc")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][currency]"),
            Some("usd")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][product_data][name]"),
            Some("Mug")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][unit_amount]"),
            Some("999")
        );
        assert_eq!(param(&params, "line_items[0][quantity]"), Some("2"));
    }

    #[test]
    fn test_form_params_keep_item_order() {
        let mut request = mug_request();
        request.items.push(SessionItem {
            name: "Coaster".to_string(),
            price: 1.5,
            quantity: 1,
        });

        let params = StripeCheckoutStrategy::build_form_params(&request, &urls());

        assert_eq!(
            param(&params, "line_items[1][price_data][product_data][name]"),
            Some("Coaster")
        );
        assert_eq!(
            param(&params, "line_items[1][price_data][unit_amount]"),
            Some("150")
        );
    }

    #[tokio::test]
    async fn test_create_checkout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("authorization", "Bearer sk_test_abc123"))
            .and(header_exists("idempotency-key"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains(
                "payment_intent_data%5Bmetadata%5D%5BorderId%5D=abc",
            ))
            .and(body_string_contains(
                "line_items%5B0%5D%5Bprice_data%5D%5Bunit_amount%5D=999",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_123",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123",
                "expires_at": 1_700_086_400,
                "mode": "payment"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = strategy_for(&server)
            .create_checkout(&mug_request(), &urls())
            .await
            .unwrap();

        assert_eq!(session.session_id, "cs_test_123");
        assert_eq!(session.order_id, "abc");
        assert_eq!(
            session.checkout_url,
            "https://checkout.stripe.com/c/pay/cs_test_123"
        );
        assert_eq!(session.expires_at.unwrap().timestamp(), 1_700_086_400);
        assert_eq!(session.provider_object["object"], "checkout.session");
    }

    #[tokio::test]
    async fn test_provider_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Invalid currency: xyz",
                    "param": "line_items[0][price_data][currency]"
                }
            })))
            .mount(&server)
            .await;

        let err = strategy_for(&server)
            .create_checkout(&mug_request(), &urls())
            .await
            .unwrap_err();

        match err {
            PaymentError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Invalid currency: xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = strategy_for(&server)
            .create_checkout(&mug_request(), &urls())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("upstream down"));
        assert_eq!(err.status_code(), 502);
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected_locally() {
        let server = MockServer::start().await;
        let mut request = mug_request();
        request.items.clear();

        let err = strategy_for(&server)
            .create_checkout(&request, &urls())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvalidRequest(_)));
    }
}
