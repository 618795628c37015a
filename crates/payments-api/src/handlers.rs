//! # Request Handlers
//!
//! Axum request handlers for the payments API.

use crate::extract::ValidatedJson;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use payments_core::{PaymentError, PaymentSessionRequest};
use payments_stripe::{dispatch_webhook_event, SIGNATURE_HEADER};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Body returned once a webhook has been verified
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub signature: String,
}

/// Landing page payload for the checkout redirects
#[derive(Debug, Serialize)]
pub struct RedirectStatus {
    pub ok: bool,
    pub message: &'static str,
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn webhook_rejection(message: impl std::fmt::Display) -> Response {
    (StatusCode::BAD_REQUEST, format!("Webhook Error: {}", message)).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payments-ms",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a checkout session and return the provider's session object
#[instrument(skip(state, request), fields(order_id = %request.order_id, items = request.items.len()))]
pub async fn create_payment_session(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PaymentSessionRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let session = state
        .strategy
        .create_checkout(&request, state.checkout_urls())
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            payment_error_to_response(e)
        })?;

    info!(
        "Created {} checkout session {} for order {}",
        state.strategy.provider_name(),
        session.session_id,
        session.order_id
    );

    Ok(Json(session.provider_object))
}

/// Redirect target after a completed payment
pub async fn payment_success() -> Json<RedirectStatus> {
    Json(RedirectStatus {
        ok: true,
        message: "Payment successful",
    })
}

/// Redirect target after a cancelled payment
pub async fn payment_cancel() -> Json<RedirectStatus> {
    Json(RedirectStatus {
        ok: false,
        message: "Payment cancelled",
    })
}

/// Handle the provider's webhook.
///
/// The body must be the raw bytes the provider signed. Any verification
/// failure, or a body that is not JSON, is a plaintext 400. Once verified
/// the event is acknowledged with 200 regardless of its type or of what the
/// webhook handler makes of it.
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn payment_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        warn!("Webhook rejected: missing {} header", SIGNATURE_HEADER);
        return webhook_rejection("No stripe-signature header value was provided.");
    };

    let event = match state.strategy.verify_webhook(&body, signature).await {
        Ok(event) => event,
        Err(e) => {
            warn!("Webhook verification failed: {}", e);
            return webhook_rejection(e);
        }
    };

    info!(
        "Received webhook: type={}, id={}",
        event.event_type, event.event_id
    );

    // A verified event is always acknowledged
    if let Err(e) = dispatch_webhook_event(state.webhook_handler.as_ref(), event) {
        error!("Webhook handler error: {}", e);
    }

    (
        StatusCode::OK,
        Json(WebhookAck {
            signature: signature.to_string(),
        }),
    )
        .into_response()
}
