//! # Routes
//!
//! Axum router configuration for the payments API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /payments/create-payment-session - Open a checkout session
/// - GET  /payments/success - Redirect target after payment
/// - GET  /payments/cancel - Redirect target on cancel
/// - POST /payments/webhook - Stripe webhook (raw body)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route("/create-payment-session", post(handlers::create_payment_session))
        .route("/success", get(handlers::payment_success))
        .route("/cancel", get(handlers::payment_cancel))
        // Takes `Bytes`, so the signed body reaches the handler untouched
        .route("/webhook", post(handlers::payment_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/payments", payment_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
