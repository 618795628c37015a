//! # payments-api
//!
//! HTTP API layer for the payments microservice.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payments/create-payment-session` | Create checkout session |
//! | GET | `/payments/success` | Payment success landing |
//! | GET | `/payments/cancel` | Payment cancel landing |
//! | POST | `/payments/webhook` | Stripe webhook |

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
