//! # Validated JSON
//!
//! An extractor that deserializes a JSON body and runs its `validator`
//! rules before the handler sees it.

use crate::handlers::ErrorResponse;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_response)?;

        value.validate().map_err(|errors| {
            let details = serde_json::to_value(&errors).unwrap_or_default();
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Validation failed", 400).with_details(details)),
            )
        })?;

        Ok(Self(value))
    }
}

fn json_rejection_to_response(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(
            ErrorResponse::new("Invalid request body", 400)
                .with_details(serde_json::Value::String(rejection.body_text())),
        ),
    )
}
