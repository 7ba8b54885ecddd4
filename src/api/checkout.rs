//! Checkout initiation endpoint
//!
//! Accepts a booking's payment details, builds the gateway request, and
//! responds with either the hosted-payment redirect or a classified error.
//! The response body always has exactly one shape: success with a session,
//! or failure with an error message.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::{AppError, AppErrorKind};
use crate::payments::types::{Currency, PaymentRequest};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Fare in minor currency units
    pub amount: u64,
    pub currency: Currency,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// Line-item label; defaults to a generic transfer description
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: String,
    pub token: String,
    pub payment_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CheckoutRequest>,
) -> Response {
    let order_id = format!("RES-{}", Uuid::new_v4().simple());
    let base = state.config.server.public_base_url.trim_end_matches('/');

    let request = PaymentRequest {
        amount: req.amount,
        currency: req.currency,
        order_id: order_id.clone(),
        customer_name: req.customer_name,
        customer_email: req.customer_email,
        customer_phone: req.customer_phone,
        customer_ip: client_ip(&headers),
        success_url: format!("{}/payment/success", base),
        fail_url: format!("{}/payment/fail", base),
        description: req
            .description
            .unwrap_or_else(|| "Airport transfer booking".to_string()),
    };

    match state.gateway.create_payment(request).await {
        Ok(session) => (
            StatusCode::OK,
            Json(CheckoutResponse {
                success: true,
                order_id,
                token: session.token,
                payment_url: session.payment_url,
                created_at: Utc::now(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Checkout failed: order_id={}: {}", order_id, err);
            (
                status_for(&err),
                Json(ErrorResponse {
                    success: false,
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn status_for(err: &AppError) -> StatusCode {
    match &err.kind {
        AppErrorKind::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppErrorKind::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppErrorKind::External(_) if err.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        AppErrorKind::External(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Client address for the gateway's risk checks, honoring the proxy header
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "0.0.0.0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExternalError;

    #[test]
    fn test_client_ip_from_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.10, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers), "203.0.113.10");
    }

    #[test]
    fn test_client_ip_fallback() {
        assert_eq!(client_ip(&HeaderMap::new()), "0.0.0.0");
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            status_for(&AppError::validation("amount", "must be positive")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&AppError::configuration("missing key")),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let retryable = AppError::new(AppErrorKind::External(ExternalError::PaymentGateway {
            gateway: "PayTR".to_string(),
            message: "HTTP 503".to_string(),
            is_retryable: true,
        }));
        assert_eq!(status_for(&retryable), StatusCode::SERVICE_UNAVAILABLE);

        let rejected = AppError::new(AppErrorKind::External(ExternalError::PaymentGateway {
            gateway: "PayTR".to_string(),
            message: "declined".to_string(),
            is_retryable: false,
        }));
        assert_eq!(status_for(&rejected), StatusCode::BAD_GATEWAY);
    }
}
