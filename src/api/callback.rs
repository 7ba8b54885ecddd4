//! Gateway status callback endpoint
//!
//! PayTR posts the payment outcome as a signed form. An invalid signature
//! rejects the confirmation; the gateway re-posts until it receives a plain
//! `OK` body.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use tracing::{info, warn};

use crate::api::AppState;
use crate::notifications::{Channel, MessageEnvelope, NotificationKind};

pub async fn payment_callback(
    State(state): State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    if !state.gateway.verify_callback(&params) {
        return (StatusCode::BAD_REQUEST, "signature verification failed").into_response();
    }

    let order_id = params.get("merchant_oid").cloned().unwrap_or_default();
    let status = params.get("status").map(String::as_str).unwrap_or("unknown");
    let total_amount = params.get("total_amount").cloned().unwrap_or_default();

    let (kind, subject, body) = if status == "success" {
        info!(
            "Payment confirmed: order_id={} total_amount={}",
            order_id, total_amount
        );
        (
            NotificationKind::PaymentReceived,
            format!("Payment received for {}", order_id),
            format!("Order {} paid, amount {}.", order_id, total_amount),
        )
    } else {
        warn!("Payment failed: order_id={} status={}", order_id, status);
        (
            NotificationKind::PaymentFailed,
            format!("Payment failed for {}", order_id),
            format!("Order {} reported status '{}'.", order_id, status),
        )
    };

    state
        .notifier
        .dispatch(MessageEnvelope {
            kind,
            channel: Channel::Email,
            recipient: state.config.notifications.ops_email.clone(),
            subject,
            body,
        })
        .await;

    (StatusCode::OK, "OK").into_response()
}
