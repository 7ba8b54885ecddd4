//! HTTP API layer
//!
//! Thin axum handlers over the payment gateway and notification seams. All
//! business decisions live in the payments module; handlers translate between
//! HTTP and typed results.

pub mod callback;
pub mod checkout;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::Config;
use crate::notifications::NotificationDispatcher;
use crate::payments::traits::PaymentGateway;

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<NotificationDispatcher>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/payments/checkout", post(checkout::create_checkout))
        .route("/api/payments/callback", post(callback::payment_callback))
        .with_state(state)
}
