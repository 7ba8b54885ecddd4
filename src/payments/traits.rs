//! Payment gateway trait definitions
//!
//! Defines the interface the rest of the service programs against, so the
//! concrete gateway can be swapped for a test double.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::payments::types::{PaymentRequest, PaymentSession};

/// Trait for hosted-payment gateway integrations
///
/// The gateway issues a signed payment token, hosts the payment page the
/// customer is redirected to, and reports the outcome through a signed
/// status callback.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted-payment session for one checkout attempt
    ///
    /// Builds the canonical signed payload, calls the gateway's token
    /// endpoint, and returns the session the customer is redirected to.
    ///
    /// # Arguments
    /// * `request` - Payment request containing amount, currency, customer details, etc.
    ///
    /// # Returns
    /// * `PaymentSession` - Gateway token and hosted payment page URL
    async fn create_payment(&self, request: PaymentRequest) -> AppResult<PaymentSession>;

    /// Verify that an inbound status callback originated from the gateway
    ///
    /// Recomputes the expected signature from the callback fields and the
    /// merchant credentials and compares it against the supplied hash.
    /// A `false` result means "reject this payment confirmation"; it is not
    /// an error in the request lifecycle.
    ///
    /// # Arguments
    /// * `params` - Form fields posted by the gateway
    ///
    /// # Returns
    /// * `bool` - True only when the recomputed signature matches
    fn verify_callback(&self, params: &HashMap<String, String>) -> bool;
}
