//! Payment gateway types and data structures
//!
//! Common types used by the gateway integration for checkout requests,
//! hosted-payment sessions, and status callbacks.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"))
}

/// Currencies accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "TRY")]
    Try,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// Wire form expected by the gateway
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Try => "TRY",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "TRY" => Ok(Currency::Try),
            "EUR" => Ok(Currency::Eur),
            other => Err(AppError::validation(
                "currency",
                format!("unsupported currency '{}'", other),
            )),
        }
    }
}

/// Payment request for one checkout attempt
///
/// Built per attempt, consumed exactly once by `create_payment`, and
/// discarded. Persistence of the resulting reservation is the booking
/// layer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in minor currency units (e.g. cents), must be positive
    pub amount: u64,
    /// Payment currency
    pub currency: Currency,
    /// Unique reference for this payment attempt
    pub order_id: String,
    /// Customer full name
    pub customer_name: String,
    /// Customer email address
    pub customer_email: String,
    /// Customer phone number
    pub customer_phone: String,
    /// Client IP forwarded to the gateway for its risk checks
    pub customer_ip: String,
    /// Redirect target after a completed payment
    pub success_url: String,
    /// Redirect target after a failed or abandoned payment
    pub fail_url: String,
    /// Line-item label shown on the hosted payment page
    pub description: String,
}

impl PaymentRequest {
    /// Validate the request before it is sent to the gateway
    pub fn validate(&self) -> AppResult<()> {
        if self.amount == 0 {
            return Err(AppError::validation("amount", "must be greater than zero"));
        }
        if self.order_id.trim().is_empty() {
            return Err(AppError::validation("order_id", "must not be empty"));
        }
        if !email_regex().is_match(&self.customer_email) {
            return Err(AppError::validation(
                "customer_email",
                format!("'{}' is not a valid email address", self.customer_email),
            ));
        }
        if self.success_url.trim().is_empty() || self.fail_url.trim().is_empty() {
            return Err(AppError::validation(
                "redirect_urls",
                "success and fail URLs must not be empty",
            ));
        }
        Ok(())
    }
}

/// Hosted-payment session returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Signing token issued by the gateway for this payment
    pub token: String,
    /// Hosted payment page the customer is redirected to
    pub payment_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            amount: 8500,
            currency: Currency::Usd,
            order_id: "RES-001".to_string(),
            customer_name: "Ahmet Yilmaz".to_string(),
            customer_email: "ahmet@email.com".to_string(),
            customer_phone: "+905551112233".to_string(),
            customer_ip: "203.0.113.10".to_string(),
            success_url: "https://booking.example/payment/success".to_string(),
            fail_url: "https://booking.example/payment/fail".to_string(),
            description: "Airport transfer IST -> Taksim".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut req = request();
        req.amount = 0;
        let err = req.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_malformed_email_rejected() {
        let mut req = request();
        req.customer_email = "not-an-email".to_string();
        assert!(req.validate().is_err());

        req.customer_email = "a b@email.com".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_order_id_rejected() {
        let mut req = request();
        req.order_id = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_currency_round_trip() {
        for code in ["USD", "TRY", "EUR"] {
            assert_eq!(Currency::from_str(code).unwrap().as_str(), code);
        }
        assert!(Currency::from_str("GBP").is_err());
    }
}
