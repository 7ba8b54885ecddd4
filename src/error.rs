//! Application error types
//!
//! A single `AppError` carries a classified kind so callers can distinguish
//! configuration problems, invalid input, and external gateway failures, and
//! decide whether a retry makes sense.

use std::fmt;
use thiserror::Error;

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by external services
#[derive(Debug, Clone, Error)]
pub enum ExternalError {
    /// Payment gateway rejected the request or could not be reached
    #[error("{gateway} gateway error: {message}")]
    PaymentGateway {
        gateway: String,
        message: String,
        is_retryable: bool,
    },

    /// External service rate limit hit
    #[error("{service} rate limit exceeded")]
    RateLimit {
        service: String,
        retry_after: Option<u64>,
    },
}

/// Classified error kind
#[derive(Debug, Clone, Error)]
pub enum AppErrorKind {
    /// Missing or invalid process configuration
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Caller-supplied input failed validation
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Failure in an external collaborator
    #[error(transparent)]
    External(#[from] ExternalError),
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub context: Option<String>,
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::Configuration {
            message: message.into(),
        })
    }

    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::new(AppErrorKind::Validation {
            field: field.into(),
            message: message.into(),
        })
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            AppErrorKind::External(ExternalError::PaymentGateway { is_retryable, .. }) => {
                *is_retryable
            }
            AppErrorKind::External(ExternalError::RateLimit { .. }) => true,
            _ => false,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, AppErrorKind::Configuration { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, AppErrorKind::Validation { .. })
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{} ({})", self.kind, context)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let retryable = AppError::new(AppErrorKind::External(ExternalError::PaymentGateway {
            gateway: "PayTR".to_string(),
            message: "HTTP 503".to_string(),
            is_retryable: true,
        }));
        assert!(retryable.is_retryable());

        let rejected = AppError::new(AppErrorKind::External(ExternalError::PaymentGateway {
            gateway: "PayTR".to_string(),
            message: "bad request".to_string(),
            is_retryable: false,
        }));
        assert!(!rejected.is_retryable());

        assert!(!AppError::configuration("missing merchant key").is_retryable());
        assert!(!AppError::validation("amount", "must be positive").is_retryable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = AppError::configuration("PAYTR_MERCHANT_ID not set")
            .with_context("loading payment gateway config");
        let rendered = err.to_string();
        assert!(rendered.contains("PAYTR_MERCHANT_ID not set"));
        assert!(rendered.contains("loading payment gateway config"));
    }
}
