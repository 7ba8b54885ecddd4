//! PayTR payment gateway integration
//!
//! This module talks to PayTR's hosted-payment API: it requests a signed
//! payment token for a checkout attempt and verifies the signed status
//! callback the gateway posts back after the customer pays.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::{AppError, AppErrorKind, AppResult, ExternalError};
use crate::payments::signer::{constant_time_eq, HmacSha256Signer, Signer};
use crate::payments::traits::PaymentGateway;
use crate::payments::types::{PaymentRequest, PaymentSession};

/// PayTR gateway configuration
#[derive(Debug, Clone)]
pub struct PaytrConfig {
    /// Merchant id issued by the gateway
    pub merchant_id: String,
    /// Merchant key used to sign requests
    pub merchant_key: String,
    /// Merchant salt appended to the canonical hash input
    pub merchant_salt: String,
    /// Whether payments run against the gateway's test environment
    pub test_mode: bool,
    /// Gateway base URL (defaults to https://www.paytr.com)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of retries for failed requests
    pub max_retries: u32,
}

impl Default for PaytrConfig {
    fn default() -> Self {
        Self {
            merchant_id: String::new(),
            merchant_key: String::new(),
            merchant_salt: String::new(),
            test_mode: false,
            base_url: "https://www.paytr.com".to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl PaytrConfig {
    /// Create config from environment variables
    ///
    /// The three merchant credentials are required; a missing one is a
    /// startup configuration error, not a silent fallback. Test mode is an
    /// explicit opt-in via `PAYTR_TEST_MODE`.
    pub fn from_env() -> Result<Self, AppError> {
        let merchant_id = require_env("PAYTR_MERCHANT_ID")?;
        let merchant_key = require_env("PAYTR_MERCHANT_KEY")?;
        let merchant_salt = require_env("PAYTR_MERCHANT_SALT")?;

        let test_mode = std::env::var("PAYTR_TEST_MODE")
            .map(|v| matches!(v.trim(), "1" | "true"))
            .unwrap_or(false);

        let base_url = std::env::var("PAYTR_BASE_URL")
            .unwrap_or_else(|_| "https://www.paytr.com".to_string());

        let timeout_secs = std::env::var("PAYTR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let max_retries = std::env::var("PAYTR_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        Ok(Self {
            merchant_id,
            merchant_key,
            merchant_salt,
            test_mode,
            base_url,
            timeout_secs,
            max_retries,
        })
    }

    /// Check that no credential field is empty
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("merchant_id", &self.merchant_id),
            ("merchant_key", &self.merchant_key),
            ("merchant_salt", &self.merchant_salt),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "PayTR {} must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::configuration(format!(
            "{} environment variable is required",
            name
        ))),
    }
}

/// PayTR payment gateway
pub struct PaytrProvider {
    config: PaytrConfig,
    client: Client,
    signer: Box<dyn Signer>,
}

// Manual impl: the boxed signer has no Debug, and the config holds the
// merchant secrets anyway.
impl std::fmt::Debug for PaytrProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaytrProvider")
            .field("merchant_id", &self.config.merchant_id)
            .field("test_mode", &self.config.test_mode)
            .finish_non_exhaustive()
    }
}

impl PaytrProvider {
    /// Create a new PayTR gateway instance
    ///
    /// Fails fast on empty merchant credentials so a misconfigured process
    /// never sends unsigned requests to the gateway.
    pub fn new(config: PaytrConfig) -> AppResult<Self> {
        let signer = Box::new(HmacSha256Signer::new(config.merchant_key.as_bytes().to_vec()));
        Self::with_signer(config, signer)
    }

    /// Create a gateway instance with a custom signer (used by tests)
    pub fn with_signer(config: PaytrConfig, signer: Box<dyn Signer>) -> AppResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            signer,
        })
    }

    /// Create gateway from environment variables
    pub fn from_env() -> AppResult<Self> {
        let config = PaytrConfig::from_env()?;
        Self::new(config)
    }

    /// Canonical hash input for the token request
    ///
    /// Fixed field order, no separators. This is the wire contract with the
    /// gateway and must match byte-for-byte what it recomputes on its side.
    fn hash_input(&self, request: &PaymentRequest) -> String {
        format!(
            "{}{}{}{}{}{}",
            self.config.merchant_id,
            request.customer_email,
            request.order_id,
            request.amount,
            request.currency.as_str(),
            self.config.merchant_salt
        )
    }

    /// Single-item basket descriptor the gateway renders on the payment page
    fn basket(&self, request: &PaymentRequest) -> String {
        serde_json::json!([[request.description, request.amount.to_string(), 1]]).to_string()
    }

    /// Form payload for the token endpoint
    fn token_form(&self, request: &PaymentRequest, paytr_token: &str) -> Vec<(&'static str, String)> {
        vec![
            ("merchant_id", self.config.merchant_id.clone()),
            ("user_ip", request.customer_ip.clone()),
            ("merchant_oid", request.order_id.clone()),
            ("email", request.customer_email.clone()),
            ("payment_amount", request.amount.to_string()),
            ("currency", request.currency.as_str().to_string()),
            ("user_name", request.customer_name.clone()),
            ("user_address", "airport transfer".to_string()),
            ("user_phone", request.customer_phone.clone()),
            ("merchant_ok_url", request.success_url.clone()),
            ("merchant_fail_url", request.fail_url.clone()),
            ("user_basket", self.basket(request)),
            ("paytr_token", paytr_token.to_string()),
            ("test_mode", if self.config.test_mode { "1" } else { "0" }.to_string()),
        ]
    }

    /// Hosted payment page for an issued token
    fn payment_page_url(&self, token: &str) -> String {
        format!("{}/odeme/guvenli/{}", self.config.base_url, token)
    }

    /// POST the token request, retrying transient failures with backoff
    async fn request_token(&self, form: &[(&'static str, String)]) -> AppResult<PaytrTokenResponse> {
        let url = format!("{}/odeme/api/get-token", self.config.base_url);
        let mut last_error: Option<reqwest::Error> = None;

        for attempt in 0..=self.config.max_retries {
            let response = self.client.post(&url).form(form).send().await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();

                    if status.is_success() {
                        return serde_json::from_str::<PaytrTokenResponse>(&body).map_err(|e| {
                            error!("Failed to parse PayTR response: {}", e);
                            AppError::new(AppErrorKind::External(ExternalError::PaymentGateway {
                                gateway: "PayTR".to_string(),
                                message: format!("invalid response format: {}", e),
                                is_retryable: false,
                            }))
                        });
                    } else if status == 429 {
                        if attempt < self.config.max_retries {
                            let backoff = 2_u64.pow(attempt);
                            warn!(
                                "Rate limited, retrying after {} seconds (attempt {})",
                                backoff,
                                attempt + 1
                            );
                            tokio::time::sleep(Duration::from_secs(backoff)).await;
                            continue;
                        }
                        return Err(AppError::new(AppErrorKind::External(
                            ExternalError::RateLimit {
                                service: "PayTR".to_string(),
                                retry_after: Some(60),
                            },
                        )));
                    } else if status.is_server_error() && attempt < self.config.max_retries {
                        let backoff = 2_u64.pow(attempt);
                        warn!(
                            "Server error {}, retrying after {} seconds (attempt {})",
                            status,
                            backoff,
                            attempt + 1
                        );
                        tokio::time::sleep(Duration::from_secs(backoff)).await;
                        continue;
                    } else {
                        let message = format!("HTTP {}: {}", status, body);
                        error!("PayTR API error: {}", message);
                        return Err(AppError::new(AppErrorKind::External(
                            ExternalError::PaymentGateway {
                                gateway: "PayTR".to_string(),
                                message,
                                is_retryable: status.is_server_error(),
                            },
                        )));
                    }
                }
                Err(e) => {
                    if attempt < self.config.max_retries {
                        let backoff = 2_u64.pow(attempt);
                        warn!(
                            "Request error, retrying after {} seconds (attempt {}): {}",
                            backoff,
                            attempt + 1,
                            e
                        );
                        last_error = Some(e);
                        tokio::time::sleep(Duration::from_secs(backoff)).await;
                        continue;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::new(AppErrorKind::External(
            ExternalError::PaymentGateway {
                gateway: "PayTR".to_string(),
                message: format!(
                    "request failed after {} retries: {}",
                    self.config.max_retries,
                    last_error
                        .as_ref()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "unknown error".to_string())
                ),
                is_retryable: true,
            },
        )))
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PaytrProvider {
    async fn create_payment(&self, request: PaymentRequest) -> AppResult<PaymentSession> {
        request.validate()?;

        info!(
            "Creating PayTR payment: {} {} {}",
            request.amount, request.currency, request.order_id
        );

        let paytr_token = self.signer.sign(self.hash_input(&request).as_bytes());
        let form = self.token_form(&request, &paytr_token);
        let response = self.request_token(&form).await?;

        match response {
            PaytrTokenResponse {
                status,
                token: Some(token),
                ..
            } if status == "success" => {
                info!(
                    "PayTR payment created: order_id={}, token issued",
                    request.order_id
                );
                Ok(PaymentSession {
                    payment_url: self.payment_page_url(&token),
                    token,
                })
            }
            PaytrTokenResponse { reason, .. } => {
                let message = reason.unwrap_or_else(|| "token request rejected".to_string());
                error!(
                    "PayTR rejected payment: order_id={}, reason={}",
                    request.order_id, message
                );
                Err(AppError::new(AppErrorKind::External(
                    ExternalError::PaymentGateway {
                        gateway: "PayTR".to_string(),
                        message,
                        is_retryable: false,
                    },
                )))
            }
        }
    }

    fn verify_callback(&self, params: &HashMap<String, String>) -> bool {
        let (Some(merchant_oid), Some(status), Some(total_amount), Some(hash)) = (
            params.get("merchant_oid"),
            params.get("status"),
            params.get("total_amount"),
            params.get("hash"),
        ) else {
            warn!("PayTR callback rejected: required field missing");
            return false;
        };

        // Order id anchors the signature; the gateway appends the result
        // status fields before signing.
        let input = format!(
            "{}{}{}{}",
            merchant_oid, self.config.merchant_salt, status, total_amount
        );
        let expected = self.signer.sign(input.as_bytes());

        let valid = constant_time_eq(expected.as_bytes(), hash.trim().as_bytes());
        if !valid {
            warn!(
                "PayTR callback rejected: signature mismatch for order_id={}",
                merchant_oid
            );
        }
        valid
    }
}

// Token endpoint response
#[derive(Debug, Deserialize)]
struct PaytrTokenResponse {
    status: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}
