use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;

use crate::payments::providers::paytr::PaytrConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub paytr: PaytrConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Externally reachable base URL; the payment gateway redirects here
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub email_sender: String,
    pub sms_sender_id: String,
    /// Mailbox receiving payment outcome notices
    pub ops_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .context("PORT not set")?
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL").context("PUBLIC_BASE_URL not set")?,
        };

        let paytr = PaytrConfig::from_env()?;

        let notifications = NotificationConfig {
            email_sender: env::var("EMAIL_SENDER")
                .unwrap_or_else(|_| "bookings@skytransfer.example".to_string()),
            sms_sender_id: env::var("SMS_SENDER_ID").unwrap_or_else(|_| "SKYTRNSFR".to_string()),
            ops_email: env::var("OPS_EMAIL")
                .unwrap_or_else(|_| "ops@skytransfer.example".to_string()),
        };

        let config = Config {
            server,
            paytr,
            notifications,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Validate port range
        if self.server.port < 1024 {
            return Err(anyhow!(
                "Port must be at least 1024, got {}",
                self.server.port
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.server.environment
            ));
        }

        if !self.server.public_base_url.starts_with("http") {
            return Err(anyhow!(
                "PUBLIC_BASE_URL must be an absolute URL, got {}",
                self.server.public_base_url
            ));
        }

        // Merchant credentials must be present before any payment is attempted
        self.paytr.validate()?;

        if self.notifications.ops_email.trim().is_empty() {
            return Err(anyhow!("OPS_EMAIL cannot be empty"));
        }

        Ok(())
    }
}
