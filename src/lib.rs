//! SkyTransfer backend
//!
//! Backend service for an airport-transfer booking business: hosted-payment
//! checkout against the PayTR gateway, signed status-callback verification,
//! and customer/ops notification dispatch.

pub mod api;
pub mod config;
pub mod error;
pub mod notifications;
pub mod payments;
