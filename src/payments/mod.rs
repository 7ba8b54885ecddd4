//! Payment gateway integration module
//!
//! This module provides the hosted-payment flow against the PayTR gateway:
//! signed token requests, redirect sessions, and status-callback verification.

pub mod providers;
pub mod signer;
pub mod traits;
pub mod types;
