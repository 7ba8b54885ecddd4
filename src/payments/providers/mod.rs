//! Payment gateway implementations
//!
//! Concrete implementations of the PaymentGateway trait.

pub mod paytr;

pub use paytr::PaytrProvider;
