//! Checkout workflow for the storefront.
//!
//! Turns a validated order request into a stored order with reserved
//! stock, rolling the order back when the reservation fails.

pub mod error;
pub mod workflow;

pub use error::{CheckoutError, Result};
pub use workflow::CheckoutWorkflow;
