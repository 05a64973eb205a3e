//! Domain layer for the storefront.
//!
//! This crate provides the stored record types and their validated
//! construction commands:
//! - `Product` records created from a `NewProduct` command
//! - `Order` records created from a `PlaceOrder` command
//!
//! Commands validate and normalize raw client input on construction, so
//! every instance that exists is well-formed by the time it reaches a store.

pub mod error;
pub mod order;
pub mod product;

pub use error::ValidationError;
pub use order::{Order, PlaceOrder};
pub use product::{MAX_NAME_LENGTH, NewProduct, Product};
