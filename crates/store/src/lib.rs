//! Storage backends for the storefront catalog and order book.
//!
//! The [`ProductStore`] and [`OrderStore`] traits define the persistence
//! seam; [`memory`] provides a zero-configuration backend for tests and
//! local development, and [`postgres`] the production one. Both uphold
//! the same contract, most importantly that
//! [`ProductStore::decrement_quantity`] is atomic under concurrency.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::{InMemoryOrderStore, InMemoryProductStore};
pub use postgres::{PgOrderStore, PgProductStore, run_migrations};
pub use store::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, OrderStore, Page, ProductFilter, ProductStore,
};
