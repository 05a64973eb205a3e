use async_trait::async_trait;
use common::{OrderId, ProductId};
use domain::{NewProduct, Order, PlaceOrder, Product, ValidationError};

use crate::Result;

/// Number of records a listing returns when the caller does not ask
/// for a specific page size.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a listing will serve.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A validated pagination window.
///
/// Construction enforces `1 <= limit <= MAX_PAGE_LIMIT` and `offset >= 0`,
/// so stores can consume a `Page` without re-checking its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Validates a pagination window from raw query values.
    pub fn new(limit: i64, offset: i64) -> std::result::Result<Self, ValidationError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::LimitOutOfRange { max: MAX_PAGE_LIMIT });
        }
        if offset < 0 {
            return Err(ValidationError::NegativeOffset);
        }
        Ok(Self { limit, offset })
    }

    /// Returns the page size.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Returns the number of records skipped before the page starts.
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Filter criteria for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,

    /// Matches products whose size set contains this value.
    /// Compared case-insensitively against the lower-cased stored sizes.
    pub size: Option<String>,
}

impl ProductFilter {
    /// Creates an empty filter matching every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by name substring.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filters by size membership.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// Persistence operations for the product catalog.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persists a new product, assigning its ID and timestamps.
    async fn create(&self, new: NewProduct) -> Result<Product>;

    /// Lists products matching the filter, ordered by ID ascending,
    /// paginated after filtering.
    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>>;

    /// Retrieves a product by ID.
    ///
    /// Returns None if the product doesn't exist.
    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Atomically decrements a product's available quantity.
    ///
    /// The check and the write happen as one step: the quantity is
    /// reduced (and `updated_at` refreshed) only if the stored quantity
    /// is at least `amount`. Returns whether the decrement was applied;
    /// `false` means insufficient stock or an unknown product, with the
    /// record left untouched.
    async fn decrement_quantity(&self, id: ProductId, amount: i64) -> Result<bool>;
}

/// Persistence operations for orders.
///
/// Order stores never apply business rules: stock checks and rollback
/// decisions belong to the checkout workflow.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order, assigning its ID and creation timestamp.
    async fn insert(&self, cmd: PlaceOrder) -> Result<Order>;

    /// Retrieves an order by ID.
    ///
    /// Returns None if the order doesn't exist.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Deletes an order by ID.
    ///
    /// Idempotent: deleting an absent order succeeds. This is the
    /// checkout workflow's compensating action.
    async fn delete(&self, id: OrderId) -> Result<()>;

    /// Lists a user's orders, newest first, paginated after ordering.
    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>>;
}
