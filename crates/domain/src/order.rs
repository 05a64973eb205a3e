//! Order records and validated order placement.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A placed order.
///
/// Orders capture the product reference point-in-time: the referenced
/// product may later be restocked or disappear without affecting the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub product_id: ProductId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Materializes a stored order from a validated command.
    pub fn from_place(id: OrderId, cmd: PlaceOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: cmd.user_id,
            product_id: cmd.product_id,
            quantity: cmd.quantity,
            created_at: now,
        }
    }
}

/// Validated command to place an order for a single product.
///
/// The user identifier is opaque: it is trimmed and required to be
/// non-empty but never checked against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    user_id: String,
    product_id: ProductId,
    quantity: i64,
}

impl PlaceOrder {
    /// Validates the raw values of an order placement request.
    pub fn new(
        user_id: impl Into<String>,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }

        if quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }

        Ok(Self {
            user_id,
            product_id,
            quantity,
        })
    }

    /// Returns the ordering user's identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the ordered product's identifier.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the ordered quantity.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}
