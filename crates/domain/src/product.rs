//! Product records and validated product creation.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use common::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted length of a product name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// A catalog product with its live inventory count.
///
/// `available_quantity` is only ever reduced through the store's
/// conditional decrement and never goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub sizes: BTreeSet<String>,
    pub available_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materializes a stored product from a validated command.
    pub fn from_new(id: ProductId, new: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            sizes: new.sizes,
            available_quantity: new.available_quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated command to add a product to the catalog.
///
/// Construction normalizes the input: the name is trimmed, sizes are
/// trimmed and lower-cased, duplicate sizes collapse.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    price: Decimal,
    sizes: BTreeSet<String>,
    available_quantity: i64,
}

impl NewProduct {
    /// Validates and normalizes the raw values of a product creation request.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        sizes: impl IntoIterator<Item = impl Into<String>>,
        available_quantity: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let length = name.chars().count();
        if length > MAX_NAME_LENGTH {
            return Err(ValidationError::NameTooLong {
                max: MAX_NAME_LENGTH,
                actual: length,
            });
        }

        if price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }

        let mut normalized = BTreeSet::new();
        for size in sizes {
            let size = size.into().trim().to_lowercase();
            if size.is_empty() {
                return Err(ValidationError::EmptySize);
            }
            normalized.insert(size);
        }
        if normalized.is_empty() {
            return Err(ValidationError::NoSizes);
        }

        if available_quantity < 0 {
            return Err(ValidationError::NegativeQuantity);
        }

        Ok(Self {
            name,
            price,
            sizes: normalized,
            available_quantity,
        })
    }

    /// Returns the normalized product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the normalized size set.
    pub fn sizes(&self) -> &BTreeSet<String> {
        &self.sizes
    }

    /// Returns the initial stock level.
    pub fn available_quantity(&self) -> i64 {
        self.available_quantity
    }
}
