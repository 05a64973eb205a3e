//! Validation errors for record construction.

use thiserror::Error;

/// Errors raised when client-supplied values fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Product name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// Product name exceeds the maximum length.
    #[error("name must be at most {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },

    /// Price is zero or negative.
    #[error("price must be positive")]
    NonPositivePrice,

    /// No sizes were supplied.
    #[error("at least one size is required")]
    NoSizes,

    /// A size entry is empty after trimming.
    #[error("sizes must not be empty")]
    EmptySize,

    /// Initial stock level is negative.
    #[error("available quantity must not be negative")]
    NegativeQuantity,

    /// Order quantity is zero or negative.
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    /// User identifier is empty after trimming.
    #[error("user_id must not be empty")]
    EmptyUserId,

    /// Requested page size is outside the allowed range.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange { max: i64 },

    /// Requested page offset is negative.
    #[error("offset must not be negative")]
    NegativeOffset,
}
