//! Errors.

use thiserror::Error;

/// Something went wrong while opening or running the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// A cashier tried to check out a customer from an empty line.
    ///
    /// Callers must check the line length first, so this is a bug in the caller.
    #[error("Tried to check out a customer from empty line {line}")]
    EmptyQueue {
        /// Index of the line.
        line: usize,
    },

    /// No open line accepts a customer with this many items.
    ///
    /// Surfaced at start-up when the configured lines can't serve the largest possible basket.
    #[error("No open line accepts a customer with {items} items")]
    NoEligibleLine {
        /// Number of items the customer was carrying.
        items: u32,
    },

    /// The store configuration is invalid.
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    /// A cashier stopped serving its line before the store closed.
    #[error("Cashier for line {line} failed: {reason}")]
    CashierFailed {
        /// Index of the line the cashier was serving.
        line: usize,
        /// What happened to the cashier.
        reason: String,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
