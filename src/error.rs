//! Error types for the vending machine.
//!
//! These are input and validation faults. Expected purchase outcomes such as
//! "out of stock" or "insufficient funds" are not errors; see
//! [`Purchase`](crate::machine::Purchase).

use crate::money::Money;
use thiserror::Error;

/// Result type alias for vending machine operations
pub type Result<T> = std::result::Result<T, VendingError>;

/// Errors that can occur while operating the machine.
#[derive(Error, Debug)]
pub enum VendingError {
    /// Inserted amount was zero or negative
    #[error("Invalid amount: ${0}. Amount must be positive.")]
    InvalidAmount(Money),

    /// Inserted amount would push the balance out of range
    #[error("Cannot accept ${0}: balance limit reached.")]
    BalanceOverflow(Money),

    /// Restock quantity was zero or would overflow the stock counter
    #[error("Invalid quantity {quantity} for {code}. Quantity must be positive and within capacity.")]
    InvalidQuantity { code: String, quantity: u32 },

    /// Product code is not stocked by the machine
    #[error("Invalid product code: {0}")]
    InvalidProduct(String),

    /// No units left for the product
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// A product with this code is already stocked
    #[error("Product code {0} already exists")]
    DuplicateProduct(String),

    /// Catalog price was zero or negative
    #[error("Invalid price: ${0}. Price must be positive.")]
    InvalidPrice(Money),

    /// Bad command-line configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read input or write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
