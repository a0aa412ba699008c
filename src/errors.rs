//! Unified error types for the point-of-sale backend.
//!
//! Every failure a caller can see is a variant of [`Error`]. Validation failures are
//! raised before anything is written; storage failures wrap the underlying [`DbErr`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

/// All errors produced by the catalog, order, user and report operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input or configuration (empty names, unreadable config files, ...)
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A price or amount that is negative, too precise, too large or overflows
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// An order item quantity below one
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: String },

    #[error("Product not found: {id}")]
    ProductNotFound { id: String },

    #[error("Menu not found: {id}")]
    MenuNotFound { id: String },

    #[error("Menu variant not found: {id}")]
    MenuVariantNotFound { id: String },

    #[error("Order not found: {id}")]
    OrderNotFound { id: String },

    #[error("Order item not found: {id}")]
    OrderItemNotFound { id: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    /// Username already taken
    #[error("User already exists: {username}")]
    DuplicateUsername { username: String },

    /// Neither a product nor a menu variant was given for an order item
    #[error("Either a product or a menu variant must be specified.")]
    MissingLineItemReference,

    /// Both a product and a menu variant were given for an order item
    #[error("You can't set both a product and a menu variant.")]
    AmbiguousLineItemReference,

    /// The referenced catalog record is flagged unavailable
    #[error("{name} is not available")]
    ItemUnavailable {
        /// Display name of the unavailable product or variant
        name: String,
    },

    /// Cumulative payments would exceed the order total
    #[error("Total payment exceeds the order total by {excess:.2}.")]
    PaymentExceedsTotal {
        /// Amount by which the payments would overshoot the total
        excess: Decimal,
    },

    /// Status change to processing/completed on an order that is not fully paid
    #[error("Cannot mark order as processing or completed before full payment.")]
    NotFullyPaid,

    /// An item change would drop the order total below what was already paid
    #[error("Order total {total:.2} would fall below the {paid:.2} already paid")]
    TotalBelowPaid { total: Decimal, paid: Decimal },

    /// The daily order number was taken by a concurrent insert
    #[error("Order number {order_number} already exists for {order_date}")]
    DuplicateOrderNumber {
        order_number: i32,
        order_date: NaiveDate,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
