//! Unified error type for the store-backed operations.
//!
//! The pure engine (macro calculator, generator, forecast, speech parser) never
//! returns these; only operations that touch the database or configuration do.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed, or was rejected
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying `SeaORM` / `SQLite` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Referenced product does not exist in the catalog
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Product id that failed to resolve
        id: i64,
    },

    /// Referenced inventory lot does not exist
    #[error("Inventory lot not found: {id}")]
    LotNotFound {
        /// Lot id that failed to resolve
        id: i64,
    },

    /// Referenced meal does not exist
    #[error("Meal not found: {id}")]
    MealNotFound {
        /// Meal id that failed to resolve
        id: i64,
    },

    /// Quantity is negative, NaN or infinite
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Rejected value
        quantity: f64,
    },

    /// Settings update rejected by validation
    #[error("Invalid setting: {message}")]
    InvalidSetting {
        /// Which setting and why
        message: String,
    },

    /// Speech language tag is not supported
    #[error("Unsupported language: {tag}")]
    UnknownLanguage {
        /// Tag as given by the caller
        tag: String,
    },

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
