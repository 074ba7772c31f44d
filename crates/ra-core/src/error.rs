//! # AppError
//!
//! Centralized error handling for Rusty-Ads.
//! Absence of an ad is not an error at the storage level; backends return
//! `Option` and only the outer layers turn it into `NotFound`.

use thiserror::Error;

/// The primary error type for all ra-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Ad)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., title too long, no photo links)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Backend failure (e.g., DB down, corrupt record)
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// A specialized Result type for Rusty-Ads logic.
pub type Result<T> = std::result::Result<T, AppError>;
