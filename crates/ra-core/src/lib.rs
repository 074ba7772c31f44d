//! rusty-ads/crates/ra-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Ads.

pub mod clock;
pub mod error;
pub mod models;
pub mod query;
pub mod service;
pub mod traits;

// Re-exporting for easier access in other crates
pub use clock::*;
pub use error::*;
pub use models::*;
pub use query::*;
pub use service::*;
pub use traits::*;
