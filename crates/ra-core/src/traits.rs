//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Ad, AdDraft};
use crate::query::ListQuery;

/// Data persistence contract for ads.
///
/// Errors are opaque storage failures. Absence of an ad is `Ok(None)`, and a
/// page past the end of the data is `Ok(vec![])`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdRepo: Send + Sync {
    /// Assigns an id and creation timestamp, then records the ad. On failure
    /// nothing becomes visible to later reads.
    async fn create(&self, draft: AdDraft) -> anyhow::Result<Uuid>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Ad>>;

    /// Returns one page of ads ordered by `ListQuery::compare`.
    async fn list(&self, query: &ListQuery) -> anyhow::Result<Vec<Ad>>;

    /// Releases backend resources. Safe to call more than once.
    async fn close(&self) -> anyhow::Result<()>;
}
