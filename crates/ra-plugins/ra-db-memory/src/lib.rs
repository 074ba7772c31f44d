//! # ra-db-memory
//!
//! Reference implementation of `AdRepo` kept entirely in process memory.
//! Every `list` call is a full scan followed by a sort, so it is meant for
//! tests and small deployments, not for production-sized data.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use ra_core::clock::CreationClock;
use ra_core::models::{Ad, AdDraft};
use ra_core::query::ListQuery;
use ra_core::traits::AdRepo;
use tracing::debug;
use uuid::Uuid;

/// Ads are held as encoded JSON records keyed by id. The lock only guards
/// access to the map itself; decoding and sorting happen outside it.
#[derive(Debug, Default)]
pub struct MemoryAdRepo {
    records: Mutex<HashMap<Uuid, Vec<u8>>>,
    clock: CreationClock,
}

impl MemoryAdRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> anyhow::Result<MutexGuard<'_, HashMap<Uuid, Vec<u8>>>> {
        self.records
            .lock()
            .map_err(|_| anyhow!("in-memory ad store lock poisoned"))
    }
}

fn decode(record: &[u8]) -> anyhow::Result<Ad> {
    serde_json::from_slice(record).context("corrupt in-memory ad record")
}

#[async_trait]
impl AdRepo for MemoryAdRepo {
    async fn create(&self, draft: AdDraft) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let ad = draft.into_ad(id, self.clock.now());
        let record = serde_json::to_vec(&ad)?;

        self.records()?.insert(id, record);
        debug!(ad_id = %id, "stored ad in memory");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Ad>> {
        let record = self.records()?.get(&id).cloned();
        record.as_deref().map(decode).transpose()
    }

    async fn list(&self, query: &ListQuery) -> anyhow::Result<Vec<Ad>> {
        // Snapshot under the lock, decode and sort without it
        let snapshot: Vec<Vec<u8>> = self.records()?.values().cloned().collect();

        let ads = snapshot
            .iter()
            .map(|record| decode(record))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(query.apply(ads))
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.records()?.clear();
        Ok(())
    }
}
