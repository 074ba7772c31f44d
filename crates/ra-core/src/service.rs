//! # AdService
//!
//! Caller-facing layer between transports and the storage port. Validates
//! drafts, resolves list parameters and projects stored ads into views.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AdDetail, AdDraft, AdSummary};
use crate::query::{FieldSelection, ListQuery};
use crate::traits::AdRepo;

#[derive(Clone)]
pub struct AdService {
    repo: Arc<dyn AdRepo>,
}

impl AdService {
    pub fn new(repo: Arc<dyn AdRepo>) -> Self {
        Self { repo }
    }

    pub async fn create_ad(&self, draft: AdDraft) -> Result<Uuid> {
        draft.validate()?;
        let id = self.repo.create(draft).await?;
        info!(ad_id = %id, "ad created");
        Ok(id)
    }

    /// `Ok(None)` when no ad has this id.
    pub async fn get_ad(&self, id: Uuid, fields: FieldSelection) -> Result<Option<AdDetail>> {
        let ad = self.repo.get(id).await?;
        Ok(ad.map(|ad| ad.detail(fields)))
    }

    pub async fn list_ads(&self, query: &ListQuery) -> Result<Vec<AdSummary>> {
        let ads = self.repo.list(query).await?;
        debug!(?query, count = ads.len(), "listed ads");
        Ok(ads.iter().map(|ad| ad.summary()).collect())
    }

    pub async fn close(&self) -> Result<()> {
        self.repo.close().await?;
        Ok(())
    }
}
