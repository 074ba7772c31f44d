//! Shared fixtures for the cross-backend test suites.

use std::sync::Arc;

use ra_core::models::AdDraft;
use ra_core::traits::AdRepo;
use ra_db_memory::MemoryAdRepo;
use ra_db_sqlite::SqliteAdRepo;
use uuid::Uuid;

pub async fn memory_repo() -> Arc<dyn AdRepo> {
    Arc::new(MemoryAdRepo::new())
}

pub async fn sqlite_repo() -> Arc<dyn AdRepo> {
    Arc::new(SqliteAdRepo::new("sqlite::memory:", 4).await.expect("sqlite repo"))
}

pub fn draft(title: &str, price: i64) -> AdDraft {
    AdDraft {
        title: title.into(),
        description: format!("description of {title}"),
        photo_links: vec!["https://ya.ru".into(), "http://google.com".into()],
        price,
    }
}

/// Creates one ad per price, in order, titled `title 1`, `title 2`, ...
pub async fn seed(repo: &dyn AdRepo, prices: &[i64]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(prices.len());
    for (i, price) in prices.iter().enumerate() {
        let id = repo
            .create(draft(&format!("title {}", i + 1), *price))
            .await
            .expect("seed ad");
        ids.push(id);
    }
    ids
}
