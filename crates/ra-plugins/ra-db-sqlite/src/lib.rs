//! # ra-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `ra-core` domain models. Ordering and pagination are delegated to
//! the engine; the sort column and direction can only come from the
//! `SortField`/`SortDirection` enums, so no caller text is ever spliced into
//! SQL.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use ra_core::clock::CreationClock;
use ra_core::models::{Ad, AdDraft};
use ra_core::query::ListQuery;
use ra_core::traits::AdRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS ads (
    ad_id       TEXT PRIMARY KEY NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    price       INTEGER NOT NULL,
    photo_links TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ads_price ON ads(price);
CREATE INDEX IF NOT EXISTS idx_ads_created_at ON ads(created_at);
"#;

const AD_COLUMNS: &str = "ad_id, title, description, price, photo_links, created_at";

pub struct SqliteAdRepo {
    pool: SqlitePool,
    clock: CreationClock,
}

impl SqliteAdRepo {
    /// Opens (or creates) the database at `url` and ensures the `ads` table
    /// exists.
    ///
    /// # Developer Note
    /// An in-memory database lives and dies with its connection, so memory
    /// URLs are pinned to a single connection that is never recycled.
    pub async fn new(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url {url}"))?
            .create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("failed to open sqlite database")?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .context("failed to initialize ads schema")?;

        info!(max_connections, "sqlite ad store ready");
        Ok(Self { pool, clock: CreationClock::new() })
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn row_to_ad(row: &SqliteRow) -> anyhow::Result<Ad> {
    let id: String = row.try_get("ad_id")?;
    let photo_links: String = row.try_get("photo_links")?;
    let created_at: i64 = row.try_get("created_at")?;

    Ok(Ad {
        id: Uuid::parse_str(&id).with_context(|| format!("malformed ad_id {id}"))?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        photo_links: serde_json::from_str(&photo_links)
            .with_context(|| format!("malformed photo_links for ad {id}"))?,
        price: row.try_get("price")?,
        created_at: DateTime::from_timestamp_nanos(created_at),
    })
}

#[async_trait]
impl AdRepo for SqliteAdRepo {
    /// Single-statement insert, so a failed write leaves no partial row.
    async fn create(&self, draft: AdDraft) -> anyhow::Result<Uuid> {
        let ad = draft.into_ad(Uuid::new_v4(), self.clock.now());
        let created_at = ad
            .created_at
            .timestamp_nanos_opt()
            .context("creation timestamp out of range")?;

        sqlx::query(&format!(
            "INSERT INTO ads ({AD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(ad.id.to_string())
        .bind(&ad.title)
        .bind(&ad.description)
        .bind(ad.price)
        .bind(serde_json::to_string(&ad.photo_links)?)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        debug!(ad_id = %ad.id, "stored ad in sqlite");
        Ok(ad.id)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Ad>> {
        let row = sqlx::query(&format!("SELECT {AD_COLUMNS} FROM ads WHERE ad_id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_ad).transpose()
    }

    async fn list(&self, query: &ListQuery) -> anyhow::Result<Vec<Ad>> {
        let Some(offset) = query.pagination.offset() else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {AD_COLUMNS} FROM ads ORDER BY {} {}, ad_id ASC LIMIT ? OFFSET ?",
            query.sort_field.column(),
            query.sort_direction.keyword(),
        );

        let rows = sqlx::query(&sql)
            .bind(query.pagination.per_page())
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_ad).collect()
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_core::query::{Pagination, SortDirection, SortField};
    use std::sync::Arc;

    async fn repo() -> SqliteAdRepo {
        SqliteAdRepo::new("sqlite::memory:", 5).await.unwrap()
    }

    fn draft(title: &str, price: i64) -> AdDraft {
        AdDraft {
            title: title.into(),
            description: format!("{title} description"),
            photo_links: vec!["https://ya.ru".into(), "http://google.com".into()],
            price,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_ad() {
        let repo = repo().await;
        let id = repo.create(draft("Bike", 150)).await.expect("Failed to create ad");

        let ad = repo.get(id).await.unwrap().expect("ad should exist");
        assert_eq!(ad.id, id);
        assert_eq!(ad.title, "Bike");
        assert_eq!(ad.description, "Bike description");
        assert_eq!(ad.photo_links, vec!["https://ya.ru", "http://google.com"]);
        assert_eq!(ad.price, 150);

        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_created_at_keeps_nanosecond_order() {
        let repo = repo().await;
        let first = repo.create(draft("first", 1)).await.unwrap();
        let second = repo.create(draft("second", 1)).await.unwrap();

        let a = repo.get(first).await.unwrap().unwrap();
        let b = repo.get(second).await.unwrap().unwrap();
        assert!(a.created_at < b.created_at);

        let newest_first = repo.list(&ListQuery::default()).await.unwrap();
        assert_eq!(newest_first[0].id, second);
    }

    #[tokio::test]
    async fn test_list_orders_and_pages_in_sql() {
        let repo = repo().await;
        for (title, price) in [("a", 100), ("b", 123), ("c", 15)] {
            repo.create(draft(title, price)).await.unwrap();
        }

        let q = ListQuery::new(SortField::Price, SortDirection::Asc, Pagination::new(1, 10));
        let prices: Vec<i64> = repo.list(&q).await.unwrap().iter().map(|a| a.price).collect();
        assert_eq!(prices, vec![15, 100, 123]);

        let q = ListQuery::new(SortField::Price, SortDirection::Desc, Pagination::new(2, 2));
        let prices: Vec<i64> = repo.list(&q).await.unwrap().iter().map(|a| a.price).collect();
        assert_eq!(prices, vec![15]);

        let q = ListQuery::new(SortField::Price, SortDirection::Desc, Pagination::new(0, 2));
        assert!(repo.list(&q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_row_is_an_error() {
        let repo = repo().await;
        sqlx::query(&format!("INSERT INTO ads ({AD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"))
            .bind("not-a-uuid")
            .bind("t")
            .bind("d")
            .bind(1_i64)
            .bind("[]")
            .bind(0_i64)
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(repo.list(&ListQuery::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_close_twice_then_operations_fail() {
        let repo = repo().await;
        repo.close().await.unwrap();
        repo.close().await.unwrap();

        assert!(repo.create(draft("late", 1)).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_are_not_lost() {
        let repo = Arc::new(repo().await);
        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(draft("ad", i + 1)).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let q = ListQuery::new(SortField::CreatedAt, SortDirection::Asc, Pagination::new(1, 100));
        assert_eq!(repo.list(&q).await.unwrap().len(), 32);
    }
}
