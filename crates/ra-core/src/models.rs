//! # Domain Models
//!
//! `Ad` is the only stored entity. `AdSummary` and `AdDetail` are read-only
//! projections computed on read and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::query::FieldSelection;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const PHOTO_LINKS_MAX: usize = 3;

/// A classified ad as stored by a backend. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Element 0 is the main photo.
    pub photo_links: Vec<String>,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

/// Creation payload. The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDraft {
    pub title: String,
    pub description: String,
    pub photo_links: Vec<String>,
    pub price: i64,
}

/// Projection used by list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdSummary {
    #[serde(rename = "adID")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "mainPhotoLink")]
    pub main_photo_link: String,
    pub price: i64,
}

/// Projection used by single-ad fetches. Optional fields are only
/// populated when selected and are omitted from JSON otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDetail {
    pub title: String,
    pub price: i64,
    pub main_photo_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_links: Option<Vec<String>>,
}

impl AdDraft {
    /// Checks the draft against the creation bounds. Lengths are counted in
    /// characters, not bytes.
    pub fn validate(&self) -> Result<()> {
        let title_len = self.title.chars().count();
        if title_len == 0 || title_len > TITLE_MAX_CHARS {
            return Err(AppError::ValidationError(format!(
                "title must be 1-{TITLE_MAX_CHARS} characters, got {title_len}"
            )));
        }

        let description_len = self.description.chars().count();
        if description_len == 0 || description_len > DESCRIPTION_MAX_CHARS {
            return Err(AppError::ValidationError(format!(
                "description must be 1-{DESCRIPTION_MAX_CHARS} characters, got {description_len}"
            )));
        }

        if self.photo_links.is_empty() || self.photo_links.len() > PHOTO_LINKS_MAX {
            return Err(AppError::ValidationError(format!(
                "photoLinks must hold 1-{PHOTO_LINKS_MAX} links, got {}",
                self.photo_links.len()
            )));
        }

        if self.price < 1 {
            return Err(AppError::ValidationError(format!(
                "price must be positive, got {}",
                self.price
            )));
        }

        Ok(())
    }

    /// Turns the draft into a stored ad with backend-assigned identity.
    pub fn into_ad(self, id: Uuid, created_at: DateTime<Utc>) -> Ad {
        Ad {
            id,
            title: self.title,
            description: self.description,
            photo_links: self.photo_links,
            price: self.price,
            created_at,
        }
    }
}

impl Ad {
    pub fn main_photo_link(&self) -> &str {
        self.photo_links.first().map(String::as_str).unwrap_or_default()
    }

    pub fn summary(&self) -> AdSummary {
        AdSummary {
            id: self.id,
            title: self.title.clone(),
            main_photo_link: self.main_photo_link().to_owned(),
            price: self.price,
        }
    }

    pub fn detail(&self, fields: FieldSelection) -> AdDetail {
        AdDetail {
            title: self.title.clone(),
            price: self.price,
            main_photo_link: self.main_photo_link().to_owned(),
            description: fields.description.then(|| self.description.clone()),
            photo_links: fields.photo_links.then(|| self.photo_links.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> AdDraft {
        AdDraft {
            title: "Bike".into(),
            description: "Barely used".into(),
            photo_links: vec!["https://img/1".into(), "https://img/2".into()],
            price: 150,
        }
    }

    fn assert_invalid(draft: AdDraft) {
        assert!(
            matches!(draft.validate(), Err(AppError::ValidationError(_))),
            "expected validation error for {draft:?}"
        );
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut d = draft();
        d.title = "t".repeat(TITLE_MAX_CHARS);
        d.description = "d".repeat(DESCRIPTION_MAX_CHARS);
        d.photo_links = vec!["a".into(), "b".into(), "c".into()];
        d.price = i64::MAX;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_bounds_fields() {
        assert_invalid(AdDraft { title: String::new(), ..draft() });
        assert_invalid(AdDraft { title: "t".repeat(201), ..draft() });
        assert_invalid(AdDraft { description: String::new(), ..draft() });
        assert_invalid(AdDraft { description: "d".repeat(1001), ..draft() });
        assert_invalid(AdDraft { price: 0, ..draft() });
        assert_invalid(AdDraft { price: -5, ..draft() });
        assert_invalid(AdDraft { photo_links: vec![], ..draft() });
        assert_invalid(AdDraft {
            photo_links: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..draft()
        });
    }

    #[test]
    fn title_length_counts_characters() {
        // 200 two-byte characters is still a valid title
        let d = AdDraft { title: "é".repeat(200), ..draft() };
        assert!(d.validate().is_ok());
    }

    #[test]
    fn draft_rejects_price_beyond_i64() {
        let body = r#"{"title":"t","description":"d","photoLinks":["u"],"price":9223372036854775808}"#;
        assert!(serde_json::from_str::<AdDraft>(body).is_err());
    }

    #[test]
    fn detail_includes_only_selected_fields() {
        let ad = draft().into_ad(Uuid::new_v4(), Utc::now());

        let base = ad.detail(FieldSelection::default());
        assert_eq!(base.main_photo_link, "https://img/1");
        assert!(base.description.is_none());
        assert!(base.photo_links.is_none());

        let json = serde_json::to_value(&base).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);

        let full = ad.detail(FieldSelection::parse(Some("description,photolinks")));
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["description"], "Barely used");
        assert_eq!(json["photoLinks"].as_array().unwrap().len(), 2);
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn summary_uses_main_photo() {
        let ad = draft().into_ad(Uuid::new_v4(), Utc::now());
        let summary = ad.summary();
        assert_eq!(summary.id, ad.id);
        assert_eq!(summary.main_photo_link, "https://img/1");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["adID"], ad.id.to_string());
        assert_eq!(json["mainPhotoLink"], "https://img/1");
    }
}
