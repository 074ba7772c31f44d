//! # Query Engine
//!
//! Sort, pagination and field-selection rules shared by every backend.
//! Raw request values are resolved here once; backends only ever see the
//! normalized [`ListQuery`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Ad;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Price,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortField {
    /// Unknown or absent values fall back to `CreatedAt`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("price") => SortField::Price,
            _ => SortField::CreatedAt,
        }
    }

    /// Column name in the relational schema. This is the only way a sort
    /// field reaches a SQL string.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl SortDirection {
    /// Unknown or absent values fall back to `Desc`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// 1-based page window. `per_page` is always within `1..=MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: i64,
    per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, per_page: DEFAULT_PER_PAGE }
    }
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page: per_page.clamp(1, MAX_PER_PAGE) }
    }

    /// Absent or unparsable values take the defaults before clamping.
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = page.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PAGE);
        let per_page = per_page.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PER_PAGE);
        Self::new(page, per_page)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Index of the first record in the window. `None` means the window is
    /// empty regardless of the data: a page below 1, or an offset that does
    /// not fit in an `i64`.
    pub fn offset(&self) -> Option<i64> {
        if self.page < 1 {
            return None;
        }
        (self.page - 1).checked_mul(self.per_page)
    }

    /// Cuts the window out of an already sorted sequence. The end of the
    /// window is clamped to the data length.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let Some(offset) = self.offset().and_then(|o| usize::try_from(o).ok()) else {
            return Vec::new();
        };
        if offset >= items.len() {
            return Vec::new();
        }
        // per_page is clamped to 1..=100, the cast is lossless
        let limit = self.per_page as usize;
        items.into_iter().skip(offset).take(limit).collect()
    }
}

/// A fully resolved list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub pagination: Pagination,
}

impl ListQuery {
    pub fn new(sort_field: SortField, sort_direction: SortDirection, pagination: Pagination) -> Self {
        Self { sort_field, sort_direction, pagination }
    }

    /// Resolves raw request parameters, substituting defaults for anything
    /// absent or unrecognized.
    pub fn from_params(
        sort_by: Option<&str>,
        sort_direction: Option<&str>,
        page: Option<&str>,
        per_page: Option<&str>,
    ) -> Self {
        Self {
            sort_field: SortField::parse(sort_by),
            sort_direction: SortDirection::parse(sort_direction),
            pagination: Pagination::parse(page, per_page),
        }
    }

    /// Total order used by every backend: the sort key in the requested
    /// direction, then ascending id.
    pub fn compare(&self, a: &Ad, b: &Ad) -> Ordering {
        let by_key = match self.sort_field {
            SortField::Price => a.price.cmp(&b.price),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let by_key = match self.sort_direction {
            SortDirection::Asc => by_key,
            SortDirection::Desc => by_key.reverse(),
        };
        by_key.then_with(|| a.id.cmp(&b.id))
    }

    /// Sorts the full result set and returns the requested window.
    pub fn apply(&self, mut ads: Vec<Ad>) -> Vec<Ad> {
        ads.sort_by(|a, b| self.compare(a, b));
        self.pagination.apply(ads)
    }
}

/// Optional detail-view fields requested through `fields=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSelection {
    pub description: bool,
    pub photo_links: bool,
}

impl FieldSelection {
    /// Parses a comma-separated token list. Empty and unknown tokens are
    /// ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut fields = Self::default();
        for token in raw.unwrap_or_default().split(',') {
            if token.eq_ignore_ascii_case("description") {
                fields.description = true;
            } else if token.eq_ignore_ascii_case("photolinks") {
                fields.photo_links = true;
            }
        }
        fields
    }
}
