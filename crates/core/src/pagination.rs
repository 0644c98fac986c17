//! Offset pagination and listing sort rules.
//!
//! Pages are 1-based. Page `n` skips `limit * (n - 1)` rows. Every sort is
//! composite (`field DESC, id ASC`) so independently fetched pages never
//! repeat or skip rows that tie on the sort field.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldError};

/// Page used when the request does not name one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the request does not name one.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    /// Validate `page >= 1` and `1 <= limit <= MAX_PAGE_LIMIT`.
    ///
    /// Both fields are checked so the caller gets every problem at once.
    pub fn new(page: i64, limit: i64) -> Result<Self, CoreError> {
        let mut errors = Vec::new();

        if page < 1 {
            errors.push(FieldError::new("page", "page must be at least 1"));
        }
        if limit < 1 {
            errors.push(FieldError::new("limit", "limit must be at least 1"));
        } else if limit > MAX_PAGE_LIMIT {
            errors.push(FieldError::new(
                "limit",
                format!("limit must be at most {MAX_PAGE_LIMIT}"),
            ));
        }
        if errors.is_empty() && limit.checked_mul(page - 1).is_none() {
            errors.push(FieldError::new("page", "page is out of range"));
        }

        if errors.is_empty() {
            Ok(Self { page, limit })
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Apply [`DEFAULT_PAGE`] / [`DEFAULT_PAGE_LIMIT`] to missing values, then validate.
    pub fn from_optional(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows to skip: `limit * (page - 1)`.
    pub fn offset(&self) -> i64 {
        self.limit * (self.page - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Sortable product fields.
///
/// A closed set so the column name can be spliced into SQL safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Sold,
    Price,
    Title,
}

impl ProductSort {
    /// Parse a sort name. Accepts snake_case and the camelCase names the
    /// storefront frontend sends (`createdAt`, `updatedAt`).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "" | "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "sold" => Ok(Self::Sold),
            "price" => Ok(Self::Price),
            "title" => Ok(Self::Title),
            other => Err(CoreError::invalid_field(
                "sort",
                format!(
                    "Unknown sort field '{other}'. Must be one of: created_at, updated_at, sold, price, title"
                ),
            )),
        }
    }

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Sold => "sold",
            Self::Price => "price",
            Self::Title => "title",
        }
    }

    /// Column name in the `products` table.
    pub fn column(self) -> &'static str {
        // Wire names match column names.
        self.as_str()
    }
}

/// The `{ data, total, page }` envelope returned by every listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    /// Count of all rows matching the filter, not just this page.
    pub total: i64,
    pub page: i64,
}
