use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// Width of a catalog book identifier
pub const BOOK_ID_WIDTH: usize = 14;

/// Catalog book identifier, always stored left-padded with zeros to 14 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Parses a raw identifier, padding it to the catalog width
    ///
    /// Accepts 1 to 14 ASCII digits. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty()
            || trimmed.len() > BOOK_ID_WIDTH
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AppError::InvalidInput(format!(
                "Invalid book id: {:?}",
                raw
            )));
        }

        Ok(Self(format!("{:0>width$}", trimmed, width = BOOK_ID_WIDTH)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BookId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BookId::parse(&value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

/// Aggregate of all reviews for one book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}

/// A book as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

impl Book {
    /// Attaches a rating aggregate, if one exists
    pub fn with_rating(mut self, summary: Option<RatingSummary>) -> Self {
        if let Some(summary) = summary {
            self.rating = Some(summary.average);
            self.review_count = Some(summary.count);
        }
        self
    }
}
