use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

mod book;
mod category;
mod review;

pub use book::{Book, BookId, RatingSummary, BOOK_ID_WIDTH};
pub use category::{CategoryCount, CategoryKind, TopCategories};
pub use review::{Review, HIGH_RATING_THRESHOLD};

// ============================================================================
// Catalog search parameters
// ============================================================================

/// Catalog attribute a free-text search is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Genre,
    Language,
    Subject,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Genre => "genre",
            SearchField::Language => "language",
            SearchField::Subject => "subject",
        }
    }
}

impl Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "genre" => Ok(SearchField::Genre),
            "language" => Ok(SearchField::Language),
            "subject" => Ok(SearchField::Subject),
            other => Err(AppError::InvalidInput(format!(
                "Invalid search field: {:?}",
                other
            ))),
        }
    }
}

impl From<CategoryKind> for SearchField {
    fn from(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Genre => SearchField::Genre,
            CategoryKind::Author => SearchField::Author,
            CategoryKind::Language => SearchField::Language,
        }
    }
}

/// Filters forwarded to the catalog search endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub limit: Option<u32>,
    pub search: Option<(SearchField, String)>,
    pub since_id: Option<String>,
}

impl CatalogQuery {
    /// Query-string pairs in the catalog's parameter names
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some((field, text)) = &self.search {
            pairs.push((field.as_str(), text.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(since_id) = &self.since_id {
            pairs.push(("sinceId", since_id.clone()));
        }

        pairs
    }
}

// ============================================================================
// National Library Catalog API Types
// ============================================================================

/// Catalog identifiers come back either as JSON numbers or strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiBibId {
    Number(u64),
    Text(String),
}

impl Display for ApiBibId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiBibId::Number(id) => write!(f, "{}", id),
            ApiBibId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Raw bibliographic record from the catalog
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBib {
    pub id: ApiBibId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub publication_year: Option<ApiBibYear>,
}

/// Publication year, sent as a number or free text ("ca 1890")
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiBibYear {
    Number(i64),
    Text(String),
}

impl ApiBibYear {
    fn into_text(self) -> Option<String> {
        match self {
            ApiBibYear::Number(year) => Some(year.to_string()),
            ApiBibYear::Text(text) => non_blank(Some(text)),
        }
    }
}

/// Response from GET /bibs.json
///
/// Records are kept as raw JSON so one malformed record does not sink the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBibsResponse {
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub bibs: Vec<serde_json::Value>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<ApiBib> for Book {
    type Error = AppError;

    fn try_from(bib: ApiBib) -> Result<Self, Self::Error> {
        let id = BookId::parse(&bib.id.to_string())?;

        Ok(Book {
            id,
            title: non_blank(bib.title).unwrap_or_default(),
            author: non_blank(bib.author),
            genre: non_blank(bib.genre),
            language: non_blank(bib.language),
            publication_year: bib.publication_year.and_then(ApiBibYear::into_text),
            rating: None,
            review_count: None,
        })
    }
}

impl ApiBibsResponse {
    /// Whether the catalog advertised another page
    pub fn has_next_page(&self) -> bool {
        self.next_page.as_deref().is_some_and(|page| !page.is_empty())
    }

    /// Converts records into books, dropping malformed records and unusable ids
    pub fn into_books(self) -> Vec<Book> {
        self.bibs
            .into_iter()
            .filter_map(|record| {
                let bib: ApiBib = match serde_json::from_value(record) {
                    Ok(bib) => bib,
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping malformed catalog record");
                        return None;
                    }
                };
                let raw_id = bib.id.to_string();
                match Book::try_from(bib) {
                    Ok(book) => Some(book),
                    Err(e) => {
                        tracing::debug!(id = %raw_id, error = %e, "Skipping catalog record");
                        None
                    }
                }
            })
            .collect()
    }
}
