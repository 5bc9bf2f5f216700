use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

use super::Book;

/// Book attribute that recommendations can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Genre,
    Author,
    Language,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 3] = [
        CategoryKind::Genre,
        CategoryKind::Author,
        CategoryKind::Language,
    ];

    /// Name of the catalog query parameter for this attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Genre => "genre",
            CategoryKind::Author => "author",
            CategoryKind::Language => "language",
        }
    }

    /// Value of this attribute on a book, if present
    pub fn value_of<'a>(&self, book: &'a Book) -> Option<&'a str> {
        let value = match self {
            CategoryKind::Genre => book.genre.as_deref(),
            CategoryKind::Author => book.author.as_deref(),
            CategoryKind::Language => book.language.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "genre" => Ok(CategoryKind::Genre),
            "author" => Ok(CategoryKind::Author),
            "language" => Ok(CategoryKind::Language),
            other => Err(AppError::InvalidInput(format!(
                "Invalid type: {:?}, expected one of genre, author, language",
                other
            ))),
        }
    }
}

/// Number of times a category value occurs among a user's liked books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent category values per dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCategories {
    pub genre: Vec<CategoryCount>,
    pub author: Vec<CategoryCount>,
    pub language: Vec<CategoryCount>,
}

impl TopCategories {
    pub fn get_mut(&mut self, kind: CategoryKind) -> &mut Vec<CategoryCount> {
        match kind {
            CategoryKind::Genre => &mut self.genre,
            CategoryKind::Author => &mut self.author,
            CategoryKind::Language => &mut self.language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;

    #[test]
    fn test_parse_category_kind() {
        assert_eq!("genre".parse::<CategoryKind>().unwrap(), CategoryKind::Genre);
        assert_eq!("Author".parse::<CategoryKind>().unwrap(), CategoryKind::Author);
        assert_eq!(
            " language ".parse::<CategoryKind>().unwrap(),
            CategoryKind::Language
        );
        assert!("publisher".parse::<CategoryKind>().is_err());
        assert!("".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_value_of_skips_blank_values() {
        let book = Book {
            id: BookId::parse("1").unwrap(),
            title: "Ferdydurke".to_string(),
            author: Some("Gombrowicz, Witold".to_string()),
            genre: Some("   ".to_string()),
            language: None,
            publication_year: None,
            rating: None,
            review_count: None,
        };

        assert_eq!(
            CategoryKind::Author.value_of(&book),
            Some("Gombrowicz, Witold")
        );
        assert_eq!(CategoryKind::Genre.value_of(&book), None);
        assert_eq!(CategoryKind::Language.value_of(&book), None);
    }
}
