use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;

use crate::{
    db::ReviewStore,
    error::{AppError, AppResult},
    models::{
        Book, BookId, CategoryCount, CategoryKind, Review, TopCategories, HIGH_RATING_THRESHOLD,
    },
    services::catalog::CatalogProvider,
};

/// Entries kept per dimension in [`top_categories`]
pub const TOP_CATEGORY_LIMIT: usize = 3;

/// Books from the catalog sharing `kind = category`, excluding ones the user reviewed
///
/// The reviewed set and the catalog listing are fetched concurrently. A failed
/// fetch of either degrades to an empty list, as does a failed rating lookup
/// for a single candidate (which is then returned without a rating).
/// Catalog order is preserved.
pub async fn similar_books(
    catalog: Arc<dyn CatalogProvider>,
    reviews: Arc<dyn ReviewStore>,
    user_id: &str,
    kind: CategoryKind,
    category: &str,
) -> AppResult<Vec<Book>> {
    let user_id = require_non_empty("userId", user_id)?;
    let category = require_non_empty("category", category)?;

    let (reviewed, candidates) = tokio::join!(
        reviewed_book_ids(reviews.as_ref(), user_id),
        catalog_books_by(catalog.as_ref(), kind, category),
    );

    let unseen: Vec<Book> = candidates
        .into_iter()
        .filter(|book| !reviewed.contains(&book.id))
        .collect();

    let summaries = join_all(unseen.iter().map(|book| {
        let reviews = reviews.clone();
        async move {
            match reviews.rating_summary(&book.id).await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!(book_id = %book.id, error = %e, "Rating lookup failed");
                    None
                }
            }
        }
    }))
    .await;

    let books: Vec<Book> = unseen
        .into_iter()
        .zip(summaries)
        .map(|(book, summary)| book.with_rating(summary))
        .collect();

    tracing::info!(
        user_id = %user_id,
        kind = %kind,
        category = %category,
        excluded = reviewed.len(),
        results = books.len(),
        "Similar books resolved"
    );

    Ok(books)
}

/// Most frequent genres, authors and languages among the user's highly rated books
///
/// Each high-rated review is resolved through the catalog concurrently; lookups
/// that fail or find nothing are dropped. At most [`TOP_CATEGORY_LIMIT`] values
/// are kept per dimension, by descending count, ties in first-seen order.
pub async fn top_categories(
    catalog: Arc<dyn CatalogProvider>,
    reviews: Arc<dyn ReviewStore>,
    user_id: &str,
) -> AppResult<TopCategories> {
    let user_id = require_non_empty("userId", user_id)?;

    let liked: Vec<Review> = match reviews
        .reviews_by_user_min_rating(user_id, HIGH_RATING_THRESHOLD)
        .await
    {
        Ok(liked) => liked.into_iter().filter(Review::is_high_rating).collect(),
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Review fetch failed");
            Vec::new()
        }
    };

    let lookups = liked.iter().map(|review| {
        let catalog = catalog.clone();
        async move {
            match catalog.get_book(&review.book_id).await {
                Ok(book) => book,
                Err(e) => {
                    tracing::warn!(book_id = %review.book_id, error = %e, "Book lookup failed");
                    None
                }
            }
        }
    });

    let books: Vec<Book> = join_all(lookups).await.into_iter().flatten().collect();

    tracing::info!(
        user_id = %user_id,
        liked = liked.len(),
        resolved = books.len(),
        "Top categories resolved"
    );

    Ok(tally_categories(&books, TOP_CATEGORY_LIMIT))
}

/// Counts category values across books, keeping the `limit` most frequent per dimension
pub fn tally_categories(books: &[Book], limit: usize) -> TopCategories {
    let mut top = TopCategories::default();

    for kind in CategoryKind::ALL {
        let mut counts: Vec<CategoryCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for value in books.iter().filter_map(|book| kind.value_of(book)) {
            match positions.get(value) {
                Some(&index) => counts[index].count += 1,
                None => {
                    positions.insert(value, counts.len());
                    counts.push(CategoryCount {
                        value: value.to_string(),
                        count: 1,
                    });
                }
            }
        }

        // stable: equal counts keep first-seen order
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(limit);
        *top.get_mut(kind) = counts;
    }

    top
}

fn require_non_empty<'a>(name: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Missing required parameter: {}",
            name
        )));
    }
    Ok(trimmed)
}

async fn reviewed_book_ids(reviews: &dyn ReviewStore, user_id: &str) -> HashSet<BookId> {
    match reviews.reviews_by_user(user_id).await {
        Ok(list) => list.into_iter().map(|r| r.book_id).collect(),
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Reviewed books fetch failed");
            HashSet::new()
        }
    }
}

async fn catalog_books_by(
    catalog: &dyn CatalogProvider,
    kind: CategoryKind,
    category: &str,
) -> Vec<Book> {
    match catalog.books_by(kind, category).await {
        Ok(books) => books,
        Err(e) => {
            tracing::warn!(kind = %kind, category = %category, error = %e, "Catalog lookup failed");
            Vec::new()
        }
    }
}
