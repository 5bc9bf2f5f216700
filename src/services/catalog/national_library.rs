//! National library bibliographic API provider
//!
//! API Flow:
//! 1. Search: /bibs.json?{field}={text}&limit=..&sinceId=.. → relayed unchanged
//! 2. Detail: /bibs.json?id={padded id}&limit=1 → first record, if any
//! 3. Category listing: /bibs.json?{genre|author|language}={value}

use reqwest::{Client as HttpClient, Response, StatusCode};

use crate::{
    error::{AppError, AppResult},
    models::{ApiBibsResponse, Book, BookId, CatalogQuery, CategoryKind},
    services::catalog::CatalogProvider,
};

const BIBS_PATH: &str = "bibs.json";

#[derive(Clone)]
pub struct NationalLibraryCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl NationalLibraryCatalog {
    pub fn new(api_url: String) -> Self {
        Self::with_client(HttpClient::new(), api_url)
    }

    pub fn with_client(http_client: HttpClient, api_url: String) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn bibs_url(&self) -> String {
        format!("{}/{}", self.api_url, BIBS_PATH)
    }

    async fn get_bibs(&self, pairs: &[(&str, String)]) -> AppResult<Response> {
        let response = self
            .http_client
            .get(self.bibs_url())
            .query(pairs)
            .send()
            .await?;

        tracing::debug!(
            status = %response.status(),
            url = %response.url(),
            "Catalog responded"
        );

        Ok(response)
    }

    /// Turns a non-2xx response into [`AppError::Upstream`], logging the body
    async fn ensure_success(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %body,
            "Catalog request failed"
        );

        Err(AppError::Upstream(status))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for NationalLibraryCatalog {
    async fn search(&self, query: &CatalogQuery) -> AppResult<serde_json::Value> {
        let response = self.get_bibs(&query.to_pairs()).await?;
        let response = Self::ensure_success(response).await?;
        let body: serde_json::Value = response.json().await?;

        tracing::info!(
            search = ?query.search,
            limit = ?query.limit,
            provider = self.name(),
            "Catalog search relayed"
        );

        Ok(body)
    }

    async fn get_book(&self, id: &BookId) -> AppResult<Option<Book>> {
        let pairs = [("id", id.to_string()), ("limit", "1".to_string())];
        let response = self.get_bibs(&pairs).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!(book_id = %id, "Book not in catalog");
            return Ok(None);
        }

        let response = Self::ensure_success(response).await?;
        let bibs: ApiBibsResponse = response.json().await?;
        let book = bibs.into_books().into_iter().next();

        tracing::info!(
            book_id = %id,
            found = book.is_some(),
            provider = self.name(),
            "Book lookup completed"
        );

        Ok(book)
    }

    async fn books_by(&self, kind: CategoryKind, value: &str) -> AppResult<Vec<Book>> {
        if value.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Empty {} value for catalog lookup",
                kind
            )));
        }

        let pairs = [(kind.as_str(), value.to_string())];
        let response = self.get_bibs(&pairs).await?;
        let response = Self::ensure_success(response).await?;
        let bibs: ApiBibsResponse = response.json().await?;
        let more_pages = bibs.has_next_page();
        let books = bibs.into_books();

        // only the first page is used
        tracing::info!(
            kind = %kind,
            value = %value,
            results = books.len(),
            more_pages,
            provider = self.name(),
            "Category lookup completed"
        );

        Ok(books)
    }

    fn name(&self) -> &'static str {
        "national_library"
    }
}
