//! JSON-over-HTTP fetch collaborator.
//!
//! Expects a source exposing:
//! - `GET {base}/sources/{source_id}/bibles` → `[{"id", "name", "language"}]`
//! - `GET {base}/bibles/{bible_id}/books` → `[{"id", "name", "abbreviation", ...}]`
//!
//! Network errors, non-2xx statuses and undecodable bodies all map to
//! [`DomainError::FetchFailed`]. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Bible, Book};
use crate::domain::ports::BibleFetcher;

#[derive(Debug, Clone)]
pub struct HttpBibleFetcher {
    http: Client,
    base_url: String,
}

impl HttpBibleFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bible2ppt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DomainResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::FetchFailed(format!("GET {url} failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::FetchFailed(format!("GET {url} returned {status}: {body}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| DomainError::FetchFailed(format!("GET {url} parse failed: {e}")))
    }
}

#[async_trait]
impl BibleFetcher for HttpBibleFetcher {
    async fn fetch_bibles(&self, source_id: i64) -> DomainResult<Vec<Bible>> {
        self.get_json(&format!("/sources/{source_id}/bibles")).await
    }

    async fn fetch_books(&self, bible_id: i64) -> DomainResult<Vec<Book>> {
        let mut books: Vec<Book> = self.get_json(&format!("/bibles/{bible_id}/books")).await?;
        // Sources that omit positions get them from response order.
        for (book, position) in books.iter_mut().zip(1_i64..) {
            if book.position == 0 {
                book.position = position;
            }
        }
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher(server: &Server) -> HttpBibleFetcher {
        HttpBibleFetcher::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_bibles_decodes_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/sources/7/bibles")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "KJV", "language": "en"}, {"id": 2, "name": "RVSN"}]"#)
            .create_async()
            .await;

        let bibles = fetcher(&server).fetch_bibles(7).await.unwrap();

        mock.assert_async().await;
        assert_eq!(bibles.len(), 2);
        assert_eq!(bibles[0].name, "KJV");
        assert_eq!(bibles[1].language, "");
    }

    #[tokio::test]
    async fn test_fetch_books_fills_missing_positions() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/bibles/3/books")
            .with_status(200)
            .with_body(r#"[{"id": 10, "name": "Genesis", "abbreviation": "Gen"}, {"id": 11, "name": "Exodus", "abbreviation": "Ex"}]"#)
            .create_async()
            .await;

        let books = fetcher(&server).fetch_books(3).await.unwrap();
        let positions: Vec<_> = books.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/sources/1/bibles")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = fetcher(&server).fetch_bibles(1).await.unwrap_err();
        match err {
            DomainError::FetchFailed(msg) => assert!(msg.contains("503")),
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_fetch_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/sources/1/bibles")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = fetcher(&server).fetch_bibles(1).await.unwrap_err();
        assert!(matches!(err, DomainError::FetchFailed(_)));
    }
}
