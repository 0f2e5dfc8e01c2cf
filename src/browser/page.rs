// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page implementation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::location::Location;
use crate::config::PageConfig;
use crate::error::Result;
use crate::http::{FetchInput, HttpClient, Request, Response};
use crate::network::Fetch;

static PAGE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A page: owner of the fetch entry point and the navigation context
pub struct Page {
    /// Page ID
    id: String,
    /// Page configuration
    config: PageConfig,
    /// Current top-level address
    location: Location,
    /// Whatever currently answers this page's fetch calls
    entry_point: RwLock<Arc<dyn Fetch>>,
    /// Navigation history
    history: RwLock<Vec<String>>,
}

impl Page {
    /// Create a page backed by a fresh HTTP client
    pub fn new(config: PageConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_config()?)?;
        Ok(Self::with_entry_point(config, Arc::new(client)))
    }

    /// Create a page backed by any entry point
    pub fn with_entry_point(config: PageConfig, entry_point: Arc<dyn Fetch>) -> Self {
        let id = PAGE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("page_{}", id),
            config,
            location: Location::new(),
            entry_point: RwLock::new(entry_point),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Get page ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Navigation context
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Get current URL
    pub fn url(&self) -> Option<String> {
        self.location.href().map(|u| u.to_string())
    }

    /// Point the page at `url` without loading it
    pub fn set_url(&self, url: &str) -> Result<()> {
        let url = Url::parse(url)?;
        self.history.write().push(url.to_string());
        self.location.set(url);
        Ok(())
    }

    /// Navigate to a URL through the page's entry point
    pub async fn navigate(&self, url: &str) -> Result<Response> {
        let request = Request::get(url)?.timeout(self.config.timeout);
        let response = self.fetch(request).await?;

        self.location.set(response.url().clone());
        self.history.write().push(response.url().to_string());

        tracing::debug!(page = %self.id, url = %response.url(), "Navigated");

        Ok(response)
    }

    /// Issue a fetch through whatever entry point is installed
    pub async fn fetch(&self, input: impl Into<FetchInput>) -> Result<Response> {
        let entry_point = self.entry_point();
        entry_point.fetch(input.into()).await
    }

    /// Currently installed entry point
    pub fn entry_point(&self) -> Arc<dyn Fetch> {
        self.entry_point.read().clone()
    }

    /// Install a new entry point, returning the one it replaces
    pub fn replace_entry_point(&self, entry_point: Arc<dyn Fetch>) -> Arc<dyn Fetch> {
        std::mem::replace(&mut *self.entry_point.write(), entry_point)
    }

    /// Navigation history
    pub fn history(&self) -> Vec<String> {
        self.history.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Body, ResponseHead};
    use crate::network::testing::StubFetch;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;

    fn echo_page() -> (Page, Arc<StubFetch>) {
        let stub = StubFetch::new(|input| {
            let url = Url::parse(input.url())?;
            Ok(Response::new(
                ResponseHead::new(StatusCode::OK, HeaderMap::new(), url),
                Body::from("<html></html>"),
            ))
        });
        (Page::with_entry_point(PageConfig::default(), stub.clone()), stub)
    }

    #[tokio::test]
    async fn test_navigate_sets_location() {
        let (page, stub) = echo_page();
        let response = page
            .navigate("https://www.youtube.com/watch?v=abc123")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(page.location().query_param("v").as_deref(), Some("abc123"));
        assert_eq!(page.history(), vec!["https://www.youtube.com/watch?v=abc123"]);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_set_url_does_not_fetch() {
        let (page, stub) = echo_page();
        page.set_url("https://www.youtube.com/watch?v=xyz").unwrap();

        assert_eq!(page.url().as_deref(), Some("https://www.youtube.com/watch?v=xyz"));
        assert_eq!(stub.call_count(), 0);
        assert!(page.set_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_replace_entry_point() {
        let (page, first) = echo_page();
        let second = StubFetch::new(|_| Err(crate::error::Error::other("offline")));

        let previous = page.replace_entry_point(second.clone());
        assert!(page.fetch("https://example.com/").await.is_err());
        assert_eq!(second.call_count(), 1);

        previous.fetch("https://example.com/".into()).await.unwrap();
        assert_eq!(first.call_count(), 1);
    }

    #[test]
    fn test_page_ids_are_unique() {
        let (a, _) = echo_page();
        let (b, _) = echo_page();
        assert_ne!(a.id(), b.id());
    }
}
