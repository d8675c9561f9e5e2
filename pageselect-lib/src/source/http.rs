//! HTTP page source for JSON paging providers.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

use super::PagedSource;
use super::RetryConfig;
use crate::error::ConfigError;
use crate::error::FetchError;
use crate::model::Page;
use crate::model::PageIndexing;
use crate::model::PageNumber;
use crate::model::Record;

/// A page source backed by a JSON HTTP API.
///
/// Requests `GET <url>?page=<n>&limit=<page_size>` and expects a body of the
/// form `{"data": [...], "pagination": {"total": N}}`.
///
/// This source is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use pageselect_lib::model::ARTWORK_FIELDS;
/// use pageselect_lib::source::HttpSource;
///
/// let source = HttpSource::builder()
///     .url("https://api.artic.edu/api/v1/artworks")
///     .fields(ARTWORK_FIELDS)
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let page = source.fetch_page(PageNumber::FIRST, page_size).await?;
/// ```
#[derive(Clone)]
pub struct HttpSource {
    inner: Arc<HttpSourceInner>,
}

struct HttpSourceInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
    indexing: PageIndexing,
    page_param: String,
    limit_param: String,
    fields: Vec<String>,
    retry: RetryConfig,
}

impl HttpSource {
    /// Creates a new builder for constructing a source.
    pub fn builder() -> HttpSourceBuilder<Missing> {
        HttpSourceBuilder::new()
    }

    /// Returns the provider URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns the provider's page indexing convention.
    pub fn indexing(&self) -> PageIndexing {
        self.inner.indexing
    }

    /// Builds the request URL for a page.
    pub fn page_url(&self, page: PageNumber, page_size: NonZeroUsize) -> Url {
        let inner = &self.inner;
        let mut url = inner.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(&inner.page_param, &inner.indexing.to_provider(page).to_string());
            query.append_pair(&inner.limit_param, &page_size.to_string());
            if !inner.fields.is_empty() {
                query.append_pair("fields", &inner.fields.join(","));
            }
        }
        url
    }

    async fn fetch_once(&self, page: PageNumber, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        let url = self.page_url(page, page_size);
        debug!("GET {}", url);

        let mut request = self
            .inner
            .http_client
            .get(url)
            .header(ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body
            };
            return Err(FetchError::server(status.as_u16(), message));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: ListResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::parse_with_body(e.to_string(), body))?;

        if let Some(current) = parsed.pagination.current_page {
            let reported = self.inner.indexing.from_provider(current);
            if reported != Some(page) {
                warn!(
                    "Requested page {} but provider reported page {:?} (native {})",
                    page, reported, current
                );
            }
        }

        Ok(Page::new(page, parsed.data).with_total_count(parsed.pagination.total))
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => FetchError::Timeout(timeout),
            _ => FetchError::Network(error),
        }
    }
}

#[async_trait]
impl PagedSource for HttpSource {
    async fn fetch_page(&self, page: PageNumber, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(page, page_size).await {
                Ok(page) => return Ok(page),
                Err(e) if self.inner.retry.should_retry(&e, attempt) => {
                    let delay = self.inner.retry.delay_for(attempt);
                    warn!("Fetching page {} failed ({}), retrying in {:?}", page, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Paging provider response body.
#[derive(Debug, Deserialize)]
struct ListResponse {
    /// The records in this page.
    data: Vec<Record>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    /// Total record count of the dataset.
    total: usize,
    /// The provider-native page number that was served.
    #[serde(default)]
    current_page: Option<usize>,
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpSource`].
///
/// Uses the typestate pattern to ensure the URL is set at compile time.
///
/// # Example
///
/// ```ignore
/// let source = HttpSource::builder()
///     .url("https://api.example.com/items")
///     .indexing(PageIndexing::ZeroBased)
///     .retry(RetryConfig::no_retry())
///     .build()?;
/// ```
pub struct HttpSourceBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    indexing: PageIndexing,
    page_param: String,
    limit_param: String,
    fields: Vec<String>,
    retry: RetryConfig,
}

impl HttpSourceBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            indexing: PageIndexing::default(),
            page_param: "page".to_string(),
            limit_param: "limit".to_string(),
            fields: Vec::new(),
            retry: RetryConfig::default(),
        }
    }

    /// Sets the provider URL.
    pub fn url(self, url: impl Into<String>) -> HttpSourceBuilder<Set<String>> {
        HttpSourceBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            indexing: self.indexing,
            page_param: self.page_param,
            limit_param: self.limit_param,
            fields: self.fields,
            retry: self.retry,
        }
    }
}

impl Default for HttpSourceBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpSourceBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the provider's page indexing convention.
    ///
    /// Defaults to [`PageIndexing::OneBased`].
    pub fn indexing(mut self, indexing: PageIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// Sets the name of the page query parameter. Defaults to `page`.
    pub fn page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    /// Sets the name of the page size query parameter. Defaults to `limit`.
    pub fn limit_param(mut self, name: impl Into<String>) -> Self {
        self.limit_param = name.into();
        self
    }

    /// Restricts the fields the provider returns.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl HttpSourceBuilder<Set<String>> {
    /// Builds the [`HttpSource`].
    pub fn build(self) -> Result<HttpSource, ConfigError> {
        let base_url = Url::parse(&self.url.0)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(|e| ConfigError::HttpClient(e.to_string()))?
            }
        };

        Ok(HttpSource {
            inner: Arc::new(HttpSourceInner {
                base_url,
                http_client,
                timeout: self.timeout,
                indexing: self.indexing,
                page_param: self.page_param,
                limit_param: self.limit_param,
                fields: self.fields,
                retry: self.retry,
            }),
        })
    }
}
