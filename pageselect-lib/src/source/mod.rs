//! Page sources
//!
//! A [`PagedSource`] fetches one page of records plus the dataset's total
//! count. Sources hold no selection logic and no cache; every navigation
//! fetches again.

mod http;
mod memory;
mod retry;

pub use http::*;
pub use memory::*;
pub use retry::*;

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Page;
use crate::model::PageNumber;

/// A remote (or in-process) provider of fixed-size pages.
///
/// Implementations translate the 1-based [`PageNumber`] into their own page
/// parameter and back.
#[async_trait]
pub trait PagedSource: Send + Sync {
    /// Fetches one page.
    ///
    /// The returned page carries `page` as its number and, when the provider
    /// reports it, the dataset's total record count.
    async fn fetch_page(&self, page: PageNumber, page_size: NonZeroUsize) -> Result<Page, FetchError>;
}

#[async_trait]
impl<S: PagedSource + ?Sized> PagedSource for Arc<S> {
    async fn fetch_page(&self, page: PageNumber, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        (**self).fetch_page(page, page_size).await
    }
}
