use crate::error::StoreError;
use crate::link::{LinkRecord, NewLink};
use crate::search::{SearchPage, SearchQuery};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A read-only view of a link store.
///
/// The redirector only needs this half, so it can run against a read replica
/// or any backend that cannot write.
#[async_trait]
pub trait ReadLinkStore: Send + Sync + 'static {
    /// Retrieves the live record for a code.
    ///
    /// A missing code and an expired record are indistinguishable: both
    /// return [`StoreError::NotFound`].
    async fn get(&self, code: &ShortCode) -> Result<LinkRecord>;

    /// Returns one page of live records whose code contains the query pattern,
    /// in the backend's native iteration order.
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage>;
}

#[async_trait]
pub trait LinkStore: ReadLinkStore {
    /// Writes a record only if its code is not already taken.
    ///
    /// The existence check and the write are a single atomic step. A taken
    /// code returns [`StoreError::Collision`] and leaves the store unchanged.
    async fn create(&self, link: NewLink) -> Result<LinkRecord>;

    /// Removes the record for a code.
    ///
    /// Returns [`StoreError::NotFound`] if there was no live record, so
    /// repeated deletes are harmless.
    async fn delete(&self, code: &ShortCode) -> Result<()>;
}

#[async_trait]
impl<S: ReadLinkStore + ?Sized> ReadLinkStore for Arc<S> {
    async fn get(&self, code: &ShortCode) -> Result<LinkRecord> {
        (**self).get(code).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<S: LinkStore + ?Sized> LinkStore for Arc<S> {
    async fn create(&self, link: NewLink) -> Result<LinkRecord> {
        (**self).create(link).await
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        (**self).delete(code).await
    }
}
