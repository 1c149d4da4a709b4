use crate::error::Result;
use async_trait::async_trait;
use lil_core::{LinkRecord, SearchPage, SearchQuery};
use std::time::Duration;

/// A request to create a short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLink {
    /// Caller-chosen code. When `None` a code is generated.
    pub code: Option<String>,
    /// The URL the link redirects to.
    pub target_url: String,
    /// How long the link stays readable. `None` keeps it forever.
    pub ttl: Option<Duration>,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a link and returns the stored record.
    async fn create_link(&self, request: CreateLink) -> Result<LinkRecord>;

    /// Retrieves the live record for `code`.
    async fn get_link(&self, code: &str) -> Result<LinkRecord>;

    /// Returns one page of live links whose code contains the query pattern.
    async fn search_links(&self, query: SearchQuery) -> Result<SearchPage>;

    /// Deletes the link for `code`.
    async fn delete_link(&self, code: &str) -> Result<()>;
}
