use crate::error::StoreError;
use crate::link::LinkRecord;
use serde::{Deserialize, Serialize};

/// One page request for [`ReadLinkStore::search`](crate::ReadLinkStore::search).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// Substring the short code must contain. Empty matches every code.
    pub pattern: String,
    /// Opaque cursor returned by a previous page, or `None` to start over.
    pub cursor: Option<String>,
    /// Requested page size; clamped by the store to its configured maximum.
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>, cursor: Option<String>, limit: usize) -> Self {
        Self {
            pattern: pattern.into(),
            cursor,
            limit,
        }
    }

    /// Returns the page size to use given the store's maximum.
    ///
    /// Oversized limits are clamped; a zero limit is rejected.
    pub fn effective_limit(&self, max_limit: usize) -> Result<usize, StoreError> {
        if self.limit == 0 {
            return Err(StoreError::InvalidLimit(self.limit));
        }
        Ok(self.limit.min(max_limit.max(1)))
    }
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub links: Vec<LinkRecord>,
    /// Cursor for the next page; `None` once the scan is exhausted.
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        let query = SearchQuery::new("", None, 1_000);
        assert_eq!(query.effective_limit(100).unwrap(), 100);
    }

    #[test]
    fn limit_below_max_is_kept() {
        let query = SearchQuery::new("", None, 7);
        assert_eq!(query.effective_limit(100).unwrap(), 7);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let query = SearchQuery::new("", None, 0);
        assert_eq!(
            query.effective_limit(100).unwrap_err(),
            StoreError::InvalidLimit(0)
        );
    }
}
