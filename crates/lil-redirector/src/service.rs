use std::sync::Arc;

use crate::redirector::{Redirector, Resolution, ResolveMode};
use async_trait::async_trait;
use lil_core::{CodeFormat, ReadLinkStore, StoreError};
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Uses a read-only store to fetch link records. The store already hides
/// expired records, so the service only decides between hit and miss and
/// carries the requested response mode along.
#[derive(Debug)]
pub struct RedirectorService<S> {
    store: Arc<S>,
    format: CodeFormat,
}

impl<S> Clone for RedirectorService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            format: self.format,
        }
    }
}

impl<S: ReadLinkStore> RedirectorService<S> {
    /// Creates a new RedirectorService with the given store.
    pub fn new(store: S, format: CodeFormat) -> Self {
        Self {
            store: Arc::new(store),
            format,
        }
    }
}

#[async_trait]
impl<S: ReadLinkStore> Redirector for RedirectorService<S> {
    async fn resolve(&self, code: &str, mode: ResolveMode) -> crate::Result<Resolution> {
        trace!(code, ?mode, "resolving short code");

        let Ok(code) = self.format.validate(code) else {
            trace!(code, "Malformed short code");
            return Ok(Resolution::Miss);
        };

        match self.store.get(&code).await {
            Ok(record) => {
                debug!(code = %code, url = %record.target_url, ?mode, "Resolved short code");
                Ok(Resolution::Hit { record, mode })
            }
            Err(StoreError::NotFound(_)) => {
                trace!(code = %code, "Short code not found");
                Ok(Resolution::Miss)
            }
            Err(e) => Err(e.into()),
        }
    }
}
