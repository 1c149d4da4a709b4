use crate::DEFAULT_MAX_SEARCH_LIMIT;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;
use lil_core::store::Result;
use lil_core::{
    LinkRecord, LinkStore, NewLink, ReadLinkStore, SearchPage, SearchQuery, ShortCode, StoreError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// In-memory storage entry for a link.
#[derive(Debug, Clone)]
struct Entry {
    record: LinkRecord,
    /// Insertion order, used as the search cursor.
    seq: u64,
}

/// In-memory implementation of [`LinkStore`] using DashMap.
///
/// DashMap shards its locks, so reads and writes to different codes do not
/// block each other. Creation goes through the entry API, which holds the
/// shard lock across the existence check and the insert.
#[derive(Debug)]
pub struct InMemoryLinkStore {
    links: DashMap<String, Entry>,
    next_seq: AtomicU64,
    max_search_limit: usize,
}

impl InMemoryLinkStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::with_max_search_limit(DEFAULT_MAX_SEARCH_LIMIT)
    }

    /// Creates a new in-memory store whose search pages hold at most `max` links.
    pub fn with_max_search_limit(max: usize) -> Self {
        Self {
            links: DashMap::new(),
            next_seq: AtomicU64::new(1),
            max_search_limit: max,
        }
    }

    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for InMemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_cursor(cursor: Option<&str>) -> Result<u64> {
    match cursor {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| StoreError::InvalidCursor(raw.to_string())),
    }
}

#[async_trait]
impl ReadLinkStore for InMemoryLinkStore {
    async fn get(&self, code: &ShortCode) -> Result<LinkRecord> {
        let key = code.as_str();
        let now = Timestamp::now();

        if let Some(entry) = self.links.get(key) {
            if entry.record.is_live_at(now) {
                trace!(code = %code, "Found link in memory");
                return Ok(entry.record.clone());
            }
        }

        // Lazily evict, but only if nobody replaced it in the meantime.
        if self
            .links
            .remove_if(key, |_, entry| !entry.record.is_live_at(now))
            .is_some()
        {
            debug!(code = %code, "Evicted expired link");
        }

        Err(StoreError::NotFound(code.to_string()))
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let limit = query.effective_limit(self.max_search_limit)?;
        let after = parse_cursor(query.cursor.as_deref())?;
        let now = Timestamp::now();

        let mut matches: Vec<(u64, LinkRecord)> = self
            .links
            .iter()
            .filter(|entry| {
                entry.seq > after
                    && entry.record.is_live_at(now)
                    && entry.record.code.as_str().contains(query.pattern.as_str())
            })
            .map(|entry| (entry.seq, entry.record.clone()))
            .collect();
        matches.sort_unstable_by_key(|(seq, _)| *seq);

        let has_more = matches.len() > limit;
        matches.truncate(limit);
        let next_cursor = has_more
            .then(|| matches.last().map(|(seq, _)| seq.to_string()))
            .flatten();

        Ok(SearchPage {
            links: matches.into_iter().map(|(_, record)| record).collect(),
            next_cursor,
        })
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn create(&self, link: NewLink) -> Result<LinkRecord> {
        let now = Timestamp::now();
        let record = link
            .into_record(now)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        let entry = Entry {
            record: record.clone(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        match self.links.entry(record.code.as_str().to_owned()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().record.is_live_at(now) {
                    return Err(StoreError::Collision(record.code.to_string()));
                }
                // Expired but not yet evicted: the code is free again.
                occupied.insert(entry);
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }

        trace!(code = %record.code, "Stored link in memory");
        Ok(record)
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        match self.links.remove(code.as_str()) {
            Some((_, entry)) if entry.record.is_live() => Ok(()),
            _ => Err(StoreError::NotFound(code.to_string())),
        }
    }
}
