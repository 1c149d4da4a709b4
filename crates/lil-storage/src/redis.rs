use crate::error::map_pool_error;
use crate::DEFAULT_MAX_SEARCH_LIMIT;
use async_trait::async_trait;
use jiff::Timestamp;
use lil_core::store::Result;
use lil_core::{
    LinkRecord, LinkStore, NewLink, ReadLinkStore, SearchPage, SearchQuery, ShortCode, StoreError,
};
use lil_pool::redis::redis;
use lil_pool::RedisPool;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Settings for a [`RedisLinkStore`].
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RedisStoreSettings {
    /// Prepended to every code to form its key. Empty stores records under
    /// the bare code.
    #[builder(default, setter(into))]
    pub key_prefix: String,

    /// Cap on the page size of a search.
    #[builder(default = DEFAULT_MAX_SEARCH_LIMIT)]
    pub max_search_limit: usize,

    /// `COUNT` hint passed to each `SCAN` round trip.
    #[builder(default = 100)]
    pub scan_count: usize,
}

impl Default for RedisStoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Value stored under each key. The code itself is the key.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLink {
    url: String,
    created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<Timestamp>,
}

/// A [`LinkStore`] backed by Redis through a bounded connection pool.
///
/// Creation is a single `SET key value NX [PX ttl]`, so the uniqueness check
/// and the write cannot be split and expiry is enforced by Redis itself.
/// Reads additionally check `expires_at`, hiding records Redis has not
/// evicted yet.
#[derive(Debug, Clone)]
pub struct RedisLinkStore {
    pool: RedisPool,
    settings: RedisStoreSettings,
}

impl RedisLinkStore {
    pub fn new(pool: RedisPool, settings: RedisStoreSettings) -> Self {
        Self { pool, settings }
    }

    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }

    fn key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.settings.key_prefix, code.as_str())
    }

    fn match_pattern(&self, pattern: &str) -> String {
        let prefix = escape_glob(&self.settings.key_prefix);
        if pattern.is_empty() {
            format!("{prefix}*")
        } else {
            format!("{prefix}*{}*", escape_glob(pattern))
        }
    }

    /// Decodes a scanned value, skipping anything unreadable or expired.
    fn decode_live(&self, key: &str, raw: &str, now: Timestamp) -> Option<LinkRecord> {
        let code = key.strip_prefix(self.settings.key_prefix.as_str())?;
        match decode(ShortCode::new_unchecked(code), raw) {
            Ok(record) if record.is_live_at(now) => Some(record),
            Ok(_) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping undecodable value during search");
                None
            }
        }
    }
}

fn encode(record: &LinkRecord) -> Result<String> {
    let stored = StoredLink {
        url: record.target_url.clone(),
        created_at: record.created_at,
        expires_at: record.expires_at,
    };
    serde_json::to_string(&stored)
        .map_err(|e| StoreError::InvalidData(format!("failed to encode link: {e}")))
}

fn decode(code: ShortCode, raw: &str) -> Result<LinkRecord> {
    let stored: StoredLink = serde_json::from_str(raw)
        .map_err(|e| StoreError::InvalidData(format!("invalid value for '{code}': {e}")))?;
    Ok(LinkRecord {
        code,
        target_url: stored.url,
        created_at: stored.created_at,
        expires_at: stored.expires_at,
    })
}

/// Redis rejects `PX 0`; a zero TTL is stored for one millisecond and is
/// already hidden by the `expires_at` check.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Position of one `SCAN` reply within a search.
#[derive(Debug, Clone, Copy)]
struct ScanReply {
    /// Cursor the reply was requested with.
    cursor: u64,
    /// Cursor returned by Redis; zero once the keyspace is exhausted.
    next: u64,
    /// Keys of this reply already returned by an earlier page.
    skip: usize,
    /// Number of keys in the reply.
    len: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum ScanStep {
    /// The page is full. Carries the cursor of the following page, if any.
    Full(Option<String>),
    /// The keyspace ran out before the page filled.
    Exhausted,
    /// Issue another `SCAN` from this cursor.
    Continue(u64),
}

/// Appends the live records among `candidates` (the reply's keys after
/// `skip`, in order) to `links` until `limit` is reached.
fn fill_page<T>(
    links: &mut Vec<T>,
    limit: usize,
    reply: ScanReply,
    candidates: impl IntoIterator<Item = Option<T>>,
) -> ScanStep {
    for (index, candidate) in candidates.into_iter().enumerate() {
        if let Some(link) = candidate {
            links.push(link);
        }

        if links.len() >= limit {
            let consumed = reply.skip + index + 1;
            let next_cursor = if consumed < reply.len {
                Some(format_cursor(reply.cursor, consumed))
            } else if reply.next == 0 {
                None
            } else {
                Some(format_cursor(reply.next, 0))
            };
            return ScanStep::Full(next_cursor);
        }
    }

    if reply.next == 0 {
        ScanStep::Exhausted
    } else {
        ScanStep::Continue(reply.next)
    }
}

/// Search cursors are `<scan cursor>:<keys already consumed from that batch>`.
fn parse_cursor(cursor: Option<&str>) -> Result<(u64, usize)> {
    let Some(raw) = cursor.filter(|c| !c.is_empty()) else {
        return Ok((0, 0));
    };

    raw.split_once(':')
        .and_then(|(scan, skip)| Some((scan.parse().ok()?, skip.parse().ok()?)))
        .ok_or_else(|| StoreError::InvalidCursor(raw.to_string()))
}

fn format_cursor(scan: u64, skip: usize) -> String {
    format!("{scan}:{skip}")
}

#[async_trait]
impl ReadLinkStore for RedisLinkStore {
    async fn get(&self, code: &ShortCode) -> Result<LinkRecord> {
        let key = self.key(code);
        let mut cmd = redis::cmd("GET");
        cmd.arg(&key);
        trace!(code = %code, "Fetching link from Redis");

        let mut conn = self.pool.acquire().await.map_err(map_pool_error)?;
        let reply: Option<String> = conn
            .bounded(|c| cmd.query_async(c))
            .await
            .map_err(map_pool_error)?;

        let Some(raw) = reply else {
            debug!(code = %code, "Link not found in Redis");
            return Err(StoreError::NotFound(code.to_string()));
        };

        let record = decode(code.clone(), &raw)?;
        if !record.is_live() {
            debug!(code = %code, "Link has expired");
            return Err(StoreError::NotFound(code.to_string()));
        }

        Ok(record)
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let limit = query.effective_limit(self.settings.max_search_limit)?;
        let (mut scan, mut skip) = parse_cursor(query.cursor.as_deref())?;
        let pattern = self.match_pattern(&query.pattern);
        let now = Timestamp::now();
        trace!(pattern = %pattern, scan, skip, limit, "Searching links in Redis");

        let mut conn = self.pool.acquire().await.map_err(map_pool_error)?;
        let mut links = Vec::with_capacity(limit);

        loop {
            let mut scan_cmd = redis::cmd("SCAN");
            scan_cmd
                .arg(scan)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.settings.scan_count);
            let (next, keys): (u64, Vec<String>) = conn
                .bounded(|c| scan_cmd.query_async(c))
                .await
                .map_err(map_pool_error)?;

            let pending = keys.get(skip..).unwrap_or_default();
            let values: Vec<Option<String>> = if pending.is_empty() {
                Vec::new()
            } else {
                let mut mget = redis::cmd("MGET");
                mget.arg(pending);
                conn.bounded(|c| mget.query_async(c))
                    .await
                    .map_err(map_pool_error)?
            };

            let reply = ScanReply {
                cursor: scan,
                next,
                skip,
                len: keys.len(),
            };
            let candidates = pending
                .iter()
                .zip(values)
                .map(|(key, value)| value.and_then(|raw| self.decode_live(key, &raw, now)));

            match fill_page(&mut links, limit, reply, candidates) {
                ScanStep::Full(next_cursor) => return Ok(SearchPage { links, next_cursor }),
                ScanStep::Exhausted => {
                    return Ok(SearchPage {
                        links,
                        next_cursor: None,
                    })
                }
                ScanStep::Continue(cursor) => {
                    scan = cursor;
                    skip = 0;
                }
            }
        }
    }
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn create(&self, link: NewLink) -> Result<LinkRecord> {
        let ttl = link.ttl();
        let record = link
            .into_record(Timestamp::now())
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        let key = self.key(&record.code);
        let payload = encode(&record)?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(&payload).arg("NX");
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(ttl_millis(ttl));
        }
        trace!(code = %record.code, ttl = ?ttl, "Storing link in Redis");

        let mut conn = self.pool.acquire().await.map_err(map_pool_error)?;
        let reply: Option<String> = conn
            .bounded(|c| cmd.query_async(c))
            .await
            .map_err(map_pool_error)?;

        match reply {
            Some(_) => {
                debug!(code = %record.code, "Stored link in Redis");
                Ok(record)
            }
            None => {
                warn!(code = %record.code, "Short code already taken");
                Err(StoreError::Collision(record.code.to_string()))
            }
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        let key = self.key(code);
        let mut cmd = redis::cmd("GETDEL");
        cmd.arg(&key);
        trace!(code = %code, "Deleting link from Redis");

        let mut conn = self.pool.acquire().await.map_err(map_pool_error)?;
        let reply: Option<String> = conn
            .bounded(|c| cmd.query_async(c))
            .await
            .map_err(map_pool_error)?;

        let Some(raw) = reply else {
            return Err(StoreError::NotFound(code.to_string()));
        };

        match decode(code.clone(), &raw) {
            Ok(record) if !record.is_live() => Err(StoreError::NotFound(code.to_string())),
            Ok(_) => {
                debug!(code = %code, "Deleted link from Redis");
                Ok(())
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Deleted undecodable value");
                Ok(())
            }
        }
    }
}
