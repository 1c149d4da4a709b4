use crate::error::CoreError;
use crate::shortcode::ShortCode;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Longest accepted time-to-live: one hundred years.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The short code, unique across the store.
    pub code: ShortCode,
    /// The destination URL.
    pub target_url: String,
    /// When the record was created. Never changes.
    pub created_at: Timestamp,
    /// When the record stops resolving, if ever.
    pub expires_at: Option<Timestamp>,
}

impl LinkRecord {
    /// Returns `true` if the record is still readable at `now`.
    ///
    /// A record whose expiry equals `now` is already dead, so a zero TTL
    /// never produces a readable record.
    pub fn is_live_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }

    /// Returns `true` if the record is readable right now.
    pub fn is_live(&self) -> bool {
        self.is_live_at(Timestamp::now())
    }
}

/// A link waiting to be written by [`LinkStore::create`](crate::LinkStore::create).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    code: ShortCode,
    target_url: String,
    ttl: Option<Duration>,
}

impl NewLink {
    /// Builds a new link after checking the target URL.
    ///
    /// The target must be an absolute `http` or `https` URL with a host and
    /// the TTL, if any, must not exceed [`MAX_TTL`].
    pub fn new(
        code: ShortCode,
        target_url: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Result<Self, CoreError> {
        let target_url = target_url.into();
        validate_target_url(&target_url)?;
        if let Some(ttl) = ttl.filter(|ttl| *ttl > MAX_TTL) {
            return Err(CoreError::InvalidTtl(format!(
                "{}s exceeds the maximum of {}s",
                ttl.as_secs(),
                MAX_TTL.as_secs()
            )));
        }
        Ok(Self {
            code,
            target_url,
            ttl,
        })
    }

    pub fn code(&self) -> &ShortCode {
        &self.code
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Turns the pending link into a record created at `created_at`.
    pub fn into_record(self, created_at: Timestamp) -> Result<LinkRecord, CoreError> {
        let expires_at = self
            .ttl
            .map(|ttl| {
                let ttl = SignedDuration::try_from(ttl)
                    .map_err(|e| CoreError::InvalidTtl(format!("{ttl:?}: {e}")))?;
                created_at
                    .checked_add(ttl)
                    .map_err(|e| CoreError::InvalidTtl(format!("{ttl}: {e}")))
            })
            .transpose()?;

        Ok(LinkRecord {
            code: self.code,
            target_url: self.target_url,
            created_at,
            expires_at,
        })
    }
}

fn validate_target_url(target_url: &str) -> Result<(), CoreError> {
    if target_url.is_empty() {
        return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
    }

    // The parser silently drops these, but the stored string must be usable
    // verbatim as a Location header.
    if target_url.trim() != target_url || target_url.chars().any(char::is_control) {
        return Err(CoreError::InvalidUrl(format!(
            "URL must not contain control characters or surrounding whitespace: {target_url:?}"
        )));
    }

    let parsed = Url::parse(target_url)
        .map_err(|e| CoreError::InvalidUrl(format!("{target_url}: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CoreError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::InvalidUrl(format!(
            "URL must have a host: {target_url}"
        )));
    }

    Ok(())
}
