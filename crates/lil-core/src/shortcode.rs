use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use typed_builder::TypedBuilder;

/// Characters a short code may contain.
///
/// This is the base58 alphabet: URL-safe and free of the look-alike
/// characters `0`, `O`, `I` and `l`.
pub const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Path segment that selects the interstitial page instead of a redirect.
pub const INTERSTITIAL_SEGMENT: &str = "p";

/// Path segments that can never be used as a short code.
pub const RESERVED_SEGMENTS: &[&str] = &[INTERSTITIAL_SEGMENT, "api"];

const DEFAULT_LENGTH: usize = 8;

/// A short code identifying a link.
///
/// Values are produced either by [`CodeFormat::validate`] or by a generator
/// that draws from [`ALPHABET`], so a `ShortCode` in hand is always safe to
/// use as a path segment and as a storage key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators, or keys read back from a store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The shape every short code in a deployment must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct CodeFormat {
    /// Exact number of characters in a code.
    #[builder(default = DEFAULT_LENGTH)]
    pub length: usize,
}

impl Default for CodeFormat {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CodeFormat {
    /// Validates a caller-supplied code.
    ///
    /// The candidate must have exactly [`CodeFormat::length`] characters, all
    /// drawn from [`ALPHABET`], and must not collide with a reserved path
    /// segment. Nothing is trimmed or case-folded.
    pub fn validate(&self, candidate: &str) -> Result<ShortCode, CoreError> {
        if candidate.is_empty() {
            return Err(CoreError::InvalidShortCode(
                "short code cannot be empty".to_string(),
            ));
        }

        let length = candidate.chars().count();
        if length != self.length {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be {}, got {}",
                self.length, length
            )));
        }

        if let Some(bad) = candidate.chars().find(|c| !ALPHABET.contains(*c)) {
            return Err(CoreError::InvalidShortCode(format!(
                "character '{}' is not allowed in '{}'",
                bad, candidate
            )));
        }

        if RESERVED_SEGMENTS.contains(&candidate) {
            return Err(CoreError::InvalidShortCode(format!(
                "'{}' is a reserved path segment",
                candidate
            )));
        }

        Ok(ShortCode(candidate.to_string()))
    }

    /// Returns `true` if `candidate` would pass [`CodeFormat::validate`].
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.validate(candidate).is_ok()
    }
}
