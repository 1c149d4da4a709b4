use crate::Result;
use async_trait::async_trait;
use lil_core::{LinkRecord, INTERSTITIAL_SEGMENT};

/// How a resolved link is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Redirect immediately.
    Direct,
    /// Show a confirmation page before leaving.
    Interstitial,
}

impl ResolveMode {
    /// Splits a request path into the response mode and the short code.
    ///
    /// `/p/{code}` selects [`ResolveMode::Interstitial`]; any other path is
    /// treated as `/{code}`.
    pub fn split_path(path: &str) -> (Self, &str) {
        let path = path.trim_start_matches('/');
        match path
            .strip_prefix(INTERSTITIAL_SEGMENT)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(code) => (Self::Interstitial, code),
            None => (Self::Direct, path),
        }
    }
}

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Hit { record: LinkRecord, mode: ResolveMode },
    Miss,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code for the given response mode.
    ///
    /// Unknown, malformed and expired codes all resolve to [`Resolution::Miss`].
    async fn resolve(&self, code: &str, mode: ResolveMode) -> Result<Resolution>;

    /// Resolves a request path such as `/abc12345` or `/p/abc12345`.
    async fn lookup(&self, path: &str) -> Result<Resolution> {
        let (mode, code) = ResolveMode::split_path(path);
        self.resolve(code, mode).await
    }
}
