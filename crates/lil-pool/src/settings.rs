use std::time::Duration;
use typed_builder::TypedBuilder;

/// Sizing and timeout settings for a [`StorePool`](crate::StorePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct StorePoolSettings {
    /// Hard cap on simultaneously open connections.
    #[builder(default = 10)]
    pub max_active: usize,

    /// Connections kept open once released. Extra ones are closed on release.
    #[builder(default = 5)]
    pub max_idle: usize,

    /// Applied to connecting and to every operation, in both directions.
    #[builder(default = Duration::from_secs(1))]
    pub timeout: Duration,

    /// How long a caller may queue for a free slot. `None` waits forever.
    #[builder(default)]
    pub wait_timeout: Option<Duration>,

    /// Idle connections older than this are dropped by the reaper.
    #[builder(default = Duration::from_secs(300))]
    pub idle_timeout: Duration,
}

impl Default for StorePoolSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
