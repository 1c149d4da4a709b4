use clap::ValueEnum;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use lil_core::CodeFormat;
use lil_pool::StorePoolSettings;
use lil_shortener::ShortenerSettings;
use lil_storage::RedisStoreSettings;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Read when no `--config` file is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variables `LIL__SECTION__KEY` override file values.
pub const ENV_PREFIX: &str = "LIL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    #[default]
    #[value(name = "redis")]
    Redis,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Redis => write!(f, "redis"),
            StorageBackend::InMemory => write!(f, "in-memory"),
        }
    }
}

/// Process configuration, merged from TOML files, the environment and
/// command line overrides, in that order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Public origin used to build `short_url` values.
    pub base_url: String,
    /// Length of generated and custom short codes.
    pub url_length: usize,
    /// HTML template for the interstitial page, with a `{{url}}` placeholder.
    pub redirect_template_path: Option<PathBuf>,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub shortener: ShortenerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub key_prefix: String,
    pub max_search_limit: usize,
    pub default_search_limit: usize,
    pub scan_count: usize,
}

/// Redis connection pool settings. Durations are in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub address: String,
    pub password: Option<String>,
    pub max_active: usize,
    pub max_idle: usize,
    pub timeout: u64,
    pub wait_timeout: Option<u64>,
    pub idle_timeout: u64,
    pub reap_interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShortenerConfig {
    pub max_attempts: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            url_length: CodeFormat::default().length,
            redirect_template_path: None,
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            cache: CacheConfig::default(),
            shortener: ShortenerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let redis = RedisStoreSettings::default();
        Self {
            backend: StorageBackend::default(),
            key_prefix: redis.key_prefix,
            max_search_limit: redis.max_search_limit,
            default_search_limit: 20,
            scan_count: redis.scan_count,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let pool = StorePoolSettings::default();
        Self {
            address: "127.0.0.1:6379".to_string(),
            password: None,
            max_active: pool.max_active,
            max_idle: pool.max_idle,
            timeout: millis(pool.timeout),
            wait_timeout: pool.wait_timeout.map(millis),
            idle_timeout: millis(pool.idle_timeout),
            reap_interval: 30_000,
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            max_attempts: ShortenerSettings::default().max_attempts,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Settings {
    /// Loads settings from `paths` (or [`DEFAULT_CONFIG_FILE`] if present),
    /// then `LIL__*` environment variables, then `overrides`.
    ///
    /// Override keys use dotted paths such as `server.address`.
    pub fn load(paths: &[PathBuf], overrides: &[(&str, String)]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if paths.is_empty() {
            builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false));
        }
        for path in paths {
            builder = builder.add_source(File::from(path.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder, overrides)
    }

    fn finish(
        mut builder: ConfigBuilder<DefaultState>,
        overrides: &[(&str, String)],
    ) -> Result<Self, ConfigError> {
        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Message("base_url must not be empty".into()));
        }
        if self.url_length == 0 {
            return Err(ConfigError::Message("url_length must be positive".into()));
        }
        if self.storage.max_search_limit == 0 || self.storage.default_search_limit == 0 {
            return Err(ConfigError::Message("search limits must be positive".into()));
        }
        if self.cache.max_active == 0 {
            return Err(ConfigError::Message("cache.max_active must be positive".into()));
        }
        if self.cache.timeout == 0 {
            return Err(ConfigError::Message("cache.timeout must be positive".into()));
        }
        if self.cache.reap_interval == 0 {
            return Err(ConfigError::Message("cache.reap_interval must be positive".into()));
        }
        Ok(())
    }

    pub fn code_format(&self) -> CodeFormat {
        CodeFormat::builder().length(self.url_length).build()
    }

    pub fn shortener_settings(&self) -> ShortenerSettings {
        ShortenerSettings::builder()
            .max_attempts(self.shortener.max_attempts)
            .format(self.code_format())
            .build()
    }

    pub fn redis_store_settings(&self) -> RedisStoreSettings {
        RedisStoreSettings::builder()
            .key_prefix(self.storage.key_prefix.clone())
            .max_search_limit(self.storage.max_search_limit)
            .scan_count(self.storage.scan_count)
            .build()
    }
}

impl CacheConfig {
    pub fn pool_settings(&self) -> StorePoolSettings {
        StorePoolSettings::builder()
            .max_active(self.max_active)
            .max_idle(self.max_idle)
            .timeout(Duration::from_millis(self.timeout))
            .wait_timeout(self.wait_timeout.map(Duration::from_millis))
            .idle_timeout(Duration::from_millis(self.idle_timeout))
            .build()
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_millis(self.reap_interval)
    }
}
