use clap::Parser;
use lil_gateway::logging::LogFormat;
use lil_gateway::StorageBackend;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "LIL_CONFIG";

#[derive(Debug, Parser)]
#[command(name = "lil", version, about = "A little URL shortener")]
pub struct Cli {
    /// TOML configuration files, merged in order.
    #[arg(short = 'c', long = "config", env = CONFIG_ENV, value_delimiter = ',')]
    pub config: Vec<PathBuf>,

    /// Overrides `server.address`.
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// Overrides `base_url`.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overrides `storage.backend`.
    #[arg(long, value_enum)]
    pub storage: Option<StorageBackend>,

    /// Overrides `cache.address`.
    #[arg(long)]
    pub cache_address: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Settings keys set on the command line.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(address) = self.address {
            overrides.push(("server.address", address.to_string()));
        }
        if let Some(base_url) = &self.base_url {
            overrides.push(("base_url", base_url.clone()));
        }
        if let Some(storage) = self.storage {
            overrides.push(("storage.backend", storage.to_string()));
        }
        if let Some(cache_address) = &self.cache_address {
            overrides.push(("cache.address", cache_address.clone()));
        }
        overrides
    }
}
