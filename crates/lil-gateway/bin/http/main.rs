mod cli;

use crate::cli::Cli;
use anyhow::Context;
use clap::Parser;
use lil_core::LinkStore;
use lil_gateway::{logging, App, AppState, InterstitialPage, Settings, StorageBackend};
use lil_generator::RandomGenerator;
use lil_pool::RedisPool;
use lil_redirector::RedirectorService;
use lil_shortener::ShortenerService;
use lil_storage::{InMemoryLinkStore, RedisLinkStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format).context("failed to install tracing subscriber")?;

    let settings = Settings::load(&cli.config, &cli.overrides()).context("failed to load configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_addr = %settings.server.address,
        base_url = %settings.base_url,
        storage_backend = %settings.storage.backend,
        url_length = settings.url_length,
        "starting lil"
    );

    let page = InterstitialPage::load(settings.redirect_template_path.as_deref())
        .with_context(|| {
            format!(
                "couldn't load redirect template {:?}",
                settings.redirect_template_path
            )
        })?;

    match settings.storage.backend {
        StorageBackend::InMemory => {
            let store = InMemoryLinkStore::with_max_search_limit(settings.storage.max_search_limit);
            run_server(&settings, Arc::new(store), page).await
        }
        StorageBackend::Redis => {
            let pool = RedisPool::redis(
                &settings.cache.address,
                settings.cache.password.as_deref(),
                settings.cache.pool_settings(),
            )
            .context("failed to create redis pool")?;
            let _reaper = pool.spawn_reaper(settings.cache.reap_interval());

            let store = RedisLinkStore::new(pool, settings.redis_store_settings());
            run_server(&settings, Arc::new(store), page).await
        }
    }
}

async fn run_server<S: LinkStore>(
    settings: &Settings,
    store: Arc<S>,
    page: InterstitialPage,
) -> anyhow::Result<()> {
    let shortener = ShortenerService::new(
        Arc::clone(&store),
        RandomGenerator::new(settings.code_format()),
        settings.shortener_settings(),
    );
    let redirector = RedirectorService::new(store, settings.code_format());

    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        page,
        settings.base_url.clone(),
        settings.storage.default_search_limit,
    );

    let listener = tokio::net::TcpListener::bind(settings.server.address)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.address))?;
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    App::serve(listener, state).await?;
    Ok(())
}
