mod cli;

use crate::cli::{CacheBackendArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tinyscale_cache::{MokaUrlCache, RedisUrlCache};
use tinyscale_core::{Repository, UrlCache};
use tinyscale_gateway::{telemetry, App, AppState};
use tinyscale_generator::Sha256Fingerprint;
use tinyscale_redirector::RedirectorService;
use tinyscale_shortener::{MappingWriter, ShortenerService, WriterConfig};
use tinyscale_storage::{InMemoryRepository, PostgresRepository};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    telemetry::init(config.log_format.into()).context("failed to install tracing subscriber")?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        write_mode = %config.write_mode,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            with_cache(&config, Arc::new(InMemoryRepository::new())).await?;
        }
        StorageBackendArg::Postgres => {
            let dsn = config
                .postgres_dsn
                .as_deref()
                .context("postgres dsn is required when storage backend is postgres")?;
            let repository = PostgresRepository::connect(dsn, config.postgres_max_connections)
                .await
                .context("failed to connect to postgres")?;
            repository
                .migrate()
                .await
                .context("failed to run database migrations")?;

            let repository = Arc::new(repository);
            let served = with_cache(&config, Arc::clone(&repository)).await;
            repository.close().await;
            info!("postgres pool closed");
            served?;
        }
    }

    Ok(())
}

async fn with_cache<R: Repository>(config: &CLI, repository: Arc<R>) -> anyhow::Result<()> {
    match config.cache {
        CacheBackendArg::InMemory => {
            let cache = MokaUrlCache::with_capacity(config.cache_capacity);
            serve(config, repository, Arc::new(cache)).await
        }
        CacheBackendArg::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis url is required when cache backend is redis")?;
            let cache = RedisUrlCache::connect(url, config.redis_hash_key.clone())
                .await
                .context("failed to connect to redis")?;
            serve(config, repository, Arc::new(cache)).await
        }
    }
}

async fn serve<R: Repository, C: UrlCache>(
    config: &CLI,
    repository: Arc<R>,
    cache: Arc<C>,
) -> anyhow::Result<()> {
    let writer_config = WriterConfig::builder()
        .mode(config.write_mode.into())
        .workers(config.writer_workers)
        .queue_capacity(config.writer_queue)
        .build();
    let writer = Arc::new(MappingWriter::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
        writer_config,
    ));

    let state = AppState::new(
        Arc::new(ShortenerService::new(Arc::clone(&writer), Sha256Fingerprint)),
        Arc::new(RedirectorService::new(repository, cache)),
    );

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let served = axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    writer.shutdown().await;
    let dead_letters = writer.dead_letters();
    if dead_letters > 0 {
        warn!(dead_letters, "some background writes were dropped");
    }
    info!("gateway stopped");

    served.context("http server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
