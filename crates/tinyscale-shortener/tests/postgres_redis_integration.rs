use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tinyscale_cache::{RedisUrlCache, DEFAULT_HASH_KEY};
use tinyscale_core::{Alias, ReadRepository, Repository, Shortener, UrlCache, UrlRecord};
use tinyscale_generator::{EncodedDigest, Fingerprint, Sha256Fingerprint};
use tinyscale_shortener::{MappingWriter, ShortenerService, WriteMode, WriterConfig};
use tinyscale_storage::PostgresRepository;
use tinyscale_test_infra::postgres::{PostgresConfig, PostgresServer};
use tinyscale_test_infra::redis::RedisServer;

type Service = ShortenerService<PostgresRepository, RedisUrlCache, Sha256Fingerprint>;

struct Fixture {
    _postgres: PostgresServer,
    _redis: RedisServer,
    repo: Arc<PostgresRepository>,
    cache: Arc<RedisUrlCache>,
}

impl Fixture {
    async fn start() -> Self {
        let postgres = PostgresServer::new(PostgresConfig::builder().build())
            .await
            .expect("start postgres");
        let url = postgres.database_url().await.expect("postgres url");
        let repo = PostgresRepository::new(connect_with_retry(&url).await);
        repo.migrate().await.expect("create schema");

        let redis = RedisServer::new().await.expect("start redis");
        let redis_url = redis.url().await.expect("redis url");
        let cache = RedisUrlCache::connect(&redis_url, DEFAULT_HASH_KEY)
            .await
            .expect("connect redis");

        Self {
            _postgres: postgres,
            _redis: redis,
            repo: Arc::new(repo),
            cache: Arc::new(cache),
        }
    }

    fn writer(&self, mode: WriteMode) -> Arc<MappingWriter<PostgresRepository, RedisUrlCache>> {
        Arc::new(MappingWriter::new(
            self.repo.clone(),
            self.cache.clone(),
            WriterConfig::builder().mode(mode).build(),
        ))
    }

    fn service(&self, mode: WriteMode) -> Service {
        ShortenerService::new(self.writer(mode), Sha256Fingerprint)
    }
}

async fn connect_with_retry(url: &str) -> sqlx::PgPool {
    let mut last_error = None;

    for _ in 0..20 {
        match PgPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect postgres: {last_error:?}");
}

fn candidate(url: &str, offset: usize) -> Alias {
    EncodedDigest::new(&Sha256Fingerprint.digest(url))
        .candidate(offset)
        .unwrap()
}

#[tokio::test]
async fn shorten_writes_through_both_stores() {
    let fixture = Fixture::start().await;
    let service = fixture.service(WriteMode::Sync);
    let url = "https://example.com/a";

    let alias = service.shorten(url).await.unwrap();

    assert_eq!(alias, candidate(url, 0));
    let stored = fixture.repo.get(&alias).await.unwrap().unwrap();
    assert_eq!(stored.long_url, url);
    assert_eq!(
        fixture.cache.get_url(&alias).await.unwrap().as_deref(),
        Some(url)
    );

    assert_eq!(service.shorten(url).await.unwrap(), alias);
}

#[tokio::test]
async fn collision_in_postgres_advances_offset() {
    let fixture = Fixture::start().await;
    let service = fixture.service(WriteMode::Sync);
    let url = "https://example.com/collide";
    fixture
        .repo
        .insert(&candidate(url, 0), UrlRecord::new("https://other.example"))
        .await
        .unwrap();

    let alias = service.shorten(url).await.unwrap();

    assert_eq!(alias, candidate(url, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_shorten_through_separate_writers_agrees() {
    let fixture = Fixture::start().await;
    let url = "https://example.com/contended";
    let mut handles = vec![];

    // separate services share nothing but the stores, like separate processes
    for _ in 0..8 {
        let service = fixture.service(WriteMode::Sync);
        handles.push(tokio::spawn(async move { service.shorten(url).await }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), candidate(url, 0));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn background_write_reaches_postgres() {
    let fixture = Fixture::start().await;
    let writer = fixture.writer(WriteMode::Background);
    let service = ShortenerService::new(writer.clone(), Sha256Fingerprint);
    let url = "https://example.com/later";

    let alias = service.shorten(url).await.unwrap();

    let repo = fixture.repo.clone();
    awaitility::at_most(Duration::from_secs(10))
        .poll_interval(Duration::from_millis(50))
        .until_async(|| async { repo.get(&alias).await.unwrap().is_some() })
        .await;

    writer.shutdown().await;
    assert_eq!(writer.dead_letters(), 0);
    assert_eq!(
        fixture.cache.get_url(&alias).await.unwrap().as_deref(),
        Some(url)
    );
}
