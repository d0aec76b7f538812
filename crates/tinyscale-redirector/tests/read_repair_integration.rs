use redis::AsyncCommands;
use std::sync::Arc;
use tinyscale_cache::{RedisUrlCache, DEFAULT_HASH_KEY};
use tinyscale_core::{Alias, Redirector, Repository, ResolutionSource, UrlCache, UrlRecord};
use tinyscale_redirector::RedirectorService;
use tinyscale_storage::InMemoryRepository;
use tinyscale_test_infra::redis::RedisServer;

struct Fixture {
    _redis: RedisServer,
    redis_url: String,
    repo: Arc<InMemoryRepository>,
    cache: Arc<RedisUrlCache>,
}

impl Fixture {
    async fn start() -> Self {
        let redis = RedisServer::new().await.expect("Failed to start Redis");
        let redis_url = redis.url().await.expect("Failed to get Redis url");
        let cache = RedisUrlCache::connect(&redis_url, DEFAULT_HASH_KEY)
            .await
            .expect("Failed to connect cache");
        Self {
            _redis: redis,
            redis_url,
            repo: Arc::new(InMemoryRepository::new()),
            cache: Arc::new(cache),
        }
    }

    fn service(&self) -> RedirectorService<InMemoryRepository, RedisUrlCache> {
        RedirectorService::new(self.repo.clone(), self.cache.clone())
    }

    async fn evict(&self, alias: &Alias) {
        let mut conn = redis::Client::open(self.redis_url.as_str())
            .expect("Failed to create Redis client")
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to get Redis connection");
        let _: () = conn
            .hdel(DEFAULT_HASH_KEY, alias.as_str())
            .await
            .expect("Failed to evict entry");
    }
}

#[tokio::test]
async fn evicted_entry_is_repaired_on_next_read() {
    let fixture = Fixture::start().await;
    let service = fixture.service();
    let a = Alias::new("evict1").unwrap();
    fixture
        .repo
        .insert(&a, UrlRecord::new("https://example.com/evicted"))
        .await
        .unwrap();
    fixture
        .cache
        .set_url(&a, "https://example.com/evicted")
        .await
        .unwrap();

    let hit = service.resolve(&a).await.unwrap().unwrap();
    assert_eq!(hit.source, ResolutionSource::Cache);

    fixture.evict(&a).await;
    assert!(fixture.cache.get_url(&a).await.unwrap().is_none());

    let repaired = service.resolve(&a).await.unwrap().unwrap();
    assert_eq!(repaired.long_url, "https://example.com/evicted");
    assert_eq!(repaired.source, ResolutionSource::Store);
    assert_eq!(
        fixture.cache.get_url(&a).await.unwrap().as_deref(),
        Some("https://example.com/evicted")
    );

    let again = service.resolve(&a).await.unwrap().unwrap();
    assert_eq!(again.source, ResolutionSource::Cache);
}

#[tokio::test]
async fn unknown_alias_leaves_redis_untouched() {
    let fixture = Fixture::start().await;
    let service = fixture.service();
    let a = Alias::new("nope12").unwrap();

    assert!(service.resolve(&a).await.unwrap().is_none());
    assert!(fixture.cache.get_url(&a).await.unwrap().is_none());
}
