use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use tinyscale_gateway::telemetry::LogFormat;
use tinyscale_shortener::WriteMode;

pub const LISTEN_ADDR_ENV: &str = "TINYSCALE_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "TINYSCALE_STORAGE_BACKEND";
pub const POSTGRES_DSN_ENV: &str = "TINYSCALE_POSTGRES_DSN";
pub const POSTGRES_MAX_CONNECTIONS_ENV: &str = "TINYSCALE_POSTGRES_MAX_CONNECTIONS";
pub const CACHE_BACKEND_ENV: &str = "TINYSCALE_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "TINYSCALE_REDIS_URL";
pub const REDIS_HASH_KEY_ENV: &str = "TINYSCALE_REDIS_HASH_KEY";
pub const CACHE_CAPACITY_ENV: &str = "TINYSCALE_CACHE_CAPACITY";
pub const WRITE_MODE_ENV: &str = "TINYSCALE_WRITE_MODE";
pub const WRITER_WORKERS_ENV: &str = "TINYSCALE_WRITER_WORKERS";
pub const WRITER_QUEUE_ENV: &str = "TINYSCALE_WRITER_QUEUE";
pub const LOG_FORMAT_ENV: &str = "TINYSCALE_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIS_HASH_KEY: &str = tinyscale_cache::DEFAULT_HASH_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::InMemory => write!(f, "in-memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WriteModeArg {
    Sync,
    Background,
}

impl From<WriteModeArg> for WriteMode {
    fn from(arg: WriteModeArg) -> Self {
        match arg {
            WriteModeArg::Sync => WriteMode::Sync,
            WriteModeArg::Background => WriteMode::Background,
        }
    }
}

impl Display for WriteModeArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteModeArg::Sync => write!(f, "sync"),
            WriteModeArg::Background => write!(f, "background"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinyscale-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = POSTGRES_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_dsn: Option<String>,

    #[arg(long, env = POSTGRES_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub postgres_max_connections: u32,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::InMemory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_HASH_KEY_ENV, default_value = DEFAULT_REDIS_HASH_KEY)]
    pub redis_hash_key: String,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 100_000)]
    pub cache_capacity: u64,

    #[arg(long, env = WRITE_MODE_ENV, value_enum, default_value_t = WriteModeArg::Sync)]
    pub write_mode: WriteModeArg,

    #[arg(long, env = WRITER_WORKERS_ENV, default_value_t = 4)]
    pub writer_workers: usize,

    #[arg(long, env = WRITER_QUEUE_ENV, default_value_t = 1024)]
    pub writer_queue: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Compact)]
    pub log_format: LogFormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["gateway"]).unwrap();

        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache, CacheBackendArg::InMemory);
        assert_eq!(cli.redis_hash_key, "urls");
        assert_eq!(cli.write_mode, WriteModeArg::Sync);
        assert_eq!(cli.writer_workers, 4);
        assert_eq!(cli.log_format, LogFormatArg::Compact);
    }

    #[test]
    fn postgres_requires_dsn() {
        assert!(CLI::try_parse_from(["gateway", "--storage", "postgres"]).is_err());

        let cli = CLI::try_parse_from([
            "gateway",
            "--storage",
            "postgres",
            "--postgres-dsn",
            "postgres://localhost/tinyscale",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackendArg::Postgres);
    }

    #[test]
    fn redis_requires_url() {
        assert!(CLI::try_parse_from(["gateway", "--cache", "redis"]).is_err());

        let cli = CLI::try_parse_from([
            "gateway",
            "--cache",
            "redis",
            "--redis-url",
            "redis://127.0.0.1:6379",
            "--write-mode",
            "background",
        ])
        .unwrap();
        assert_eq!(cli.cache, CacheBackendArg::Redis);
        assert_eq!(cli.write_mode, WriteModeArg::Background);
    }
}
