use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tinyscale_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use tinyscale_core::{Alias, StorageError};
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL implementation of the repository contract.
///
/// Mappings live in the `url_mappings` table, whose `alias` column carries
/// the `UNIQUE NOT NULL` constraint that arbitrates concurrent inserts.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))?;
        info!("url_mappings schema is up to date");
        Ok(())
    }

    /// Closes every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for PostgresRepository {
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT long_url, created_at
            FROM url_mappings
            WHERE alias = $1
            LIMIT 1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(UrlRecord {
            long_url,
            created_at: parse_created_at(created_at)?,
        }))
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn insert(&self, alias: &Alias, record: UrlRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO url_mappings (alias, long_url, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(alias.as_str())
        .bind(record.long_url)
        .bind(record.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(alias = %alias, "inserted url mapping");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(alias.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_classified() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StorageError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StorageError::InvalidData(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Protocol("boom".into())),
            StorageError::Query(_)
        ));
    }

    #[test]
    fn created_at_round_trips_through_seconds() {
        let ts = parse_created_at(1_700_000_000).unwrap();
        assert_eq!(ts.as_second(), 1_700_000_000);
    }
}
