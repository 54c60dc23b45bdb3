use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Error, PgPool};

use super::LinkStore;
use crate::error::StoreError;
use crate::model::Link;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres-backed store. Uniqueness comes from the primary key on `code`
/// and click accounting from a single `update ... returning` statement.
#[derive(Clone)]
pub struct PgLinkStore {
    db_connection_pool: PgPool,
}

impl PgLinkStore {
    pub fn new(db_connection_pool: PgPool) -> Self {
        PgLinkStore { db_connection_pool }
    }

    /// Opens a pool whose sessions cancel any statement running longer than
    /// `statement_timeout` on the server side, so a statement abandoned by a
    /// timed-out caller is rolled back instead of committing later.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        statement_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let connect_options = database_url
            .parse::<PgConnectOptions>()
            .map_err(store_error)?
            .options([(
                "statement_timeout",
                format!("{}ms", statement_timeout.as_millis()),
            )]);
        let db_connection_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .map_err(store_error)?;
        Ok(Self::new(db_connection_pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.db_connection_pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR
            .run(&self.db_connection_pool)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

fn store_error(err: Error) -> StoreError {
    match err {
        Error::Database(db_err) if db_err.kind() == ErrorKind::UniqueViolation => {
            StoreError::Conflict
        }
        Error::RowNotFound => StoreError::NotFound,
        err => {
            tracing::error!("{}", err);
            StoreError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn insert(&self, code: &str, url: &str) -> Result<Link, StoreError> {
        sqlx::query_as::<_, Link>(
            r#"
              insert into links(code, url) values ($1, $2)
              returning code, url, clicks, last_clicked, created_at
            "#,
        )
        .bind(code)
        .bind(url)
        .fetch_one(&self.db_connection_pool)
        .await
        .map_err(store_error)
    }

    async fn resolve_and_count(&self, code: &str) -> Result<Link, StoreError> {
        sqlx::query_as::<_, Link>(
            r#"
              update links set clicks = clicks + 1, last_clicked = now() where code = $1
              returning code, url, clicks, last_clicked, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db_connection_pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)
    }

    async fn get(&self, code: &str) -> Result<Link, StoreError> {
        sqlx::query_as::<_, Link>(
            "select code, url, clicks, last_clicked, created_at from links where code = $1",
        )
        .bind(code)
        .fetch_optional(&self.db_connection_pool)
        .await
        .map_err(store_error)?
        .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Link>, StoreError> {
        sqlx::query_as::<_, Link>(
            r#"
              select code, url, clicks, last_clicked, created_at from links
              order by created_at desc, id desc
            "#,
        )
        .fetch_all(&self.db_connection_pool)
        .await
        .map_err(store_error)
    }

    async fn delete(&self, code: &str) -> Result<bool, StoreError> {
        sqlx::query("delete from links where code = $1")
            .bind(code)
            .execute(&self.db_connection_pool)
            .await
            .map(|result| result.rows_affected() > 0)
            .map_err(store_error)
    }
}
