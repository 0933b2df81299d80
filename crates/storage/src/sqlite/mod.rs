use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::repository::{SkillStore, SkillsSnapshot, Storage, StorageError};

mod mapping;
mod migrate;
mod skill_repo;

/// SQLite-backed skill store.
///
/// Writes go through the pool; after every successful write the full
/// collection is re-queried and published on the watch channel, so
/// subscribers always hold a whole-collection snapshot.
#[derive(Clone)]
pub struct SqliteSkillStore {
    pool: SqlitePool,
    snapshot_tx: Arc<watch::Sender<SkillsSnapshot>>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SqliteSkillStore {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// if enforcing foreign key constraints fails during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        info!(database_url, "connected to sqlite skill store");
        let (snapshot_tx, _) = watch::channel(SkillsSnapshot::default());
        Ok(Self {
            pool,
            snapshot_tx: Arc::new(snapshot_tx),
        })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Re-query the collection and publish it to subscribers.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read.
    pub async fn refresh_snapshot(&self) -> Result<(), StorageError> {
        let skills = self.list_skills().await?;
        debug!(skills = skills.len(), "publishing skill snapshot");
        self.snapshot_tx.send_replace(Arc::new(skills));
        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`, with the initial snapshot
    /// already published.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection, migrations, or the initial
    /// collection read cannot be completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = SqliteSkillStore::connect(database_url).await?;
        store.migrate().await?;
        store.refresh_snapshot().await?;
        Ok(Self {
            skills: Arc::new(store),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteSkillStore>();
    }
}
