//! Database client lifecycle.
//!
//! A [`Storage`] is built explicitly from a [`StorageConfig`] and handed to
//! the services as a shared connection. Nothing here is a global.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const IN_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_url: String,
    pub max_connections: Option<u32>,
    pub run_migrations: bool,
}

impl StorageConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: None,
            run_migrations: true,
        }
    }

    /// A private, migrated in-memory database.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_URL)
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    pub fn with_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        is_sqlite_url(&self.database_url)
            && (self.database_url.contains(":memory:") || self.database_url.contains("mode=memory"))
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(sanitize_sqlite_url(self.database_url.clone()));
        if self.is_in_memory() {
            // Every pooled connection would otherwise see its own empty database.
            options.max_connections(1).min_connections(1);
        } else if let Some(max_connections) = self.max_connections {
            options.max_connections(max_connections);
        }
        options
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("sqlite://data/snippets.db?mode=rwc")
    }
}

pub struct Storage {
    db: Arc<DatabaseConnection>,
}

impl Storage {
    pub async fn open(config: StorageConfig) -> Result<Self, StorageError> {
        if let Some(directory) = sqlite_parent_dir(&config.database_url) {
            std::fs::create_dir_all(&directory).map_err(|source| {
                StorageError::CreateDirectory {
                    path: directory.clone(),
                    source,
                }
            })?;
        }

        let db = Database::connect(config.connect_options()).await?;
        if config.run_migrations {
            Migrator::up(&db, None).await?;
            debug!("database migrations applied");
        }

        info!(in_memory = config.is_in_memory(), "storage opened");
        Ok(Self { db: Arc::new(db) })
    }

    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.db.clone()
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }

    /// Closes the pool. Clones handed out by [`Storage::connection`] must be
    /// dropped first, otherwise the pool is left to close on last drop.
    pub async fn close(self) -> Result<(), DbErr> {
        match Arc::try_unwrap(self.db) {
            Ok(db) => {
                db.close().await?;
                info!("storage closed");
            }
            Err(_) => debug!("storage still shared, pool closes on last drop"),
        }
        Ok(())
    }
}

fn is_sqlite_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite://") || database_url.starts_with("sqlite:")
}

/// Drops a `foreign_keys` query parameter; sqlx already turns the pragma on.
pub(crate) fn sanitize_sqlite_url(database_url: String) -> String {
    if !is_sqlite_url(&database_url) {
        return database_url;
    }

    let mut parts = database_url.splitn(2, '?');
    let base = parts.next().unwrap_or_default();
    let Some(query) = parts.next() else {
        return database_url;
    };

    let filtered: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !key.eq_ignore_ascii_case("foreign_keys")
        })
        .collect();

    if filtered.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", filtered.join("&"))
    }
}

/// Directory that must exist before a file-backed SQLite url can be opened.
fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") || database_url.contains("mode=memory") {
        return None;
    }

    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
