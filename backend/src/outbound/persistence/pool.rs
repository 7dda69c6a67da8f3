//! `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! Sizing and checkout timeout come from [`AppSettings`]. A [`PoolError`]
//! never leaves this module tree as is: the repositories turn it into their
//! `Connection` port error and the store probe into `Unreachable`.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::settings::AppSettings;

/// Pool construction or checkout failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

/// Where the pool connects and how large it may grow.
///
/// ```
/// use std::time::Duration;
/// use taskboard::outbound::persistence::PoolConfig;
/// use taskboard::settings::AppSettings;
///
/// let settings = AppSettings { connection_timeout_secs: Some(5), ..AppSettings::default() };
/// let config = PoolConfig::from_settings("postgres://localhost/taskboard", &settings);
/// assert_eq!(config.connection_timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Pool for `database_url` sized by the settings defaults.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self::from_settings(database_url, &AppSettings::default())
    }

    #[must_use]
    pub fn from_settings(database_url: impl Into<String>, settings: &AppSettings) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: settings.max_connections(),
            min_idle: settings.min_idle(),
            connection_timeout: settings.connection_timeout(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
}

/// Connection pool shared by the Diesel repositories and the store probe.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Builds the pool. `bb8` connects lazily beyond `min_idle`, so an
    /// unreachable server may only surface on the first checkout.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the idle floor cannot be established.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);

        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle))
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build { message: err.to_string() })?;

        Ok(Self { inner })
    }

    /// # Errors
    ///
    /// [`PoolError::Checkout`] when no connection frees up within the
    /// checkout timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::Checkout { message: err.to_string() })
    }
}
