//! One `bb8` pool of `AsyncPgConnection`s shared by every repository.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool failures. Repositories fold both into their `Connection` variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("database pool could not start: {0}")]
    Build(String),
    #[error("no database connection available: {0}")]
    Checkout(String),
}

impl PoolError {
    /// The adapter text without the variant prefix.
    pub fn into_message(self) -> String {
        match self {
            Self::Build(message) | Self::Checkout(message) => message,
        }
    }
}

/// Where to connect and how many connections to hold.
///
/// ```
/// use std::time::Duration;
/// use foodgram::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://foodgram@localhost/foodgram")
///     .with_max_size(4)
///     .with_checkout_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Zero is raised to one.
    #[must_use]
    pub fn with_max_size(self, max_size: u32) -> Self {
        Self {
            max_size: max_size.max(1),
            ..self
        }
    }

    #[must_use]
    pub fn with_checkout_timeout(self, checkout_timeout: Duration) -> Self {
        Self {
            checkout_timeout,
            ..self
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Idle connections kept warm, never more than the pool holds.
    fn min_idle(&self) -> u32 {
        DEFAULT_MIN_IDLE.min(self.max_size)
    }
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool, connecting the idle minimum up front.
    ///
    /// # Errors
    /// [`PoolError::Build`] when the URL is malformed or the server refuses
    /// the initial connections.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle()))
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::Build(err.to_string()))
    }

    /// Borrow a connection for the duration of one repository call.
    ///
    /// # Errors
    /// [`PoolError::Checkout`] once the checkout timeout elapses.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::Checkout(err.to_string()))
    }
}
