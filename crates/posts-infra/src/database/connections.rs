use std::fmt;
use std::str::FromStr;
#[cfg(feature = "postgres")]
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// TLS mode passed to the Postgres driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    Prefer,
    /// Encrypted transport, server certificate not verified.
    #[default]
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sslmode '{0}'")]
pub struct InvalidSslMode(String);

impl FromStr for SslMode {
    type Err = InvalidSslMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            _ => Err(InvalidSslMode(s.to_string())),
        }
    }
}

/// Configuration for the posts database pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Only applied when `url` does not carry its own `sslmode`.
    pub ssl_mode: SslMode,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ssl_mode: SslMode::default(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
        }
    }

    /// The connection string handed to the driver, with `sslmode` filled in.
    pub fn connection_url(&self) -> String {
        if self.url.contains("sslmode=") {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}sslmode={}", self.url, separator, self.ssl_mode)
    }
}

/// Process-wide connection pool for the posts database.
///
/// Built once at startup and shared by handle. Callers that find the pool
/// exhausted wait up to `acquire_timeout`, then get a connection error.
#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct DatabasePool {
    conn: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl DatabasePool {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database pool...");

        let opts = ConnectOptions::new(config.connection_url())
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .sqlx_logging(false)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            max_connections = config.max_connections,
            ssl_mode = %config.ssl_mode,
            "Database pool ready"
        );

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Wrap an existing connection, e.g. a `MockDatabase` in tests.
    ///
    /// Accepts an owned connection or one already behind an `Arc`, so a test
    /// can keep its own handle and read the transaction log afterwards.
    pub fn from_connection(conn: impl Into<Arc<DbConn>>) -> Self {
        Self { conn: conn.into() }
    }

    pub fn connection(&self) -> &DbConn {
        &self.conn
    }

    /// Close every pooled connection.
    ///
    /// If repositories still hold handles, the underlying pool is closed
    /// through the shared reference.
    pub async fn close(self) -> Result<(), DbErr> {
        tracing::info!("Closing database pool");
        match Arc::try_unwrap(self.conn) {
            Ok(conn) => conn.close().await,
            Err(shared) => {
                tracing::debug!(
                    handles = Arc::strong_count(&shared),
                    "Pool still shared, closing through reference"
                );
                shared.get_postgres_connection_pool().close().await;
                Ok(())
            }
        }
    }
}
