// Database Connection Management
//
// Handles PostgreSQL connection pooling using tokio-postgres and deadpool.
use anyhow::{Context, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::time::Duration;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};
use tokio_postgres::{NoTls, Socket};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub ssl: bool,
    pub max_size: usize,
    pub timeouts: deadpool_postgres::Timeouts,
}

fn default_timeouts() -> deadpool_postgres::Timeouts {
    deadpool_postgres::Timeouts {
        wait: Some(Duration::from_secs(5)),
        create: Some(Duration::from_secs(5)),
        recycle: Some(Duration::from_secs(5)),
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "root".to_string(),
            password: String::new(),
            dbname: "datalake".to_string(),
            ssl: false,
            max_size: 16,
            timeouts: default_timeouts(),
        }
    }
}

impl DatabaseConfig {
    /// Create configuration from database URL
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = url::Url::parse(url).context("Failed to parse database URL")?;

        if parsed.scheme() != "postgresql" && parsed.scheme() != "postgres" {
            anyhow::bail!("Invalid database URL scheme, expected postgresql or postgres");
        }

        let ssl = parsed
            .query_pairs()
            .any(|(k, v)| k == "sslmode" && (v == "require" || v == "verify-full"));

        Ok(Self {
            host: parsed.host_str().unwrap_or("localhost").to_string(),
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().unwrap_or("").to_string(),
            dbname: parsed.path().trim_start_matches('/').to_string(),
            ssl,
            ..Self::default()
        })
    }

    /// Create configuration from `DATABASE_URL`, `DATABASE_SSL` and
    /// `DATABASE_MAX_CONNECTIONS` looked up through `var`.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            var("DATABASE_URL").context("DATABASE_URL must be set in the environment")?;
        let mut config = Self::from_url(&database_url)?;

        if let Some(ssl) = var("DATABASE_SSL") {
            config.ssl = ssl.eq_ignore_ascii_case("true") || ssl == "1";
        }
        if let Some(max) = var("DATABASE_MAX_CONNECTIONS") {
            config.max_size = max
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;
        }
        Ok(config)
    }
}

/// Database connection wrapper
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: Pool,
}

impl DatabaseConnection {
    /// Create a new database connection with the provided configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let masked_host = format!("{}:{}/{}", config.host, config.port, config.dbname);
        tracing::info!("🔌 Connecting to database: {} (ssl: {})", masked_host, config.ssl);

        let mut pg_config = tokio_postgres::Config::new();
        pg_config.host(&config.host);
        pg_config.port(config.port);
        pg_config.user(&config.user);
        pg_config.password(&config.password);
        pg_config.dbname(&config.dbname);

        let pool = if config.ssl {
            let tls_connector = TlsConnector::builder()
                .build()
                .context("Failed to build TLS connector")?;
            build_pool(pg_config, MakeTlsConnector::new(tls_connector), &config)?
        } else {
            build_pool(pg_config, NoTls, &config)?
        };

        // Test the connection
        let client = pool
            .get()
            .await
            .context("Failed to get connection from pool")?;
        client
            .query("SELECT 1", &[])
            .await
            .context("Failed to test database connection")?;

        tracing::info!("✅ Database connection established successfully");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

fn build_pool<T>(pg_config: tokio_postgres::Config, tls: T, config: &DatabaseConfig) -> Result<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, tls, mgr_config);

    Pool::builder(mgr)
        .max_size(config.max_size)
        .wait_timeout(config.timeouts.wait)
        .create_timeout(config.timeouts.create)
        .recycle_timeout(config.timeouts.recycle)
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .build()
        .context("Failed to create database pool")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_database_url() {
        let config =
            DatabaseConfig::from_url("postgres://root:pw@db.internal:6543/datalake").unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.user, "root");
        assert_eq!(config.password, "pw");
        assert_eq!(config.dbname, "datalake");
        assert!(!config.ssl);
    }

    #[test]
    fn sslmode_require_enables_tls() {
        let config =
            DatabaseConfig::from_url("postgresql://u:p@host/db?sslmode=require").unwrap();
        assert!(config.ssl);
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(DatabaseConfig::from_url("mysql://u:p@host/db").is_err());
    }

    #[test]
    fn lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://u:p@localhost:5432/datalake"),
            ("DATABASE_SSL", "true"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ]);
        let config =
            DatabaseConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert!(config.ssl);
        assert_eq!(config.max_size, 4);
    }

    #[test]
    fn missing_url_is_an_error() {
        assert!(DatabaseConfig::from_lookup(|_| None).is_err());
    }
}
