use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout: u64,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
}

impl DatabaseConfig {
    /// 单连接的内存 SQLite，测试与本地试用
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            connect_timeout: 10,
            acquire_timeout: 10,
            idle_timeout: 600,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")?,
            min_connections: env_or("DB_MIN_CONNECTIONS", 5),
            max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            connect_timeout: env_or("DB_CONNECT_TIMEOUT", 10),
            acquire_timeout: env_or("DB_ACQUIRE_TIMEOUT", 10),
            idle_timeout: env_or("DB_IDLE_TIMEOUT", 600),
        };

        if database.min_connections > database.max_connections {
            anyhow::bail!(
                "DB_MIN_CONNECTIONS ({}) 不能大于 DB_MAX_CONNECTIONS ({})",
                database.min_connections,
                database.max_connections
            );
        }

        Ok(Config { database })
    }
}
