pub mod config;
pub mod entities;
pub mod errors;
pub mod logging;
pub mod schemas;
pub mod services;

use crate::config::Config;
use crate::logging::log_startup_info;
use crate::services::database::{establish_connection, DatabaseConnection};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        log_startup_info(&config);

        let db = establish_connection(&config.database).await?;
        Ok(Self { db })
    }
}
