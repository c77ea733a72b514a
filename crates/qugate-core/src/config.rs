//! Configuration module
//!
//! Env-driven configuration for the gateway: server, record store, and the
//! base URL used to derive backend endpoint URLs.

use std::env;

const DEFAULT_PORT: u16 = 8000;

/// Which record-store implementation backs provider and token records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStoreKind {
    Postgres,
    Memory,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// External base URL of this deployment; prepended when deriving a
    /// backend's fully qualified endpoint URL.
    pub base_url: String,
    pub record_store: RecordStoreKind,
    pub database_url: Option<String>,
    pub environment: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let record_store = match env::var("RECORD_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => RecordStoreKind::Memory,
            "postgres" => RecordStoreKind::Postgres,
            other => {
                return Err(anyhow::anyhow!(
                    "RECORD_STORE must be 'postgres' or 'memory', got '{other}'"
                ))
            }
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            base_url: env::var("BASE_URL")
                .map_err(|_| anyhow::anyhow!("BASE_URL must be set"))?
                .trim_end_matches('/')
                .to_string(),
            record_store,
            database_url: env::var("DATABASE_URL").ok(),
            environment,
            cors_origins,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base_url.is_empty() {
            return Err(anyhow::anyhow!("BASE_URL cannot be empty"));
        }
        if self.record_store == RecordStoreKind::Postgres {
            let url = self
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the postgres record store"))?;
            if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
