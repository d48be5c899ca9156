//! Configuration module
//!
//! Settings are read from the environment (optionally seeded from a `.env` file).
//! Unset variables fall back to the defaults below; malformed values are rejected
//! only where a silent fallback would change behaviour.

use std::env;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 4000;
const LOCAL_STORAGE_PATH: &str = "./data";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    /// Upload cap in bytes. `None` keeps the default: the whole body is buffered
    /// whatever its size.
    pub max_upload_bytes: Option<usize>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            storage_backend: StorageBackend::Local,
            local_storage_path: Some(LOCAL_STORAGE_PATH.to_string()),
            max_upload_bytes: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Local,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_SIZE_MB") {
            Ok(value) => {
                let mb = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a whole number"))?;
                let bytes = mb
                    .checked_mul(1024 * 1024)
                    .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;
                Some(bytes)
            }
            Err(_) => None,
        };

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "text".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            storage_backend,
            local_storage_path: Some(
                env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| LOCAL_STORAGE_PATH.to_string()),
            ),
            max_upload_bytes,
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_upload_bytes == Some(0) {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        match self.storage_backend {
            StorageBackend::Local => {
                if self
                    .local_storage_path
                    .as_deref()
                    .map_or(true, |p| p.trim().is_empty())
                {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }
}
