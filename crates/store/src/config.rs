//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MMA_STORAGE_BACKEND` - `memory`, `file` or `sqlite` (default: file)
//! - `MMA_DATA_DIR` - Directory for the file and SQLite backends (default: .mma-shop)
//! - `MMA_DATABASE_URL` - SQLite connection string (default: `sqlite://<data dir>/shop.db`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment name reported to Sentry (default: development)
//! - `SENTRY_SAMPLE_RATE` - Fraction of errors sent to Sentry, 0.0 to 1.0 (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".mma-shop";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the stores keep their collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Nothing survives the process.
    Memory,
    /// One JSON file per key.
    File { dir: PathBuf },
    /// A `kv` table in a SQLite database.
    Sqlite { url: String },
}

impl StorageBackend {
    /// Name used in configuration and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File { .. } => "file",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

/// Shop application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Storage backend for the stores
    pub storage: StorageBackend,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: String,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::File {
                dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
            sentry_dsn: None,
            sentry_environment: "development".to_string(),
            sentry_sample_rate: 1.0,
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let data_dir = PathBuf::from(env.or_default("MMA_DATA_DIR", DEFAULT_DATA_DIR));
        let storage = match env.or_default("MMA_STORAGE_BACKEND", "file").as_str() {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File { dir: data_dir },
            "sqlite" => StorageBackend::Sqlite {
                url: env.optional("MMA_DATABASE_URL").unwrap_or_else(|| {
                    format!("sqlite://{}", data_dir.join("shop.db").display())
                }),
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "MMA_STORAGE_BACKEND".to_string(),
                    format!("unknown backend '{other}' (expected memory, file or sqlite)"),
                ));
            }
        };

        let sentry_sample_rate = env
            .or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("{sentry_sample_rate} is outside 0.0..=1.0"),
            ));
        }

        Ok(Self {
            storage,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.or_default("SENTRY_ENVIRONMENT", "development"),
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Set and non-blank values only.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
