//! Configuration loader for the `drought-dashboard` backend service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional numeric environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable, treating blank values as unset.
macro_rules! optional_env {
    ($var_name:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
}

const DEFAULT_DB_URL: &str = "sqlite://drought_system.db";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3.1-pro-preview";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// SQLite connection string. The database file is created if missing.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// HTTP listen port.
    pub port: u16,

    /// Seed for the first-boot data generator. `None` draws from OS entropy.
    pub seed_rng_seed: Option<u64>,

    /// Generative API key for the chat assistant.
    pub gemini_api_key: Option<String>,

    /// Generative model used by the chat assistant.
    pub gemini_model: String,

    /// Generative API base URL.
    pub gemini_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            db_pool_max: 5,
            port: 3000,
            seed_rng_seed: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `DATABASE_URL` – SQLite connection string (default: `sqlite://drought_system.db`)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `PORT` – HTTP listen port (default: 3000)
/// - `SEED_RNG_SEED` – fixed seed for synthetic data (default: entropy)
/// - `GEMINI_API_KEY` – chat assistant key (default: unset, chat disabled)
/// - `GEMINI_MODEL` / `GEMINI_API_URL` – chat model and endpoint overrides
///
/// Returns an error if any numeric variable fails to parse.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let db_url = optional_env!("DATABASE_URL").unwrap_or(defaults.db_url);
    let db_pool_max = parse_env!("DB_POOL_MAX", u32, defaults.db_pool_max);
    let port = parse_env!("PORT", u16, defaults.port);
    let seed_rng_seed = optional_env!("SEED_RNG_SEED")
        .map(|v| v.parse::<u64>())
        .transpose()
        .map_err(|e| anyhow!("Invalid SEED_RNG_SEED: {}", e))?;
    let gemini_api_key = optional_env!("GEMINI_API_KEY");
    let gemini_model = optional_env!("GEMINI_MODEL").unwrap_or(defaults.gemini_model);
    let gemini_api_url = optional_env!("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url);

    if db_pool_max == 0 {
        return Err(anyhow!("Invalid DB_POOL_MAX: must be at least 1"));
    }

    Ok(Config {
        db_url,
        db_pool_max,
        port,
        seed_rng_seed,
        gemini_api_key,
        gemini_model,
        gemini_api_url,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// The API key is never printed, only whether one was provided.
    pub fn log_config(&self) {
        // ---
        let api_key = if self.gemini_api_key.is_some() {
            "****"
        } else {
            "<unset>"
        };
        let seed = self
            .seed_rng_seed
            .map_or_else(|| "<entropy>".to_string(), |s| s.to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL   : {}", self.db_url);
        tracing::info!("  DB_POOL_MAX    : {}", self.db_pool_max);
        tracing::info!("  PORT           : {}", self.port);
        tracing::info!("  SEED_RNG_SEED  : {}", seed);
        tracing::info!("  GEMINI_API_KEY : {}", api_key);
        tracing::info!("  GEMINI_MODEL   : {}", self.gemini_model);
        tracing::info!("  GEMINI_API_URL : {}", self.gemini_api_url);
    }
}
