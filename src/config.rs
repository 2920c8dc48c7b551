use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the Supabase project (without the `/rest/v1` suffix)
    #[serde(default)]
    pub supabase_url: String,

    /// Service role key used for both the `apikey` and bearer headers
    #[serde(default)]
    pub supabase_service_role_key: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when a request does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    crate::services::recommender::DEFAULT_TOP_N
}

impl Config {
    /// Load configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of `KEY=value` pairs
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars)
            .map_err(|e| AppError::Configuration(format!("Failed to load config: {}", e)))?;
        config.validate()
    }

    fn validate(self) -> AppResult<Self> {
        if self.supabase_url.trim().is_empty() || self.supabase_service_role_key.trim().is_empty()
        {
            return Err(AppError::Configuration(
                "SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set in environment"
                    .to_string(),
            ));
        }
        Ok(self)
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
