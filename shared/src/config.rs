use dotenv::dotenv;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Cache durations in seconds. 0 disables cache writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Current prices
    pub short: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self { short: 10 }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: String,
    pub listen_addr: String,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub cache_ttls: CacheTtls,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let defaults = CacheTtls::default();
        Ok(Config {
            data_path: std::env::var("DATA_PATH").unwrap_or_else(|_| "../mcp/data".to_string()),
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8888".to_string()),
            database_url: non_empty_var("DATABASE_URL"),
            redis_url: non_empty_var("REDIS_URL"),
            cache_ttls: CacheTtls {
                short: ttl_var("CACHE_TTL_SHORT", defaults.short)?,
            },
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn ttl_var(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_ttl(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_ttl(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        field,
        reason: format!("{raw:?}: {e}"),
    })
}
