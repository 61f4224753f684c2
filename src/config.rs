use config_rs::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl Config {
    /// Reject values that deserialize fine but cannot be served with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagination.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not ask for one (default: 20)
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for `page_size` requested by clients (default: 100)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl PaginationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 || self.default_page_size == 0 {
            return Err(ConfigError::Message(
                "pagination page sizes must be at least 1".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Message(format!(
                "pagination.default_page_size ({}) exceeds pagination.max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

const fn default_page_size() -> u64 {
    20
}

const fn default_max_page_size() -> u64 {
    100
}
