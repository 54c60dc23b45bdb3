use std::time::Duration;

use crate::generator::DEFAULT_CODE_LENGTH;
use crate::utils::{get_env, get_env_or};
use crate::validation::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};

pub const MEMORY_DATABASE_URL: &str = "memory://";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_GENERATION_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub server_address: String,
    pub max_connections: u32,
    pub store_timeout: Duration,
    pub generation_attempts: usize,
    pub code_length: usize,
}

impl Config {
    pub fn new(database_url: String, server_address: String) -> Config {
        Config {
            database_url,
            server_address,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            generation_attempts: DEFAULT_GENERATION_ATTEMPTS,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    pub fn from_env() -> Result<Config, String> {
        let mut config = Config::new(get_env("DATABASE_URL")?, get_env("SERVER_ADDRESS")?);
        config.max_connections = get_env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        config.store_timeout =
            Duration::from_millis(get_env_or("STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS));
        config.generation_attempts =
            get_env_or("CODE_GENERATION_ATTEMPTS", DEFAULT_GENERATION_ATTEMPTS).max(1);

        let code_length = get_env_or("CODE_LENGTH", DEFAULT_CODE_LENGTH);
        config.code_length = if (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code_length) {
            code_length
        } else {
            tracing::warn!(
                "CODE_LENGTH must be between {} and {}, using {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                DEFAULT_CODE_LENGTH
            );
            DEFAULT_CODE_LENGTH
        };
        Ok(config)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_DATABASE_URL)
    }
}
