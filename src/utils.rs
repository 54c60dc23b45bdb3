use std::env;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::timeout;

use crate::error::StoreError;

/// Bounds a store call; an elapsed deadline surfaces as `Unavailable`.
pub async fn with_timeout<F, T>(duration: Duration, task: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    timeout(duration, task).await.unwrap_or_else(|elapsed| {
        tracing::error!("Store call timed out after {:?}: {}", duration, elapsed);
        Err(StoreError::Unavailable(format!(
            "timed out after {}ms",
            duration.as_millis()
        )))
    })
}

pub fn get_env(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("Environment variable {} is required", name))
}

/// Reads an optional variable, falling back to `default` when it is absent or unparsable.
pub fn get_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", name, value, default);
            default
        }),
        Err(_) => default,
    }
}
