//! Link creation, resolution and click accounting.
//!
//! [`LinkService`] holds no link state of its own: every call goes through
//! the [`LinkStore`], bounded by the configured store timeout.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DEFAULT_GENERATION_ATTEMPTS, DEFAULT_STORE_TIMEOUT_MS};
use crate::error::{LinkError, StoreError};
use crate::generator::{CodeGenerator, ThreadRngGenerator};
use crate::model::{CreatedLink, Link};
use crate::store::LinkStore;
use crate::utils::with_timeout;
use crate::validation::{requested_code, validate_code, validate_url};

#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    generator: Arc<dyn CodeGenerator>,
    generation_attempts: usize,
    store_timeout: Duration,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        LinkService {
            store,
            generator: Arc::new(ThreadRngGenerator::default()),
            generation_attempts: DEFAULT_GENERATION_ATTEMPTS,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        }
    }

    pub fn from_config(store: Arc<dyn LinkStore>, config: &Config) -> Self {
        Self::new(store)
            .with_generator(Arc::new(ThreadRngGenerator::new(config.code_length)))
            .with_generation_attempts(config.generation_attempts)
            .with_store_timeout(config.store_timeout)
    }

    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_generation_attempts(mut self, attempts: usize) -> Self {
        self.generation_attempts = attempts.max(1);
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Validates and stores a new link. A custom code is used verbatim and is
    /// never retried; generated codes are retried on collision.
    pub async fn create(&self, url: &str, code: Option<&str>) -> Result<CreatedLink, LinkError> {
        validate_url(url)?;

        if let Some(code) = requested_code(code) {
            validate_code(code)?;
            let link = with_timeout(self.store_timeout, self.store.insert(code, url))
                .await
                .map_err(|err| match err {
                    StoreError::Conflict => {
                        tracing::debug!("Requested code {} is already taken", code);
                        LinkError::CodeTaken
                    }
                    err => LinkError::from(err),
                })?;
            tracing::debug!("Created link {} -> {}", link.code, link.url);
            return Ok(link.into());
        }

        for attempt in 1..=self.generation_attempts {
            let candidate = self.generator.generate();
            match with_timeout(self.store_timeout, self.store.insert(&candidate, url)).await {
                Ok(link) => {
                    tracing::debug!("Created link {} -> {}", link.code, link.url);
                    return Ok(link.into());
                }
                Err(StoreError::Conflict) => {
                    tracing::warn!(
                        "Generated code {} collided (attempt {}/{})",
                        candidate,
                        attempt,
                        self.generation_attempts
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        tracing::error!(
            "Could not persist new link. Exhausted all retries of generating a unique code"
        );
        Err(LinkError::CodeSpaceExhausted {
            attempts: self.generation_attempts,
        })
    }

    /// Resolves a code and counts the click, returning the target url.
    pub async fn resolve(&self, code: &str) -> Result<String, LinkError> {
        self.resolve_link(code).await.map(|link| link.url)
    }

    /// Same as [`LinkService::resolve`] but returns the counted link.
    pub async fn resolve_link(&self, code: &str) -> Result<Link, LinkError> {
        let link = with_timeout(self.store_timeout, self.store.resolve_and_count(code)).await?;
        tracing::debug!("Resolved {} ({} clicks)", link.code, link.clicks);
        Ok(link)
    }

    pub async fn stats(&self, code: &str) -> Result<Link, LinkError> {
        Ok(with_timeout(self.store_timeout, self.store.get(code)).await?)
    }

    pub async fn list(&self) -> Result<Vec<Link>, LinkError> {
        Ok(with_timeout(self.store_timeout, self.store.list()).await?)
    }

    /// Deletes a link; reports `NotFound` when the code did not exist.
    pub async fn remove(&self, code: &str) -> Result<(), LinkError> {
        if with_timeout(self.store_timeout, self.store.delete(code)).await? {
            tracing::debug!("Removed link {}", code);
            Ok(())
        } else {
            Err(LinkError::NotFound)
        }
    }
}
