use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::models::{DatasetStats, QueryExample, SkillsResponse};
use crate::services::backend::{BackendClient, BackendError};

/// Errors that can occur with reference-cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    Miss(String),
}

/// In-process cache for reference data
///
/// Single-tier async cache; values are stored as serialized JSON so one
/// cache holds heterogeneous reference collections.
pub struct ReferenceCache {
    entries: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl ReferenceCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, ttl_secs }
    }

    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(bytes) = self.entries.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::Miss(key.to_string()))
    }

    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {} (ttl {}s)", key, self.ttl_secs);
        Ok(())
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub fn skills() -> String {
        "reference:skills".to_string()
    }

    pub fn profiles() -> String {
        "reference:profiles".to_string()
    }

    pub fn stats() -> String {
        "reference:stats".to_string()
    }

    pub fn examples() -> String {
        "reference:query_examples".to_string()
    }
}

/// Fetch-and-cache access to the backend's reference data
///
/// Skills, profiles, stats and the query-example catalog change rarely;
/// each accessor serves from cache and falls through to the backend on a
/// miss. Cache write failures are logged and non-fatal.
pub struct Catalog {
    backend: Arc<BackendClient>,
    cache: ReferenceCache,
}

impl Catalog {
    pub fn new(backend: Arc<BackendClient>, cache: ReferenceCache) -> Self {
        Self { backend, cache }
    }

    pub async fn skills(&self) -> Result<SkillsResponse, BackendError> {
        let key = CacheKey::skills();
        if let Ok(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let skills = self.backend.fetch_skills().await?;
        self.store(&key, &skills).await;
        Ok(skills)
    }

    pub async fn profiles(&self) -> Result<Vec<String>, BackendError> {
        let key = CacheKey::profiles();
        if let Ok(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let profiles = self.backend.fetch_profiles().await?;
        self.store(&key, &profiles).await;
        Ok(profiles)
    }

    pub async fn stats(&self) -> Result<DatasetStats, BackendError> {
        let key = CacheKey::stats();
        if let Ok(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let stats = self.backend.fetch_stats().await?;
        self.store(&key, &stats).await;
        Ok(stats)
    }

    pub async fn examples(&self) -> Result<Vec<QueryExample>, BackendError> {
        let key = CacheKey::examples();
        if let Ok(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let examples = self.backend.fetch_query_examples().await?;
        self.store(&key, &examples).await;
        Ok(examples)
    }

    /// Drop all cached reference data; the next access refetches.
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
    }
}
