use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::Settings;
use crate::models::{
    ApiErrorBody, Candidate, DatasetStats, ExamplesResponse, ExecuteResponse, ProfilesResponse,
    QueryExample, QueryRequest, QueryTable, SearchFilters, SkillsResponse,
};

/// Errors that can occur when talking to the candidate backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend-reported query failure; the message is surfaced verbatim.
    #[error("{0}")]
    Query(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the candidate backend
///
/// Covers the whole backend surface:
/// - candidate collection and faceted search
/// - reference data (skills, profiles, stats)
/// - ad-hoc query execution and the example catalog
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a new backend client with a bounded request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.backend.base_url.clone(),
            Duration::from_secs(settings.backend.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(path.to_string()));
        }
        if !response.status().is_success() {
            return Err(BackendError::Api(format!(
                "GET {} returned {}",
                path,
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        serde_json::from_value(json)
            .map_err(|e| BackendError::InvalidResponse(format!("failed to parse {}: {}", path, e)))
    }

    /// Fetch the full, unfiltered candidate collection.
    pub async fn fetch_candidates(&self) -> Result<Vec<Candidate>, BackendError> {
        let candidates: Vec<Candidate> = self.get_json("candidates").await?;
        tracing::debug!("Fetched {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Fetch one candidate by its backend-assigned ID.
    pub async fn candidate_by_id(&self, id: &str) -> Result<Candidate, BackendError> {
        self.get_json(&format!("candidates/{}", id))
            .await
            .map_err(|e| match e {
                BackendError::NotFound(_) => {
                    BackendError::NotFound(format!("candidate {}", id))
                }
                other => other,
            })
    }

    /// Run a faceted search over the candidate collection.
    pub async fn search_candidates(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<Candidate>, BackendError> {
        let url = self.url("candidates/search");
        tracing::debug!("POST {} ({} skill filters)", url, filters.skills.len());

        let response = self.client.post(&url).json(filters).send().await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(format!(
                "Search failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let candidates: Vec<Candidate> = serde_json::from_value(json).map_err(|e| {
            BackendError::InvalidResponse(format!("failed to parse search result: {}", e))
        })?;

        tracing::debug!("Search matched {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Fetch the skill catalog (technical and soft).
    pub async fn fetch_skills(&self) -> Result<SkillsResponse, BackendError> {
        self.get_json("skills").await
    }

    /// Fetch the list of known professional profiles.
    pub async fn fetch_profiles(&self) -> Result<Vec<String>, BackendError> {
        let response: ProfilesResponse = self.get_json("profiles").await?;
        Ok(response.profiles)
    }

    /// Fetch dataset-wide statistics.
    pub async fn fetch_stats(&self) -> Result<DatasetStats, BackendError> {
        self.get_json("stats").await
    }

    /// Fetch the catalog of example queries.
    pub async fn fetch_query_examples(&self) -> Result<Vec<QueryExample>, BackendError> {
        let response: ExamplesResponse = self.get_json("query/examples").await?;
        Ok(response.examples)
    }

    /// Execute a hand-written query and normalize the tabular result.
    ///
    /// Non-2xx responses carry a human-readable `detail` message which is
    /// passed through verbatim as `BackendError::Query`.
    pub async fn execute_query(&self, request: &QueryRequest) -> Result<QueryTable, BackendError> {
        let url = self.url("query/execute");
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(error) => Err(BackendError::Query(error.detail)),
                Err(_) => Err(BackendError::Api(format!("Query failed: {}", status))),
            };
        }

        let json: Value = response.json().await?;
        let envelope: ExecuteResponse = serde_json::from_value(json).map_err(|e| {
            BackendError::InvalidResponse(format!("failed to parse query result: {}", e))
        })?;

        Ok(envelope.into_table())
    }
}
