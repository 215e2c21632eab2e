use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use validator::Validate;

use crate::models::{QueryExample, QueryRequest, QueryTable};
use crate::services::{BackendClient, BackendError};

/// Backend surface the console needs: the example catalog and execution.
#[async_trait]
pub trait QueryBackend: Send + Sync + 'static {
    async fn examples(&self) -> Result<Vec<QueryExample>, BackendError>;

    async fn execute(&self, request: &QueryRequest) -> Result<QueryTable, BackendError>;
}

#[async_trait]
impl QueryBackend for BackendClient {
    async fn examples(&self) -> Result<Vec<QueryExample>, BackendError> {
        self.fetch_query_examples().await
    }

    async fn execute(&self, request: &QueryRequest) -> Result<QueryTable, BackendError> {
        self.execute_query(request).await
    }
}

/// User-facing console failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// Local rejection; no request was sent.
    #[error("Enter a query before executing")]
    EmptyQuery,

    /// Backend-reported failure, message passed through verbatim.
    #[error("{0}")]
    Execution(String),
}

/// Ad-hoc query console: a raw query buffer, the example catalog, and the
/// last execution outcome.
///
/// Execution takes `&mut self`, so at most one request is in flight at a
/// time and no cross-request reconciliation is needed. A zero-row table is
/// a distinct state from "never executed" (no stored table at all).
pub struct QueryConsole<B: QueryBackend> {
    backend: Arc<B>,
    buffer: String,
    examples: Vec<QueryExample>,
    result: Option<QueryTable>,
    error: Option<ConsoleError>,
}

impl<B: QueryBackend> QueryConsole<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            buffer: String::new(),
            examples: Vec::new(),
            result: None,
            error: None,
        }
    }

    /// Fetch the example catalog once; an empty buffer is preloaded with
    /// the first example's query text.
    pub async fn load_examples(&mut self) -> Result<&[QueryExample], BackendError> {
        if self.examples.is_empty() {
            self.examples = self.backend.examples().await?;
            if self.buffer.is_empty() {
                if let Some(first) = self.examples.first() {
                    self.buffer = first.query.clone();
                }
            }
        }
        Ok(&self.examples)
    }

    /// Overwrite the buffer with an example's query and clear any prior
    /// result or error. Returns false for an out-of-range index.
    pub fn select_example(&mut self, index: usize) -> bool {
        match self.examples.get(index) {
            Some(example) => {
                self.buffer = example.query.clone();
                self.result = None;
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Current buffer contents (also the copy affordance).
    pub fn query_text(&self) -> &str {
        &self.buffer
    }

    pub fn examples(&self) -> &[QueryExample] {
        &self.examples
    }

    /// Execute the current buffer.
    ///
    /// Blank text is rejected locally without a network call, keeping any
    /// prior result visible. A backend failure clears the stored table and
    /// records the reported message verbatim.
    pub async fn execute(&mut self) {
        let request = QueryRequest::new(self.buffer.clone());
        if request.validate().is_err() {
            self.error = Some(ConsoleError::EmptyQuery);
            return;
        }

        self.error = None;
        tracing::debug!("Executing query ({} chars)", request.query.len());

        match self.backend.execute(&request).await {
            Ok(table) => {
                tracing::debug!("Query returned {} rows", table.row_count);
                self.result = Some(table);
            }
            Err(e) => {
                let message = match e {
                    BackendError::Query(message) => message,
                    other => other.to_string(),
                };
                tracing::warn!("Query failed: {}", message);
                self.result = None;
                self.error = Some(ConsoleError::Execution(message));
            }
        }
    }

    /// Last successful result, if any.
    pub fn result(&self) -> Option<&QueryTable> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ConsoleError> {
        self.error.as_ref()
    }

    /// True once some execution has succeeded (even with zero rows).
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Serialize the last successful result's rows as a pretty-printed JSON
    /// document for download. None when there is nothing to export.
    pub fn export_json(&self) -> Option<String> {
        let table = self.result.as_ref()?;
        serde_json::to_string_pretty(&table.rows).ok()
    }
}
