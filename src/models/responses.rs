use serde::{Deserialize, Serialize};

use crate::models::domain::{QueryExample, QueryRow, QueryTable};

/// One entry of the skill catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// Response for `GET skills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsResponse {
    #[serde(default)]
    pub technical: Vec<SkillRef>,
    #[serde(default)]
    pub soft: Vec<SkillRef>,
}

/// Response for `GET profiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilesResponse {
    #[serde(default)]
    pub profiles: Vec<String>,
}

/// Response for `GET query/examples`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplesResponse {
    #[serde(default)]
    pub examples: Vec<QueryExample>,
}

/// Success envelope for `POST query/execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub results: Vec<QueryRow>,
}

impl ExecuteResponse {
    /// Normalize the envelope into the client-side tabular shape.
    pub fn into_table(self) -> QueryTable {
        QueryTable {
            message: self.message,
            row_count: self.count,
            columns: self.columns,
            rows: self.results,
        }
    }
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
