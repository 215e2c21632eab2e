use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Wire payload for `POST candidates/search`.
///
/// Unset optional fields travel as empty strings, matching what the backend
/// expects from its original consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "minExperience")]
    pub min_experience: u32,
    #[serde(rename = "minDegreeLevel")]
    pub min_degree_level: String,
    pub profile: String,
}

/// Wire payload for `POST query/execute`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(custom(function = validate_not_blank))]
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

fn validate_not_blank(query: &str) -> Result<(), ValidationError> {
    if query.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filters_wire_names() {
        let filters = SearchFilters {
            search_term: "ali".to_string(),
            skills: vec!["SQL".to_string()],
            min_experience: 5,
            min_degree_level: "Bac+5".to_string(),
            profile: String::new(),
        };

        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "searchTerm": "ali",
                "skills": ["SQL"],
                "minExperience": 5,
                "minDegreeLevel": "Bac+5",
                "profile": ""
            })
        );
    }

    #[test]
    fn test_query_request_rejects_blank_text() {
        assert!(QueryRequest::new("").validate().is_err());
        assert!(QueryRequest::new("   \n\t").validate().is_err());
        assert!(QueryRequest::new("SELECT ?name WHERE { }").validate().is_ok());
    }
}
