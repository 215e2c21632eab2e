// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, DatasetStats, Degree, DegreeLevel, Experience, QueryExample, QueryRow, QueryTable,
    Skill, SkillFrequency, SkillKind,
};
pub use requests::{QueryRequest, SearchFilters};
pub use responses::{
    ApiErrorBody, ExamplesResponse, ExecuteResponse, ProfilesResponse, SkillRef, SkillsResponse,
};
