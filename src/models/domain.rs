use std::fmt;

use serde::{Deserialize, Serialize};

/// Academic attainment tiers, ordered from lowest to highest.
///
/// The declaration order drives both filter comparisons and the sort order
/// of the degree-level distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DegreeLevel {
    #[serde(rename = "Bac+2")]
    Bac2,
    #[serde(rename = "Bac+3")]
    Bac3,
    #[serde(rename = "Bac+5")]
    Bac5,
    #[serde(rename = "Doctorat")]
    Doctorat,
}

impl DegreeLevel {
    pub const ALL: [DegreeLevel; 4] = [
        DegreeLevel::Bac2,
        DegreeLevel::Bac3,
        DegreeLevel::Bac5,
        DegreeLevel::Doctorat,
    ];

    /// Wire/display label.
    pub fn label(&self) -> &'static str {
        match self {
            DegreeLevel::Bac2 => "Bac+2",
            DegreeLevel::Bac3 => "Bac+3",
            DegreeLevel::Bac5 => "Bac+5",
            DegreeLevel::Doctorat => "Doctorat",
        }
    }

    /// Comparison rank used by the backend when filtering on a minimum
    /// level (years-of-study scale: 2, 3, 5, 8).
    pub fn rank(&self) -> u8 {
        match self {
            DegreeLevel::Bac2 => 2,
            DegreeLevel::Bac3 => 3,
            DegreeLevel::Bac5 => 5,
            DegreeLevel::Doctorat => 8,
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a skill is a technical or a transversal ("soft") one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Technical,
    Soft,
}

/// A skill held by a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SkillKind,
}

/// A candidate's degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    pub name: String,
    pub level: DegreeLevel,
    #[serde(default)]
    pub year: Option<i32>,
}

/// One professional experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub company: String,
    #[serde(rename = "startYear")]
    pub start_year: i32,
    #[serde(rename = "endYear")]
    pub end_year: i32,
    #[serde(rename = "duration")]
    pub duration_months: u32,
}

/// A job candidate as returned by the backend.
///
/// The `id` is assigned by the backend and opaque to the client; candidates
/// are never mutated here, only replaced wholesale with a new result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "yearsOfExperience")]
    pub years_of_experience: u32,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub degree: Option<Degree>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

impl Candidate {
    /// Names of the candidate's technical skills, in listing order.
    pub fn technical_skills(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .filter(|s| s.kind == SkillKind::Technical)
            .map(|s| s.name.as_str())
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name)
    }
}

/// One entry of the global most-common-skills ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub count: u64,
}

/// Dataset-wide statistics computed by the backend over the full candidate
/// population (never over a filtered subset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_candidates: u64,
    pub total_skills: u64,
    pub total_profiles: u64,
    pub average_experience: f64,
    #[serde(default)]
    pub most_common_skills: Vec<SkillFrequency>,
}

/// A catalog entry the console offers as a ready-made query template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryExample {
    pub name: String,
    pub description: String,
    pub query: String,
}

/// A row of an ad-hoc query result: column name to opaque value.
pub type QueryRow = serde_json::Map<String, serde_json::Value>;

/// Normalized tabular result of a successful ad-hoc query execution.
///
/// The column set is not known ahead of time; rows may omit values for any
/// column, which renderers substitute with a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTable {
    pub message: String,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub rows: Vec<QueryRow>,
}

impl QueryTable {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Value at (row, column), if the row carries one.
    pub fn cell(&self, row: usize, column: &str) -> Option<&serde_json::Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
