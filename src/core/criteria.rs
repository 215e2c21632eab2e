use std::collections::BTreeSet;

use crate::models::{DegreeLevel, SearchFilters};

/// Upper clamp for the minimum-experience facet (matches the range offered
/// by the filter surface).
pub const MAX_MIN_EXPERIENCE: u32 = 10;

/// The user's current search intent across all facets.
///
/// A single authoritative value owned by the search orchestrator; consumers
/// only ever see clones inside published snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search_term: String,
    pub required_skills: BTreeSet<String>,
    pub min_experience: u32,
    pub min_degree_level: Option<DegreeLevel>,
    pub profile: Option<String>,
}

/// A single typed facet mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaUpdate {
    SearchTerm(String),
    MinExperience(u32),
    MinDegreeLevel(Option<DegreeLevel>),
    Profile(Option<String>),
    ToggleSkill(String),
}

impl Criteria {
    /// Apply one facet mutation, normalizing the value where needed.
    pub fn apply(&mut self, update: CriteriaUpdate) {
        match update {
            CriteriaUpdate::SearchTerm(term) => self.search_term = term,
            CriteriaUpdate::MinExperience(years) => {
                self.min_experience = years.min(MAX_MIN_EXPERIENCE);
            }
            CriteriaUpdate::MinDegreeLevel(level) => self.min_degree_level = level,
            CriteriaUpdate::Profile(profile) => {
                self.profile = profile.filter(|p| !p.is_empty());
            }
            CriteriaUpdate::ToggleSkill(name) => self.toggle_skill(name),
        }
    }

    /// Symmetric-difference update: removes the skill if present, adds it
    /// otherwise. Applying the same name twice is a no-op.
    pub fn toggle_skill(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.required_skills.remove(&name) {
            self.required_skills.insert(name);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no facet constrains the result set.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_empty()
            && self.required_skills.is_empty()
            && self.min_experience == 0
            && self.min_degree_level.is_none()
            && self.profile.is_none()
    }

    /// Convert to the wire payload for `POST candidates/search`.
    pub fn to_filters(&self) -> SearchFilters {
        SearchFilters {
            search_term: self.search_term.clone(),
            skills: self.required_skills.iter().cloned().collect(),
            min_experience: self.min_experience,
            min_degree_level: self
                .min_degree_level
                .map(|l| l.label().to_string())
                .unwrap_or_default(),
            profile: self.profile.clone().unwrap_or_default(),
        }
    }
}
