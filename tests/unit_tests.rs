// Unit tests for the TalentScope client core

use talent_scope::core::{aggregate, experience_band, EXPERIENCE_BANDS, UNDEFINED_PROFILE};
use talent_scope::models::{
    Candidate, DatasetStats, Degree, DegreeLevel, Skill, SkillFrequency, SkillKind,
};
use talent_scope::{Criteria, CriteriaUpdate};

fn create_candidate(
    id: &str,
    years: u32,
    profile: Option<&str>,
    degree_level: Option<DegreeLevel>,
    skills: &[&str],
) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Candidate {}", id),
        email: format!("{}@example.com", id),
        years_of_experience: years,
        profile: profile.map(str::to_string),
        skills: skills
            .iter()
            .map(|name| Skill {
                name: (*name).to_string(),
                kind: SkillKind::Technical,
            })
            .collect(),
        degree: degree_level.map(|level| Degree {
            name: format!("Degree {}", level),
            level,
            year: Some(2020),
        }),
        experiences: vec![],
    }
}

fn create_stats() -> DatasetStats {
    DatasetStats {
        total_candidates: 10,
        total_skills: 25,
        total_profiles: 5,
        average_experience: 4.2,
        most_common_skills: vec![
            SkillFrequency { skill: "Python".to_string(), count: 6 },
            SkillFrequency { skill: "SQL".to_string(), count: 4 },
            SkillFrequency { skill: "Docker".to_string(), count: 2 },
        ],
    }
}

#[test]
fn test_criteria_toggle_twice_is_identity() {
    let mut criteria = Criteria::default();
    let before = criteria.clone();

    criteria.apply(CriteriaUpdate::ToggleSkill("SQL".to_string()));
    criteria.apply(CriteriaUpdate::ToggleSkill("SQL".to_string()));

    assert_eq!(criteria, before);
}

#[test]
fn test_criteria_clamping_and_reset() {
    let mut criteria = Criteria::default();
    criteria.apply(CriteriaUpdate::MinExperience(99));
    assert_eq!(criteria.min_experience, 10);

    criteria.apply(CriteriaUpdate::SearchTerm("martin".to_string()));
    criteria.apply(CriteriaUpdate::Profile(Some("DevOps".to_string())));
    criteria.reset();

    assert!(criteria.is_unfiltered());
    assert_eq!(criteria.to_filters().min_experience, 0);
}

#[test]
fn test_filters_carry_sorted_unique_skills() {
    let mut criteria = Criteria::default();
    criteria.toggle_skill("SQL");
    criteria.toggle_skill("Python");
    criteria.toggle_skill("SQL");
    criteria.toggle_skill("SQL");

    let filters = criteria.to_filters();
    assert_eq!(filters.skills, vec!["Python", "SQL"]);
}

#[test]
fn test_aggregation_denominator_is_global_total() {
    // 4 loaded candidates against a population of 10.
    let candidates = vec![
        create_candidate("1", 1, Some("Data Scientist"), None, &[]),
        create_candidate("2", 2, Some("Data Scientist"), None, &[]),
        create_candidate("3", 5, Some("DevOps"), None, &[]),
        create_candidate("4", 8, None, None, &[]),
    ];

    let report = aggregate(&create_stats(), &candidates);
    for bucket in &report.profile_distribution {
        assert_eq!(bucket.percentage, bucket.count as f64 * 10.0);
    }

    let shown: f64 = report.profile_distribution.iter().map(|b| b.percentage).sum();
    assert_eq!(shown, 40.0);
}

#[test]
fn test_aggregation_degree_order_independent_of_input_order() {
    let candidates = vec![
        create_candidate("1", 3, None, Some(DegreeLevel::Bac5), &[]),
        create_candidate("2", 3, None, Some(DegreeLevel::Bac2), &[]),
        create_candidate("3", 3, None, Some(DegreeLevel::Bac3), &[]),
    ];

    let report = aggregate(&create_stats(), &candidates);
    let labels: Vec<_> = report.degree_levels.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Bac+2", "Bac+3", "Bac+5"]);
}

#[test]
fn test_aggregation_band_membership_at_boundaries() {
    assert_eq!(experience_band(2), "2-5");
    assert_eq!(experience_band(5), "5-8");
    assert_eq!(experience_band(8), "8+");

    let candidates = vec![create_candidate("1", 2, None, None, &[])];
    let report = aggregate(&create_stats(), &candidates);
    let band = report.experience_bands.iter().find(|b| b.label == "2-5").unwrap();
    assert_eq!(band.count, 1);
    assert_eq!(report.experience_bands.len(), EXPERIENCE_BANDS.len());
}

#[test]
fn test_aggregation_undefined_profile_and_excluded_degrees() {
    let candidates = vec![
        create_candidate("1", 3, None, None, &[]),
        create_candidate("2", 3, Some("DevOps"), Some(DegreeLevel::Bac3), &[]),
    ];

    let report = aggregate(&create_stats(), &candidates);
    assert!(report
        .profile_distribution
        .iter()
        .any(|b| b.label == UNDEFINED_PROFILE && b.count == 1));
    // Only the candidate with a degree contributes to the distribution.
    let degreed: u64 = report.degree_levels.iter().map(|b| b.count).sum();
    assert_eq!(degreed, 1);
}

#[test]
fn test_aggregation_skill_ranking_ignores_loaded_list() {
    // The loaded list has skills the global ranking does not mention; the
    // ranking must stay backend-supplied.
    let candidates = vec![create_candidate("1", 3, None, None, &["Fortran"])];
    let report = aggregate(&create_stats(), &candidates);

    let labels: Vec<_> = report.skill_frequency.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Python", "SQL", "Docker"]);
}

#[test]
fn test_insights_reference_top_buckets() {
    let candidates = vec![
        create_candidate("1", 3, Some("DevOps"), None, &[]),
        create_candidate("2", 3, Some("Data Scientist"), None, &[]),
        create_candidate("3", 3, Some("Data Scientist"), None, &[]),
    ];

    let report = aggregate(&create_stats(), &candidates);
    assert!(report.insights.top_skill.unwrap().contains("Python"));
    assert!(report.insights.top_profile.unwrap().contains("Data Scientist"));
    assert!(report.insights.average_experience.contains("4.2"));
}
