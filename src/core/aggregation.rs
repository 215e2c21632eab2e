use std::collections::BTreeMap;

use crate::models::{Candidate, DatasetStats, DegreeLevel};

/// Label for candidates that carry no profile.
pub const UNDEFINED_PROFILE: &str = "Undefined";

/// Fixed experience bands, half-open on the upper bound (a candidate with
/// exactly 2 years falls in "2-5").
pub const EXPERIENCE_BANDS: [&str; 4] = ["0-2", "2-5", "5-8", "8+"];

/// A labeled count/percentage pair, ready for chart rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationBucket {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// Natural-language takeaways derived from the distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub top_skill: Option<String>,
    pub top_profile: Option<String>,
    pub average_experience: String,
}

/// The four chart-ready distributions plus insight strings.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationReport {
    pub skill_frequency: Vec<AggregationBucket>,
    pub profile_distribution: Vec<AggregationBucket>,
    pub experience_bands: Vec<AggregationBucket>,
    pub degree_levels: Vec<AggregationBucket>,
    pub insights: Insights,
}

/// Derive all distributions from the backend statistics and the currently
/// loaded candidate list.
///
/// Skill frequency comes from the backend's global ranking, never from the
/// in-hand list, which may be a filtered subset of the population. Every
/// percentage divides by the global candidate total for the same reason;
/// with a filtered list the shown percentages deliberately sum below 100.
pub fn aggregate(stats: &DatasetStats, candidates: &[Candidate]) -> AggregationReport {
    let total = stats.total_candidates;

    let skill_frequency = skill_frequency(stats);
    let profile_distribution = profile_distribution(candidates, total);
    let experience_bands = experience_bands(candidates, total);
    let degree_levels = degree_levels(candidates, total);

    let insights = Insights {
        top_skill: skill_frequency.first().map(|b| {
            format!(
                "{} is the most in-demand skill, held by {} candidates ({}%)",
                b.label, b.count, b.percentage
            )
        }),
        top_profile: top_bucket(&profile_distribution).map(|b| {
            format!(
                "The most represented profile is \"{}\" with {} candidate(s)",
                b.label, b.count
            )
        }),
        average_experience: format!(
            "Average experience across the pool is {} years",
            stats.average_experience
        ),
    };

    AggregationReport {
        skill_frequency,
        profile_distribution,
        experience_bands,
        degree_levels,
        insights,
    }
}

/// Band membership for a candidate's years of experience.
pub fn experience_band(years: u32) -> &'static str {
    match years {
        0..=1 => EXPERIENCE_BANDS[0],
        2..=4 => EXPERIENCE_BANDS[1],
        5..=7 => EXPERIENCE_BANDS[2],
        _ => EXPERIENCE_BANDS[3],
    }
}

fn skill_frequency(stats: &DatasetStats) -> Vec<AggregationBucket> {
    let mut ranking = stats.most_common_skills.clone();
    // Stable sort keeps the backend's rank for equal counts.
    ranking.sort_by(|a, b| b.count.cmp(&a.count));

    ranking
        .into_iter()
        .map(|entry| AggregationBucket {
            percentage: percentage(entry.count, stats.total_candidates),
            label: entry.skill,
            count: entry.count,
        })
        .collect()
}

fn profile_distribution(candidates: &[Candidate], total: u64) -> Vec<AggregationBucket> {
    // First-seen order; the collection is unordered by contract and the
    // candidate lists involved are small.
    let mut counts: Vec<(String, u64)> = Vec::new();
    for candidate in candidates {
        let label = candidate.profile.as_deref().unwrap_or(UNDEFINED_PROFILE);
        match counts.iter_mut().find(|(name, _)| name == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }

    counts
        .into_iter()
        .map(|(label, count)| AggregationBucket {
            percentage: percentage(count, total),
            label,
            count,
        })
        .collect()
}

fn experience_bands(candidates: &[Candidate], total: u64) -> Vec<AggregationBucket> {
    let mut counts = [0u64; EXPERIENCE_BANDS.len()];
    for candidate in candidates {
        let band = experience_band(candidate.years_of_experience);
        let index = EXPERIENCE_BANDS.iter().position(|b| *b == band).unwrap_or(0);
        counts[index] += 1;
    }

    EXPERIENCE_BANDS
        .iter()
        .zip(counts)
        .map(|(label, count)| AggregationBucket {
            label: (*label).to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

fn degree_levels(candidates: &[Candidate], total: u64) -> Vec<AggregationBucket> {
    // Candidates without a degree are excluded, not bucketed.
    let mut counts: BTreeMap<DegreeLevel, u64> = BTreeMap::new();
    for candidate in candidates {
        if let Some(degree) = &candidate.degree {
            *counts.entry(degree.level).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(level, count)| AggregationBucket {
            label: level.label().to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

fn top_bucket(buckets: &[AggregationBucket]) -> Option<&AggregationBucket> {
    let mut best: Option<&AggregationBucket> = None;
    for bucket in buckets {
        if best.map_or(true, |b| bucket.count > b.count) {
            best = Some(bucket);
        }
    }
    best
}

/// Share of the global population, rounded to one decimal place.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}
