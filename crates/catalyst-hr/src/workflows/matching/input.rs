//! Loose scoring inputs and the single normalization pass that fills their defaults.
//!
//! Demo data and half-filled profiles are common, so every field here is optional. The
//! rules in `rules.rs` only ever see the normalized shapes below, never the raw inputs.

use serde::{Deserialize, Serialize};

use crate::workflows::domain::{CandidateProfile, ExperienceLevel, JobPosting, SalaryRange};

/// Multiplier applied to a job's minimum salary when the posting omits a maximum.
const JOB_SALARY_CEILING_FACTOR: f64 = 1.3;

/// Salary bounds as they arrive from forms or stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<SalaryRange> for SalaryBounds {
    fn from(range: SalaryRange) -> Self {
        Self {
            min: Some(range.min as f64),
            max: range.max.map(|max| max as f64),
        }
    }
}

/// Candidate attributes consumed by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchCandidate {
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
    pub preferred_location: Option<String>,
    pub salary_range: Option<SalaryBounds>,
    pub industry: Option<String>,
}

/// Job attributes consumed by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchJob {
    pub required_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<SalaryBounds>,
    pub industry: Option<String>,
}

impl From<&CandidateProfile> for MatchCandidate {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            skills: profile.skills.clone(),
            experience_years: Some(profile.experience_years),
            preferred_location: Some(profile.preferred_location.clone()),
            salary_range: profile.salary_range.map(SalaryBounds::from),
            industry: Some(profile.industry.clone()),
        }
    }
}

impl From<&JobPosting> for MatchJob {
    fn from(job: &JobPosting) -> Self {
        Self {
            required_skills: job.required_skills.clone(),
            experience_level: job.experience_level.map(|level| level.label().to_string()),
            location: Some(job.location.clone()),
            salary_range: job.salary_range.map(SalaryBounds::from),
            industry: Some(job.industry.clone()),
        }
    }
}

/// Closed salary interval; `max` may be `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedCandidate {
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub location: Option<String>,
    pub salary: Option<Interval>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedJob {
    pub required_skills: Vec<String>,
    pub experience_floor: f64,
    pub location: Option<String>,
    pub salary: Option<Interval>,
    pub industry: Option<String>,
}

pub(crate) fn normalize_candidate(candidate: &MatchCandidate) -> NormalizedCandidate {
    let experience_years = candidate
        .experience_years
        .filter(|years| years.is_finite() && *years > 0.0)
        .unwrap_or(0.0);

    NormalizedCandidate {
        skills: normalize_skills(&candidate.skills),
        experience_years,
        location: normalize_text(candidate.preferred_location.as_deref()),
        salary: candidate
            .salary_range
            .and_then(|bounds| normalize_interval(bounds, |_| f64::INFINITY)),
        industry: normalize_text(candidate.industry.as_deref()),
    }
}

pub(crate) fn normalize_job(job: &MatchJob) -> NormalizedJob {
    let experience_floor = job
        .experience_level
        .as_deref()
        .and_then(ExperienceLevel::parse)
        .map(|level| f64::from(level.floor_years()))
        .unwrap_or(0.0);

    NormalizedJob {
        required_skills: normalize_skills(&job.required_skills),
        experience_floor,
        location: normalize_text(job.location.as_deref()),
        salary: job
            .salary_range
            .and_then(|bounds| normalize_interval(bounds, |min| min * JOB_SALARY_CEILING_FACTOR)),
        industry: normalize_text(job.industry.as_deref()),
    }
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim().to_lowercase();
        if !skill.is_empty() && !normalized.contains(&skill) {
            normalized.push(skill);
        }
    }
    normalized
}

/// A range with neither bound is treated as missing; inverted bounds are swapped.
fn normalize_interval(bounds: SalaryBounds, default_max: impl Fn(f64) -> f64) -> Option<Interval> {
    let valid = |value: Option<f64>| value.filter(|amount| amount.is_finite() && *amount >= 0.0);
    let (min, max) = match (valid(bounds.min), valid(bounds.max)) {
        (None, None) => return None,
        (Some(min), None) => (min, default_max(min)),
        (None, Some(max)) => (0.0, max),
        (Some(min), Some(max)) => (min, max),
    };

    if min > max {
        Some(Interval { min: max, max: min })
    } else {
        Some(Interval { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_are_trimmed_lowercased_and_deduplicated() {
        let candidate = MatchCandidate {
            skills: vec![
                " React ".to_string(),
                "react".to_string(),
                "".to_string(),
                "Node.js".to_string(),
            ],
            ..MatchCandidate::default()
        };
        let normalized = normalize_candidate(&candidate);
        assert_eq!(normalized.skills, vec!["react", "node.js"]);
    }

    #[test]
    fn missing_and_invalid_experience_defaults_to_zero() {
        let mut candidate = MatchCandidate::default();
        assert_eq!(normalize_candidate(&candidate).experience_years, 0.0);
        candidate.experience_years = Some(f64::NAN);
        assert_eq!(normalize_candidate(&candidate).experience_years, 0.0);
        candidate.experience_years = Some(-4.0);
        assert_eq!(normalize_candidate(&candidate).experience_years, 0.0);
    }

    #[test]
    fn open_ended_salary_ranges_get_their_documented_ceiling() {
        let candidate = MatchCandidate {
            salary_range: Some(SalaryBounds {
                min: Some(1000.0),
                max: None,
            }),
            ..MatchCandidate::default()
        };
        let job = MatchJob {
            salary_range: Some(SalaryBounds {
                min: Some(1000.0),
                max: None,
            }),
            ..MatchJob::default()
        };

        let candidate_salary = normalize_candidate(&candidate).salary.expect("range kept");
        assert!(candidate_salary.max.is_infinite());
        let job_salary = normalize_job(&job).salary.expect("range kept");
        assert!((job_salary.max - 1300.0).abs() < 1e-9);
    }

    #[test]
    fn empty_bounds_and_blank_text_are_missing() {
        let job = MatchJob {
            location: Some("   ".to_string()),
            salary_range: Some(SalaryBounds::default()),
            experience_level: Some("galactic".to_string()),
            ..MatchJob::default()
        };
        let normalized = normalize_job(&job);
        assert_eq!(normalized.location, None);
        assert_eq!(normalized.salary, None);
        assert_eq!(normalized.experience_floor, 0.0);
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let job = MatchJob {
            salary_range: Some(SalaryBounds {
                min: Some(5000.0),
                max: Some(3000.0),
            }),
            ..MatchJob::default()
        };
        let salary = normalize_job(&job).salary.expect("range kept");
        assert_eq!(salary, Interval { min: 3000.0, max: 5000.0 });
    }
}
