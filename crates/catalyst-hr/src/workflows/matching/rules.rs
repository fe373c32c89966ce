use super::input::{Interval, NormalizedCandidate, NormalizedJob};
use super::taxonomy::{categories_for, industries_related};

const EMPTY_REQUIREMENTS_SCORE: f64 = 0.7;
const EMPTY_SKILLS_SCORE: f64 = 0.1;
const RELATED_SKILL_CREDIT: f64 = 0.3;

const OVERQUALIFIED_SLACK_YEARS: f64 = 2.0;
const OVERQUALIFIED_SCORE: f64 = 0.8;
const UNDERQUALIFIED_STEP: f64 = 0.2;
const SCORE_FLOOR: f64 = 0.1;

const MISSING_LOCATION_SCORE: f64 = 0.5;
const SAME_COUNTRY_SCORE: f64 = 0.8;
const DISTANT_LOCATION_SCORE: f64 = 0.3;
const REMOTE_TOKENS: [&str; 2] = ["remote", "remoto"];
const COUNTRY_TOKENS: [&str; 1] = ["colombia"];

const MISSING_SALARY_SCORE: f64 = 0.7;
const DISJOINT_SALARY_SCORE: f64 = 0.1;

const MISSING_INDUSTRY_SCORE: f64 = 0.7;
const RELATED_INDUSTRY_SCORE: f64 = 0.8;
const UNRELATED_INDUSTRY_SCORE: f64 = 0.4;

/// Skill comparison detail kept around so recommendations can name the gaps.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SkillBreakdown {
    pub score: f64,
    pub matched: Vec<String>,
    pub related: Vec<String>,
    pub missing: Vec<String>,
}

pub(crate) fn skills_match(candidate: &NormalizedCandidate, job: &NormalizedJob) -> SkillBreakdown {
    // An empty requirement list wins over an empty candidate skill list.
    if job.required_skills.is_empty() {
        return SkillBreakdown {
            score: EMPTY_REQUIREMENTS_SCORE,
            matched: Vec::new(),
            related: Vec::new(),
            missing: Vec::new(),
        };
    }

    if candidate.skills.is_empty() {
        return SkillBreakdown {
            score: EMPTY_SKILLS_SCORE,
            matched: Vec::new(),
            related: Vec::new(),
            missing: job.required_skills.clone(),
        };
    }

    let mut matched = Vec::new();
    let mut related = Vec::new();
    let mut missing = Vec::new();

    for required in &job.required_skills {
        if candidate.skills.contains(required) {
            matched.push(required.clone());
        } else if has_related_skill(&candidate.skills, required) {
            related.push(required.clone());
        } else {
            missing.push(required.clone());
        }
    }

    let required = job.required_skills.len() as f64;
    let score = (matched.len() as f64 / required
        + RELATED_SKILL_CREDIT * related.len() as f64 / required)
        .min(1.0);

    SkillBreakdown {
        score,
        matched,
        related,
        missing,
    }
}

fn has_related_skill(candidate_skills: &[String], required: &str) -> bool {
    categories_for(required).any(|category| {
        candidate_skills
            .iter()
            .any(|skill| skill != required && category.contains(skill))
    })
}

pub(crate) fn experience_match(candidate_years: f64, floor_years: f64) -> f64 {
    if candidate_years >= floor_years {
        if candidate_years - floor_years <= OVERQUALIFIED_SLACK_YEARS {
            1.0
        } else {
            OVERQUALIFIED_SCORE
        }
    } else {
        let gap = floor_years - candidate_years;
        (1.0 - UNDERQUALIFIED_STEP * gap).max(SCORE_FLOOR)
    }
}

pub(crate) fn location_match(candidate: Option<&str>, job: Option<&str>) -> f64 {
    let (candidate, job) = match (candidate, job) {
        (Some(candidate), Some(job)) => (candidate, job),
        _ => return MISSING_LOCATION_SCORE,
    };

    let is_remote = |location: &str| REMOTE_TOKENS.iter().any(|token| location.contains(token));
    if is_remote(candidate) || is_remote(job) {
        return 1.0;
    }

    if candidate.contains(job) || job.contains(candidate) {
        return 1.0;
    }

    if COUNTRY_TOKENS
        .iter()
        .any(|country| candidate.contains(country) && job.contains(country))
    {
        return SAME_COUNTRY_SCORE;
    }

    DISTANT_LOCATION_SCORE
}

pub(crate) fn salary_match(candidate: Option<Interval>, job: Option<Interval>) -> f64 {
    let (candidate, job) = match (candidate, job) {
        (Some(candidate), Some(job)) => (candidate, job),
        _ => return MISSING_SALARY_SCORE,
    };

    let low = candidate.min.max(job.min);
    let high = candidate.max.min(job.max);
    if high < low {
        return DISJOINT_SALARY_SCORE;
    }

    let overlap = high - low;
    let desired = candidate.width();
    if overlap > 0.0 {
        if desired.is_infinite() {
            1.0
        } else {
            (overlap / desired).min(1.0)
        }
    } else if desired == 0.0 {
        // A single desired figure sitting inside the offered band.
        1.0
    } else {
        DISJOINT_SALARY_SCORE
    }
}

pub(crate) fn industry_match(candidate: Option<&str>, job: Option<&str>) -> f64 {
    match (candidate, job) {
        (Some(candidate), Some(job)) if candidate == job => 1.0,
        (Some(candidate), Some(job)) if industries_related(candidate, job) => {
            RELATED_INDUSTRY_SCORE
        }
        (Some(_), Some(_)) => UNRELATED_INDUSTRY_SCORE,
        _ => MISSING_INDUSTRY_SCORE,
    }
}
