//! Candidate/job compatibility scoring for the job board.
//!
//! `MatchScorer` is stateless apart from its weights: it turns one candidate and one job
//! posting into a 0-100 score, the five factor sub-scores behind it, and a short list of
//! recommendations. Missing or malformed inputs degrade to neutral defaults instead of
//! failing, so scoring never returns an error.

mod config;
mod input;
mod recommendations;
mod rules;
pub mod router;
mod taxonomy;


pub use config::{MatchError, MatchWeights};
pub use input::{MatchCandidate, MatchJob, SalaryBounds};
pub use recommendations::{Priority, Recommendation, RecommendationAction, RecommendationKind};
pub use router::{matching_router, RankRequest, ScoreRequest};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workflows::domain::{CandidateProfile, JobId, JobPosting};
use input::{normalize_candidate, normalize_job};

/// Per-factor sub-scores, each within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFactors {
    pub skills_match: f64,
    pub experience_match: f64,
    pub location_match: f64,
    pub salary_match: f64,
    pub industry_match: f64,
}

impl MatchFactors {
    /// Weighted sum in `[0, 1]`.
    pub fn weighted(&self, weights: &MatchWeights) -> f64 {
        self.skills_match * weights.skills
            + self.experience_match * weights.experience
            + self.location_match * weights.location
            + self.salary_match * weights.salary
            + self.industry_match * weights.industry
    }
}

/// Outcome of scoring one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
    pub factors: MatchFactors,
    pub recommendations: Vec<Recommendation>,
}

/// A job together with how well it fits a given candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob {
    pub job_id: JobId,
    pub title: String,
    pub result: MatchResult,
}

/// Weighted five-factor scorer.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: MatchWeights,
}

impl MatchScorer {
    pub fn new(weights: MatchWeights) -> Result<Self, MatchError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn score(&self, candidate: &MatchCandidate, job: &MatchJob) -> MatchResult {
        let candidate = normalize_candidate(candidate);
        let job = normalize_job(job);

        let skills = rules::skills_match(&candidate, &job);
        let factors = MatchFactors {
            skills_match: skills.score,
            experience_match: rules::experience_match(
                candidate.experience_years,
                job.experience_floor,
            ),
            location_match: rules::location_match(
                candidate.location.as_deref(),
                job.location.as_deref(),
            ),
            salary_match: rules::salary_match(candidate.salary, job.salary),
            industry_match: rules::industry_match(
                candidate.industry.as_deref(),
                job.industry.as_deref(),
            ),
        };

        let score = to_percentage(factors.weighted(&self.weights));
        let recommendations = recommendations::recommend(&factors, &skills, &job);

        debug!(
            score,
            skills = factors.skills_match,
            experience = factors.experience_match,
            location = factors.location_match,
            salary = factors.salary_match,
            industry = factors.industry_match,
            "scored candidate against job"
        );

        MatchResult {
            score,
            factors,
            recommendations,
        }
    }

    pub fn score_profile(&self, candidate: &CandidateProfile, job: &JobPosting) -> MatchResult {
        self.score(&MatchCandidate::from(candidate), &MatchJob::from(job))
    }

    /// Score every posting for a candidate, best fit first (ties broken by job id).
    pub fn rank<'a, I>(&self, candidate: &CandidateProfile, jobs: I) -> Vec<RankedJob>
    where
        I: IntoIterator<Item = &'a JobPosting>,
    {
        let candidate_input = MatchCandidate::from(candidate);
        let mut ranked: Vec<RankedJob> = jobs
            .into_iter()
            .map(|job| RankedJob {
                job_id: job.id.clone(),
                title: job.title.clone(),
                result: self.score(&candidate_input, &MatchJob::from(job)),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.result
                .score
                .cmp(&a.result.score)
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        ranked
    }
}

fn to_percentage(weighted: f64) -> u8 {
    if !weighted.is_finite() {
        return 0;
    }
    (weighted * 100.0).round().clamp(0.0, 100.0) as u8
}
