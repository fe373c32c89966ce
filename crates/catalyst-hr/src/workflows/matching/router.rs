use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{MatchCandidate, MatchJob, MatchScorer, MatchWeights};
use crate::workflows::domain::{CandidateProfile, JobPosting};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub candidate: MatchCandidate,
    #[serde(default)]
    pub job: MatchJob,
    /// Per-request override of the scorer's weights.
    #[serde(default)]
    pub weights: Option<MatchWeights>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub candidate: CandidateProfile,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

/// Router builder exposing the scoring endpoints used by the job board.
pub fn matching_router(scorer: Arc<MatchScorer>) -> Router {
    Router::new()
        .route("/api/v1/matching/score", post(score_handler))
        .route("/api/v1/matching/rank", post(rank_handler))
        .with_state(scorer)
}

pub(crate) async fn score_handler(
    State(scorer): State<Arc<MatchScorer>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response {
    let result = match request.weights {
        Some(weights) => match MatchScorer::new(weights) {
            Ok(custom) => custom.score(&request.candidate, &request.job),
            Err(err) => {
                let payload = json!({
                    "error": err.to_string(),
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
        None => scorer.score(&request.candidate, &request.job),
    };
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn rank_handler(
    State(scorer): State<Arc<MatchScorer>>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response {
    let ranked = scorer.rank(&request.candidate, &request.jobs);
    (StatusCode::OK, axum::Json(ranked)).into_response()
}
