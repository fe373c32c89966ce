use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::catalog::PipelineStage;
use super::engine::{PipelineEngine, PipelineError};
use super::intents::PipelineIntent;
use super::repository::{NotificationSink, RecordStore};
use crate::workflows::domain::{CandidateId, CandidateProfile, StageId};

/// Router builder exposing the pipeline board, stage catalog, and intent endpoints.
pub fn pipeline_router<S, N>(engine: Arc<PipelineEngine<S, N>>) -> Router
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/pipeline/stages",
            get(stages_handler::<S, N>).put(reconfigure_handler::<S, N>),
        )
        .route(
            "/api/v1/pipeline/stages/:stage_id/candidates",
            get(stage_candidates_handler::<S, N>),
        )
        .route("/api/v1/pipeline/board", get(board_handler::<S, N>))
        .route("/api/v1/pipeline/summary", get(summary_handler::<S, N>))
        .route(
            "/api/v1/pipeline/candidates",
            post(register_handler::<S, N>),
        )
        .route(
            "/api/v1/pipeline/candidates/:candidate_id",
            get(candidate_handler::<S, N>),
        )
        .route("/api/v1/pipeline/intents", post(intent_handler::<S, N>))
        .with_state(engine)
}

/// HTTP status for a pipeline failure.
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::UnknownCandidate(_) | PipelineError::UnknownStage(_) => {
            StatusCode::NOT_FOUND
        }
        PipelineError::NoNextStage { .. }
        | PipelineError::InvalidCatalog(_)
        | PipelineError::EmptyNote => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::DuplicateCandidate(_) => StatusCode::CONFLICT,
        PipelineError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub(crate) fn error_response(err: &PipelineError) -> Response {
    let payload = json!({
        "error": err.to_string(),
    });
    (status_for(err), axum::Json(payload)).into_response()
}

pub(crate) async fn stages_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    (StatusCode::OK, axum::Json(engine.catalog())).into_response()
}

pub(crate) async fn reconfigure_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
    axum::Json(stages): axum::Json<Vec<PipelineStage>>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    match engine.reconfigure_and_notify(stages) {
        Ok(migrated) => {
            let payload = json!({
                "stages": engine.catalog(),
                "migrated": migrated,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn stage_candidates_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
    Path(stage_id): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    match engine.candidates_by_stage(&StageId::new(stage_id)) {
        Ok(candidates) => (StatusCode::OK, axum::Json(candidates)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn board_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    (StatusCode::OK, axum::Json(engine.board())).into_response()
}

pub(crate) async fn summary_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    (StatusCode::OK, axum::Json(engine.summary())).into_response()
}

pub(crate) async fn register_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
    axum::Json(candidate): axum::Json<CandidateProfile>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    match engine.register_and_notify(candidate) {
        Ok(registered) => (StatusCode::CREATED, axum::Json(registered)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn candidate_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    match engine.candidate(&CandidateId(candidate_id)) {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn intent_handler<S, N>(
    State(engine): State<Arc<PipelineEngine<S, N>>>,
    axum::Json(intent): axum::Json<PipelineIntent>,
) -> Response
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    match engine.dispatch(intent) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(&err),
    }
}
