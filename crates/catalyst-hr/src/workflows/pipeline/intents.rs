use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::{PipelineStage, REJECTED_STAGE};
use super::engine::{PipelineEngine, PipelineError, StageChanged};
use super::repository::{Notification, NotificationSink, RecordStore};
use crate::workflows::domain::{CandidateId, CandidateNote, CandidateProfile, StageId};

fn default_author() -> String {
    "Recruiter".to_string()
}

/// User actions coming from the pipeline board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineIntent {
    #[serde(rename_all = "camelCase")]
    Advance { candidate_id: CandidateId },
    #[serde(rename_all = "camelCase")]
    DropOnStage {
        candidate_id: CandidateId,
        target_stage_id: StageId,
    },
    #[serde(rename_all = "camelCase")]
    AddNote {
        candidate_id: CandidateId,
        #[serde(default = "default_author")]
        author: String,
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Reject { candidate_id: CandidateId },
}

/// Result of a successfully applied intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum IntentOutcome {
    /// The candidate moved; `change` is absent when it already sat on the target stage.
    Moved {
        #[serde(rename = "candidateId")]
        candidate_id: CandidateId,
        stage: StageId,
        change: Option<StageChanged>,
    },
    NoteAdded {
        #[serde(rename = "candidateId")]
        candidate_id: CandidateId,
        note: CandidateNote,
    },
}

impl<S, N> PipelineEngine<S, N>
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    /// Apply an intent and send exactly one notification describing how it went.
    pub fn dispatch(&self, intent: PipelineIntent) -> Result<IntentOutcome, PipelineError> {
        let outcome = self.apply(intent);
        self.notify_outcome("pipeline intent failed", &outcome, |applied| {
            self.describe(applied)
        });
        outcome
    }

    /// [`register`](Self::register) followed by one notification.
    pub fn register_and_notify(
        &self,
        candidate: CandidateProfile,
    ) -> Result<CandidateProfile, PipelineError> {
        let outcome = self.register(candidate);
        self.notify_outcome("candidate registration failed", &outcome, |registered| {
            let catalog = self.catalog();
            format!(
                "{} added to {}",
                registered.name,
                catalog.display_name(&registered.stage)
            )
        });
        outcome
    }

    /// [`reconfigure_stages`](Self::reconfigure_stages) followed by one notification.
    pub fn reconfigure_and_notify(
        &self,
        stages: Vec<PipelineStage>,
    ) -> Result<Vec<CandidateId>, PipelineError> {
        let outcome = self.reconfigure_stages(stages);
        self.notify_outcome("stage reconfiguration failed", &outcome, |migrated| {
            if migrated.is_empty() {
                return "Pipeline stages updated".to_string();
            }
            let catalog = self.catalog();
            format!(
                "Pipeline stages updated, {} moved to {}",
                migrated.len(),
                catalog.initial().name
            )
        });
        outcome
    }

    fn notify_outcome<T>(
        &self,
        failure: &str,
        outcome: &Result<T, PipelineError>,
        describe: impl FnOnce(&T) -> String,
    ) {
        let notification = match outcome {
            Ok(value) => Notification::info(describe(value)),
            Err(err) => {
                warn!(error = %err, "{}", failure);
                Notification::error(err.to_string())
            }
        };
        self.sink().notify(notification);
    }

    fn apply(&self, intent: PipelineIntent) -> Result<IntentOutcome, PipelineError> {
        match intent {
            PipelineIntent::Advance { candidate_id } => {
                let change = self.advance_with_change(&candidate_id)?;
                Ok(IntentOutcome::Moved {
                    stage: change.to.clone(),
                    change: Some(change),
                    candidate_id,
                })
            }
            PipelineIntent::DropOnStage {
                candidate_id,
                target_stage_id,
            } => {
                let change = self.set_stage(&candidate_id, &target_stage_id)?;
                Ok(IntentOutcome::Moved {
                    candidate_id,
                    stage: target_stage_id,
                    change,
                })
            }
            PipelineIntent::AddNote {
                candidate_id,
                author,
                text,
            } => {
                let note = self.add_note(&candidate_id, &author, &text)?;
                Ok(IntentOutcome::NoteAdded { candidate_id, note })
            }
            PipelineIntent::Reject { candidate_id } => {
                let change = self.reject(&candidate_id)?;
                Ok(IntentOutcome::Moved {
                    candidate_id,
                    stage: StageId::from(REJECTED_STAGE),
                    change,
                })
            }
        }
    }

    fn describe(&self, outcome: &IntentOutcome) -> String {
        match outcome {
            IntentOutcome::Moved {
                candidate_id,
                stage,
                ..
            } => {
                let name = self
                    .candidate(candidate_id)
                    .map(|candidate| candidate.name)
                    .unwrap_or_else(|_| candidate_id.to_string());
                let catalog = self.catalog();
                format!("{name} moved to {}", catalog.display_name(stage))
            }
            IntentOutcome::NoteAdded { .. } => "Note added".to_string(),
        }
    }
}
