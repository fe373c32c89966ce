use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::catalog::{CatalogError, PipelineStage, StageCatalog, REJECTED_STAGE};
use super::repository::{
    NotificationSink, RecordStore, RepositoryError, CANDIDATES_COLLECTION, CATALOG_RECORD,
    PIPELINE_COLLECTION,
};
use crate::workflows::domain::{CandidateId, CandidateNote, CandidateProfile, StageId};

/// Emitted whenever a candidate's stage actually changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageChanged {
    pub candidate_id: CandidateId,
    pub from: StageId,
    pub to: StageId,
}

type StageObserver = Box<dyn Fn(&StageChanged) + Send + Sync>;

/// Error raised by pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unknown candidate '{0}'")]
    UnknownCandidate(CandidateId),
    #[error("unknown stage '{0}'")]
    UnknownStage(StageId),
    #[error("candidate '{candidate_id}' cannot advance past stage '{stage}'")]
    NoNextStage {
        candidate_id: CandidateId,
        stage: StageId,
    },
    #[error("invalid stage catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
    #[error("candidate '{0}' is already registered")]
    DuplicateCandidate(CandidateId),
    #[error("note text must not be empty")]
    EmptyNote,
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

#[derive(Debug)]
struct PipelineState {
    catalog: StageCatalog,
    candidates: BTreeMap<CandidateId, CandidateProfile>,
}

/// Owns the stage catalog and every candidate's stage assignment.
///
/// Each mutation holds the write lock across its read-modify-write and the store write,
/// and only commits to memory once the store accepted the change.
pub struct PipelineEngine<S, N> {
    store: Arc<S>,
    sink: Arc<N>,
    state: RwLock<PipelineState>,
    observers: RwLock<Vec<StageObserver>>,
}

impl<S, N> PipelineEngine<S, N>
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    /// Fresh engine with no candidates; nothing is read from the store.
    pub fn new(store: Arc<S>, sink: Arc<N>, catalog: StageCatalog) -> Self {
        Self {
            store,
            sink,
            state: RwLock::new(PipelineState {
                catalog,
                candidates: BTreeMap::new(),
            }),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Load the catalog and candidates from the store.
    ///
    /// `fallback` is used when no catalog has been saved yet. Candidates pointing at a stage
    /// the catalog no longer has are moved to the initial stage and written back.
    pub fn hydrate(
        store: Arc<S>,
        sink: Arc<N>,
        fallback: StageCatalog,
    ) -> Result<Self, PipelineError> {
        let catalog = match store.get(PIPELINE_COLLECTION, CATALOG_RECORD)? {
            Some(raw) => serde_json::from_value::<StageCatalog>(raw).map_err(|err| {
                RepositoryError::Corrupt {
                    collection: PIPELINE_COLLECTION.to_string(),
                    id: CATALOG_RECORD.to_string(),
                    reason: err.to_string(),
                }
            })?,
            None => fallback,
        };

        let mut candidates = BTreeMap::new();
        for raw in store.list(CANDIDATES_COLLECTION)? {
            let mut candidate = decode_candidate(raw)?;
            if !catalog.contains(&candidate.stage) {
                let initial = catalog.initial().id.clone();
                warn!(
                    candidate = %candidate.id,
                    stage = %candidate.stage,
                    initial = %initial,
                    "stored candidate references unknown stage; reassigning"
                );
                candidate.stage = initial;
                store.put(
                    CANDIDATES_COLLECTION,
                    &candidate.id.0,
                    serde_json::to_value(&candidate).map_err(RepositoryError::from)?,
                )?;
            }
            candidates.insert(candidate.id.clone(), candidate);
        }

        info!(
            stages = catalog.stages().len(),
            candidates = candidates.len(),
            "pipeline hydrated from record store"
        );

        Ok(Self {
            store,
            sink,
            state: RwLock::new(PipelineState {
                catalog,
                candidates,
            }),
            observers: RwLock::new(Vec::new()),
        })
    }

    /// Register a callback invoked after every effective stage change.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&StageChanged) + Send + Sync + 'static,
    {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(observer));
    }

    pub(crate) fn sink(&self) -> &N {
        &self.sink
    }

    /// Add a new applicant. A blank or unknown stage is replaced by the initial stage.
    pub fn register(
        &self,
        mut candidate: CandidateProfile,
    ) -> Result<CandidateProfile, PipelineError> {
        let mut state = self.write_state();
        if state.candidates.contains_key(&candidate.id) {
            return Err(PipelineError::DuplicateCandidate(candidate.id));
        }
        if !state.catalog.contains(&candidate.stage) {
            candidate.stage = state.catalog.initial().id.clone();
        }

        self.persist_candidate(&candidate)?;
        info!(candidate = %candidate.id, stage = %candidate.stage, "candidate registered");
        state
            .candidates
            .insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    /// Move a candidate to the next stage by order.
    pub fn advance(&self, candidate_id: &CandidateId) -> Result<StageId, PipelineError> {
        self.advance_with_change(candidate_id).map(|event| event.to)
    }

    pub(crate) fn advance_with_change(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<StageChanged, PipelineError> {
        let event = {
            let mut state = self.write_state();
            let current = state
                .candidates
                .get(candidate_id)
                .ok_or_else(|| PipelineError::UnknownCandidate(candidate_id.clone()))?
                .stage
                .clone();
            let next = state
                .catalog
                .next_after(&current)
                .map(|stage| stage.id.clone())
                .ok_or_else(|| PipelineError::NoNextStage {
                    candidate_id: candidate_id.clone(),
                    stage: current.clone(),
                })?;
            self.move_locked(&mut state, candidate_id, next)?
        };

        self.emit(&event);
        Ok(event)
    }

    /// Move a candidate to any stage, skipping or going backwards as needed.
    ///
    /// Re-applying the current stage succeeds without writing or emitting an event; the
    /// return value is `None` in that case.
    pub fn set_stage(
        &self,
        candidate_id: &CandidateId,
        target: &StageId,
    ) -> Result<Option<StageChanged>, PipelineError> {
        let event = {
            let mut state = self.write_state();
            let current = state
                .candidates
                .get(candidate_id)
                .ok_or_else(|| PipelineError::UnknownCandidate(candidate_id.clone()))?
                .stage
                .clone();
            if !state.catalog.contains(target) {
                return Err(PipelineError::UnknownStage(target.clone()));
            }
            if &current == target {
                debug!(candidate = %candidate_id, stage = %target, "stage unchanged");
                return Ok(None);
            }
            self.move_locked(&mut state, candidate_id, target.clone())?
        };

        self.emit(&event);
        Ok(Some(event))
    }

    /// Shorthand for moving a candidate to the `rejected` stage.
    pub fn reject(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<StageChanged>, PipelineError> {
        self.set_stage(candidate_id, &StageId::from(REJECTED_STAGE))
    }

    /// Replace the catalog; candidates left on removed stages move to the new initial stage.
    ///
    /// Migrated candidates are written before the catalog record. If any of those writes
    /// fails, the candidate records already written are restored and memory is left alone.
    ///
    /// Returns the ids of the migrated candidates.
    pub fn reconfigure_stages(
        &self,
        stages: Vec<PipelineStage>,
    ) -> Result<Vec<CandidateId>, PipelineError> {
        let catalog = StageCatalog::new(stages)?;

        let events = {
            let mut state = self.write_state();
            let initial = catalog.initial().id.clone();
            let migrated: Vec<CandidateProfile> = state
                .candidates
                .values()
                .filter(|candidate| !catalog.contains(&candidate.stage))
                .map(|candidate| CandidateProfile {
                    stage: initial.clone(),
                    ..candidate.clone()
                })
                .collect();

            let record = serde_json::to_value(&catalog).map_err(RepositoryError::from)?;
            let mut written = 0;
            let committed = migrated
                .iter()
                .try_for_each(|candidate| {
                    self.persist_candidate(candidate)?;
                    written += 1;
                    Ok::<(), PipelineError>(())
                })
                .and_then(|()| {
                    self.store
                        .put(PIPELINE_COLLECTION, CATALOG_RECORD, record)
                        .map_err(PipelineError::from)
                });
            if let Err(err) = committed {
                warn!(error = %err, "stage catalog not saved; restoring migrated candidates");
                for candidate in &migrated[..written] {
                    let Some(previous) = state.candidates.get(&candidate.id) else {
                        continue;
                    };
                    if let Err(rollback) = self.persist_candidate(previous) {
                        warn!(
                            candidate = %candidate.id,
                            error = %rollback,
                            "failed to restore candidate record"
                        );
                    }
                }
                return Err(err);
            }

            let mut events = Vec::with_capacity(migrated.len());
            for candidate in migrated {
                if let Some(previous) = state
                    .candidates
                    .insert(candidate.id.clone(), candidate.clone())
                {
                    events.push(StageChanged {
                        candidate_id: candidate.id,
                        from: previous.stage,
                        to: initial.clone(),
                    });
                }
            }
            info!(
                stages = catalog.stages().len(),
                migrated = events.len(),
                "stage catalog reconfigured"
            );
            state.catalog = catalog;
            events
        };

        for event in &events {
            self.emit(event);
        }
        Ok(events.into_iter().map(|event| event.candidate_id).collect())
    }

    /// Prepend a recruiter note to the candidate's history.
    pub fn add_note(
        &self,
        candidate_id: &CandidateId,
        author: &str,
        text: &str,
    ) -> Result<CandidateNote, PipelineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::EmptyNote);
        }

        let mut state = self.write_state();
        let mut candidate = state
            .candidates
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownCandidate(candidate_id.clone()))?;

        let note = CandidateNote {
            author: author.trim().to_string(),
            date: Utc::now(),
            text: text.to_string(),
        };
        candidate.notes.insert(0, note.clone());

        self.persist_candidate(&candidate)?;
        debug!(candidate = %candidate_id, notes = candidate.notes.len(), "note added");
        state.candidates.insert(candidate_id.clone(), candidate);
        Ok(note)
    }

    /// Candidates currently in `stage`, oldest application first (undated last, then by id).
    pub fn candidates_by_stage(
        &self,
        stage: &StageId,
    ) -> Result<Vec<CandidateProfile>, PipelineError> {
        let state = self.read_state();
        if !state.catalog.contains(stage) {
            return Err(PipelineError::UnknownStage(stage.clone()));
        }
        Ok(sorted_in_stage(&state.candidates, stage))
    }

    pub fn candidate(&self, candidate_id: &CandidateId) -> Result<CandidateProfile, PipelineError> {
        self.read_state()
            .candidates
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownCandidate(candidate_id.clone()))
    }

    pub fn catalog(&self) -> StageCatalog {
        self.read_state().catalog.clone()
    }

    /// Stage columns taken under a single read lock.
    pub(crate) fn snapshot(&self) -> Vec<(PipelineStage, Vec<CandidateProfile>)> {
        let state = self.read_state();
        state
            .catalog
            .stages()
            .iter()
            .map(|stage| {
                (
                    stage.clone(),
                    sorted_in_stage(&state.candidates, &stage.id),
                )
            })
            .collect()
    }

    fn move_locked(
        &self,
        state: &mut PipelineState,
        candidate_id: &CandidateId,
        target: StageId,
    ) -> Result<StageChanged, PipelineError> {
        let mut candidate = state
            .candidates
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownCandidate(candidate_id.clone()))?;
        let from = std::mem::replace(&mut candidate.stage, target.clone());

        self.persist_candidate(&candidate)?;
        info!(candidate = %candidate_id, from = %from, to = %target, "candidate stage changed");
        state.candidates.insert(candidate_id.clone(), candidate);

        Ok(StageChanged {
            candidate_id: candidate_id.clone(),
            from,
            to: target,
        })
    }

    fn persist_candidate(&self, candidate: &CandidateProfile) -> Result<(), PipelineError> {
        let record = serde_json::to_value(candidate).map_err(RepositoryError::from)?;
        self.store
            .put(CANDIDATES_COLLECTION, &candidate.id.0, record)
            .map_err(|err| {
                warn!(candidate = %candidate.id, error = %err, "failed to persist candidate");
                PipelineError::Persistence(err)
            })
    }

    fn emit(&self, event: &StageChanged) {
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer(event);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PipelineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PipelineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode_candidate(raw: Value) -> Result<CandidateProfile, RepositoryError> {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<missing id>")
        .to_string();
    serde_json::from_value(raw).map_err(|err| RepositoryError::Corrupt {
        collection: CANDIDATES_COLLECTION.to_string(),
        id,
        reason: err.to_string(),
    })
}

fn sorted_in_stage(
    candidates: &BTreeMap<CandidateId, CandidateProfile>,
    stage: &StageId,
) -> Vec<CandidateProfile> {
    let mut in_stage: Vec<CandidateProfile> = candidates
        .values()
        .filter(|candidate| &candidate.stage == stage)
        .cloned()
        .collect();
    in_stage.sort_by(|a, b| match (a.applied_on, b.applied_on) {
        (Some(left), Some(right)) => left.cmp(&right).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    in_stage
}
