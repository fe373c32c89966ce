use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::domain::CandidateProfile;
use crate::workflows::pipeline::repository::{
    Notification, NotificationSink, RecordStore, RepositoryError,
};
use crate::workflows::pipeline::{PipelineEngine, StageCatalog};

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, BTreeMap<String, Value>>>>,
    writes: Arc<Mutex<usize>>,
    failing: Arc<AtomicBool>,
    fail_after: Arc<Mutex<Option<usize>>>,
}

impl MemoryStore {
    /// Make subsequent writes fail with `QuotaExceeded`.
    pub(super) fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Let `allowed` writes through, fail the next one, then accept writes again.
    pub(super) fn fail_once_after(&self, allowed: usize) {
        *self.fail_after.lock().expect("fail counter poisoned") = Some(allowed);
    }

    pub(super) fn writes(&self) -> usize {
        *self.writes.lock().expect("write counter poisoned")
    }

    pub(super) fn record(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .lock()
            .expect("store mutex poisoned")
            .get(collection)
            .and_then(|records| records.get(id).cloned())
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        Ok(self.record(collection, id))
    }

    fn list(&self, collection: &str) -> Result<Vec<Value>, RepositoryError> {
        let guard = self.collections.lock().expect("store mutex poisoned");
        Ok(guard
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn put(&self, collection: &str, id: &str, record: Value) -> Result<(), RepositoryError> {
        let scheduled = {
            let mut fail_after = self.fail_after.lock().expect("fail counter poisoned");
            match *fail_after {
                Some(0) => {
                    *fail_after = None;
                    true
                }
                Some(remaining) => {
                    *fail_after = Some(remaining - 1);
                    false
                }
                None => false,
            }
        };
        if scheduled || self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::QuotaExceeded {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.collections
            .lock()
            .expect("store mutex poisoned")
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        *self.writes.lock().expect("write counter poisoned") += 1;
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn get(&self, _collection: &str, _id: &str) -> Result<Option<Value>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn list(&self, _collection: &str) -> Result<Vec<Value>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn put(&self, _collection: &str, _id: &str, _record: Value) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub(super) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("sink mutex poisoned")
            .clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("sink mutex poisoned")
            .push(notification);
    }
}

pub(super) fn candidate(
    id: &str,
    name: &str,
    applied_on: Option<(i32, u32, u32)>,
) -> CandidateProfile {
    let mut profile = CandidateProfile::new(id, name);
    profile.applied_on = applied_on
        .map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).expect("valid date"));
    profile
}

pub(super) type MemoryEngine = PipelineEngine<MemoryStore, RecordingSink>;

/// Engine on the standard catalog with three registered candidates, all in `new`.
pub(super) fn seeded_engine() -> (Arc<MemoryEngine>, MemoryStore, RecordingSink) {
    let store = MemoryStore::default();
    let sink = RecordingSink::default();
    let engine = PipelineEngine::new(
        Arc::new(store.clone()),
        Arc::new(sink.clone()),
        StageCatalog::standard(),
    );
    for profile in [
        candidate("c-1", "Laura Gómez", Some((2025, 3, 2))),
        candidate("c-2", "Andrés Pérez", Some((2025, 2, 14))),
        candidate("c-3", "Camila Ruiz", None),
    ] {
        engine.register(profile).expect("register seed candidate");
    }
    (Arc::new(engine), store, sink)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
