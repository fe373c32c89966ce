//! Integration scenarios for the hiring pipeline, driven through the public engine API and
//! the HTTP router the service mounts.

mod common {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    use serde_json::Value;

    use catalyst_hr::workflows::pipeline::{
        Notification, NotificationSink, RecordStore, RepositoryError,
    };

    /// Shared-handle store so a second engine can hydrate from what the first wrote.
    #[derive(Default, Clone)]
    pub struct SharedStore {
        collections: Arc<Mutex<HashMap<String, BTreeMap<String, Value>>>>,
    }

    impl RecordStore for SharedStore {
        fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
            let guard = self.collections.lock().expect("store mutex poisoned");
            Ok(guard
                .get(collection)
                .and_then(|records| records.get(id).cloned()))
        }

        fn list(&self, collection: &str) -> Result<Vec<Value>, RepositoryError> {
            let guard = self.collections.lock().expect("store mutex poisoned");
            Ok(guard
                .get(collection)
                .map(|records| records.values().cloned().collect())
                .unwrap_or_default())
        }

        fn put(&self, collection: &str, id: &str, record: Value) -> Result<(), RepositoryError> {
            self.collections
                .lock()
                .expect("store mutex poisoned")
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), record);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub struct Toasts {
        pub received: Arc<Mutex<Vec<Notification>>>,
    }

    impl NotificationSink for Toasts {
        fn notify(&self, notification: Notification) {
            self.received
                .lock()
                .expect("toast mutex poisoned")
                .push(notification);
        }
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::json;
use tower::ServiceExt;

use catalyst_hr::workflows::domain::{CandidateId, CandidateProfile, StageId};
use catalyst_hr::workflows::pipeline::{
    pipeline_router, PipelineEngine, PipelineIntent, PipelineStage, StageCatalog,
};
use common::{SharedStore, Toasts};

fn applicant(id: &str, name: &str, applied: (i32, u32, u32)) -> CandidateProfile {
    let mut profile = CandidateProfile::new(id, name);
    profile.applied_on = NaiveDate::from_ymd_opt(applied.0, applied.1, applied.2);
    profile
}

#[test]
fn candidate_walks_the_funnel_and_survives_a_restart() {
    let store = SharedStore::default();
    let toasts = Toasts::default();
    let engine = PipelineEngine::new(
        Arc::new(store.clone()),
        Arc::new(toasts.clone()),
        StageCatalog::standard(),
    );

    engine
        .register(applicant("c-1", "Laura Gómez", (2025, 3, 2)))
        .expect("register");
    engine
        .register(applicant("c-2", "Andrés Pérez", (2025, 2, 14)))
        .expect("register");

    let c1 = CandidateId("c-1".to_string());
    for _ in 0..3 {
        engine
            .dispatch(PipelineIntent::Advance {
                candidate_id: c1.clone(),
            })
            .expect("advance");
    }
    engine
        .dispatch(PipelineIntent::AddNote {
            candidate_id: c1.clone(),
            author: "Recruiter".to_string(),
            text: "Passed the take-home".to_string(),
        })
        .expect("note");
    engine
        .dispatch(PipelineIntent::Reject {
            candidate_id: CandidateId("c-2".to_string()),
        })
        .expect("reject");

    assert_eq!(
        engine.candidate(&c1).expect("known").stage,
        StageId::from("technical")
    );
    assert_eq!(toasts.received.lock().expect("toasts").len(), 5);

    let restarted = PipelineEngine::hydrate(
        Arc::new(store),
        Arc::new(Toasts::default()),
        StageCatalog::standard(),
    )
    .expect("hydrate");
    let restored = restarted.candidate(&c1).expect("restored");
    assert_eq!(restored.stage, StageId::from("technical"));
    assert_eq!(restored.notes.len(), 1);
    assert_eq!(restarted.summary(), engine.summary());
}

#[test]
fn reconfigured_catalog_is_restored_on_hydrate() {
    let store = SharedStore::default();
    let engine = PipelineEngine::new(
        Arc::new(store.clone()),
        Arc::new(Toasts::default()),
        StageCatalog::standard(),
    );
    engine
        .register(applicant("c-1", "Laura Gómez", (2025, 3, 2)))
        .expect("register");
    engine
        .reconfigure_stages(vec![
            PipelineStage::new("applied", "Applied", 10, ""),
            PipelineStage::new("interview", "Interview", 20, ""),
            PipelineStage::new("rejected", "Rejected", 30, "").terminal(),
        ])
        .expect("reconfigure");

    let restarted = PipelineEngine::hydrate(
        Arc::new(store),
        Arc::new(Toasts::default()),
        StageCatalog::standard(),
    )
    .expect("hydrate");
    assert_eq!(restarted.catalog(), engine.catalog());
    assert_eq!(
        restarted
            .candidate(&CandidateId("c-1".to_string()))
            .expect("known")
            .stage,
        StageId::from("applied")
    );
}

#[tokio::test]
async fn summary_route_reflects_intents_posted_over_http() {
    let engine = Arc::new(PipelineEngine::new(
        Arc::new(SharedStore::default()),
        Arc::new(Toasts::default()),
        StageCatalog::standard(),
    ));
    engine
        .register(applicant("c-1", "Laura Gómez", (2025, 3, 2)))
        .expect("register");
    let app = pipeline_router(engine);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/pipeline/intents")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "type": "dropOnStage",
                        "candidateId": "c-1",
                        "targetStageId": "offer"
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/pipeline/summary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    let summary: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(summary["total"], json!(1));
    let offer = summary["stages"]
        .as_array()
        .expect("stages")
        .iter()
        .find(|entry| entry["stageId"] == json!("offer"))
        .cloned()
        .expect("offer entry");
    assert_eq!(offer["count"], json!(1));
}
