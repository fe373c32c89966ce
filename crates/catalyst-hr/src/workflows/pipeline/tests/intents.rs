use serde_json::json;

use super::common::*;
use crate::workflows::domain::{CandidateId, StageId};
use crate::workflows::pipeline::repository::NotificationLevel;
use crate::workflows::pipeline::{IntentOutcome, PipelineError, PipelineIntent, StageChanged};

fn id(value: &str) -> CandidateId {
    CandidateId(value.to_string())
}

#[test]
fn intents_deserialize_from_board_payloads() {
    let advance: PipelineIntent =
        serde_json::from_value(json!({ "type": "advance", "candidateId": "c-1" }))
            .expect("advance intent");
    assert_eq!(
        advance,
        PipelineIntent::Advance {
            candidate_id: id("c-1")
        }
    );

    let dropped: PipelineIntent = serde_json::from_value(json!({
        "type": "dropOnStage",
        "candidateId": "c-2",
        "targetStageId": "offer"
    }))
    .expect("drop intent");
    assert_eq!(
        dropped,
        PipelineIntent::DropOnStage {
            candidate_id: id("c-2"),
            target_stage_id: StageId::from("offer"),
        }
    );

    let note: PipelineIntent = serde_json::from_value(json!({
        "type": "addNote",
        "candidateId": "c-3",
        "text": "Follow up Friday"
    }))
    .expect("note intent");
    assert_eq!(
        note,
        PipelineIntent::AddNote {
            candidate_id: id("c-3"),
            author: "Recruiter".to_string(),
            text: "Follow up Friday".to_string(),
        }
    );

    assert!(serde_json::from_value::<PipelineIntent>(json!({
        "type": "archive",
        "candidateId": "c-1"
    }))
    .is_err());
}

#[test]
fn every_dispatch_sends_exactly_one_notification() {
    let (engine, _, sink) = seeded_engine();

    engine
        .dispatch(PipelineIntent::Advance {
            candidate_id: id("c-1"),
        })
        .expect("advance");
    engine
        .dispatch(PipelineIntent::AddNote {
            candidate_id: id("c-1"),
            author: "Recruiter".to_string(),
            text: String::new(),
        })
        .expect_err("empty note");
    engine
        .dispatch(PipelineIntent::Reject {
            candidate_id: id("c-2"),
        })
        .expect("reject");
    engine
        .dispatch(PipelineIntent::DropOnStage {
            candidate_id: id("ghost"),
            target_stage_id: StageId::from("offer"),
        })
        .expect_err("unknown candidate");

    let levels: Vec<_> = sink
        .notifications()
        .iter()
        .map(|notification| notification.level)
        .collect();
    assert_eq!(
        levels,
        vec![
            NotificationLevel::Info,
            NotificationLevel::Error,
            NotificationLevel::Info,
            NotificationLevel::Error,
        ]
    );
}

#[test]
fn successful_move_notification_names_candidate_and_stage() {
    let (engine, _, sink) = seeded_engine();

    let outcome = engine
        .dispatch(PipelineIntent::DropOnStage {
            candidate_id: id("c-1"),
            target_stage_id: StageId::from("technical"),
        })
        .expect("drop");
    match outcome {
        IntentOutcome::Moved { stage, change, .. } => {
            assert_eq!(stage, StageId::from("technical"));
            assert_eq!(change.expect("changed").from, StageId::from("new"));
        }
        other => panic!("expected move, got {other:?}"),
    }

    let notifications = sink.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].message,
        "Laura Gómez moved to Technical Interview"
    );
}

#[test]
fn failed_advance_reports_error_notification() {
    let (engine, _, sink) = seeded_engine();
    engine
        .set_stage(&id("c-1"), &StageId::from("hired"))
        .expect("hire");

    let result = engine.dispatch(PipelineIntent::Advance {
        candidate_id: id("c-1"),
    });
    assert!(matches!(result, Err(PipelineError::NoNextStage { .. })));

    let notifications = sink.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert!(notifications[0].message.contains("cannot advance"));
}

#[test]
fn dropping_on_current_stage_still_notifies_once() {
    let (engine, store, sink) = seeded_engine();
    let writes = store.writes();

    let outcome = engine
        .dispatch(PipelineIntent::DropOnStage {
            candidate_id: id("c-3"),
            target_stage_id: StageId::from("new"),
        })
        .expect("same stage");
    assert!(matches!(outcome, IntentOutcome::Moved { change: None, .. }));
    assert_eq!(store.writes(), writes);
    assert_eq!(sink.notifications().len(), 1);
}

#[test]
fn add_note_outcome_carries_the_note() {
    let (engine, _, sink) = seeded_engine();

    let outcome = engine
        .dispatch(PipelineIntent::AddNote {
            candidate_id: id("c-2"),
            author: "Hiring Manager".to_string(),
            text: "Great culture fit".to_string(),
        })
        .expect("note");
    match outcome {
        IntentOutcome::NoteAdded { note, .. } => {
            assert_eq!(note.author, "Hiring Manager");
            assert_eq!(note.text, "Great culture fit");
        }
        other => panic!("expected note, got {other:?}"),
    }
    assert_eq!(sink.notifications()[0].message, "Note added");
}

#[test]
fn advance_outcome_carries_the_applied_change() {
    let (engine, _, _) = seeded_engine();
    engine
        .set_stage(&id("c-2"), &StageId::from("phone_interview"))
        .expect("move");

    let outcome = engine
        .dispatch(PipelineIntent::Advance {
            candidate_id: id("c-2"),
        })
        .expect("advance");
    assert_eq!(
        outcome,
        IntentOutcome::Moved {
            candidate_id: id("c-2"),
            stage: StageId::from("technical"),
            change: Some(StageChanged {
                candidate_id: id("c-2"),
                from: StageId::from("phone_interview"),
                to: StageId::from("technical"),
            }),
        }
    );
}

#[test]
fn reject_outcome_names_the_rejected_stage() {
    let (engine, _, _) = seeded_engine();
    engine.reject(&id("c-3")).expect("first reject");

    let outcome = engine
        .dispatch(PipelineIntent::Reject {
            candidate_id: id("c-3"),
        })
        .expect("reject again");
    assert!(matches!(
        outcome,
        IntentOutcome::Moved { ref stage, change: None, .. } if stage == &StageId::from("rejected")
    ));
}
