use super::common::*;
use crate::workflows::domain::{CandidateId, StageId};

#[test]
fn summary_counts_every_stage_in_catalog_order() {
    let (engine, _, _) = seeded_engine();
    engine
        .set_stage(&CandidateId("c-2".to_string()), &StageId::from("offer"))
        .expect("move");

    let summary = engine.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.stages.len(), 8);
    assert_eq!(summary.stages[0].stage_id, StageId::from("new"));
    assert_eq!(summary.stages[0].count, 2);
    let offer = summary
        .stages
        .iter()
        .find(|entry| entry.stage_id == StageId::from("offer"))
        .expect("offer stage");
    assert_eq!(offer.count, 1);
    assert_eq!(offer.stage_name, "Offer");
}

#[test]
fn board_lists_columns_with_sorted_candidates() {
    let (engine, _, _) = seeded_engine();

    let board = engine.board();
    assert_eq!(board.len(), 8);
    let first: Vec<_> = board[0]
        .candidates
        .iter()
        .map(|candidate| candidate.id.0.as_str())
        .collect();
    assert_eq!(first, vec!["c-2", "c-1", "c-3"]);
    assert!(board[1..].iter().all(|column| column.candidates.is_empty()));
}

#[test]
fn csv_export_writes_header_and_rows_in_board_order() {
    let (engine, _, _) = seeded_engine();
    engine
        .set_stage(&CandidateId("c-1".to_string()), &StageId::from("screening"))
        .expect("move");
    engine
        .add_note(&CandidateId("c-1".to_string()), "Recruiter", "Call back")
        .expect("note");

    let mut buffer = Vec::new();
    let rows = engine.export_board_csv(&mut buffer).expect("export");
    assert_eq!(rows, 3);

    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "candidate_id,name,stage_id,stage_name,applied_on,note_count",
            "c-2,Andrés Pérez,new,New Applications,2025-02-14,0",
            "c-3,Camila Ruiz,new,New Applications,,0",
            "c-1,Laura Gómez,screening,Screening,2025-03-02,1",
        ]
    );
}
