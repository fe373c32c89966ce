use std::io::Write;

use serde::Serialize;

use super::catalog::PipelineStage;
use super::engine::PipelineEngine;
use super::repository::{NotificationSink, RecordStore};
use crate::workflows::domain::{CandidateProfile, StageId};

/// Candidate count for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummaryEntry {
    pub stage_id: StageId,
    pub stage_name: String,
    pub count: usize,
}

/// Per-stage counts in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub stages: Vec<StageSummaryEntry>,
    pub total: usize,
}

/// One board column: a stage and the candidates sitting in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    pub stage: PipelineStage,
    pub candidates: Vec<CandidateProfile>,
}

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write pipeline export: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode pipeline export: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Serialize)]
struct ExportRow<'a> {
    candidate_id: &'a str,
    name: &'a str,
    stage_id: &'a str,
    stage_name: &'a str,
    applied_on: String,
    note_count: usize,
}

const EXPORT_HEADER: [&str; 6] = [
    "candidate_id",
    "name",
    "stage_id",
    "stage_name",
    "applied_on",
    "note_count",
];

impl<S, N> PipelineEngine<S, N>
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    pub fn summary(&self) -> PipelineSummary {
        let columns = self.snapshot();
        let stages: Vec<StageSummaryEntry> = columns
            .into_iter()
            .map(|(stage, candidates)| StageSummaryEntry {
                stage_id: stage.id,
                stage_name: stage.name,
                count: candidates.len(),
            })
            .collect();
        let total = stages.iter().map(|entry| entry.count).sum();
        PipelineSummary { stages, total }
    }

    /// Every stage in catalog order with its candidates sorted as in `candidates_by_stage`.
    pub fn board(&self) -> Vec<BoardColumn> {
        let columns = self.snapshot();
        columns
            .into_iter()
            .map(|(stage, candidates)| BoardColumn { stage, candidates })
            .collect()
    }

    /// Write one CSV row per candidate in board order. Returns the number of rows written.
    pub fn export_board_csv<W: Write>(&self, writer: W) -> Result<usize, ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(EXPORT_HEADER)?;

        let mut rows = 0;
        for column in self.board() {
            for candidate in &column.candidates {
                csv_writer.serialize(ExportRow {
                    candidate_id: &candidate.id.0,
                    name: &candidate.name,
                    stage_id: column.stage.id.as_str(),
                    stage_name: &column.stage.name,
                    applied_on: candidate
                        .applied_on
                        .map(|date| date.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    note_count: candidate.notes.len(),
                })?;
                rows += 1;
            }
        }

        csv_writer.flush()?;
        Ok(rows)
    }
}
