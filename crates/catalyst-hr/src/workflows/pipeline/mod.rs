//! Kanban-style hiring pipeline.
//!
//! `PipelineEngine` owns the configurable stage catalog and each candidate's current stage.
//! It hydrates from a [`RecordStore`], writes every mutation back through it, publishes
//! [`StageChanged`] events to subscribers, and reports the result of every board intent to
//! a [`NotificationSink`].

pub mod catalog;
pub mod dragdrop;
pub mod engine;
pub mod intents;
pub mod report;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, PipelineStage, StageCatalog, REJECTED_STAGE};
pub use dragdrop::{insertion_index, CardBounds};
pub use engine::{PipelineEngine, PipelineError, StageChanged};
pub use intents::{IntentOutcome, PipelineIntent};
pub use report::{BoardColumn, ExportError, PipelineSummary, StageSummaryEntry};
pub use repository::{
    Notification, NotificationLevel, NotificationSink, RecordStore, RepositoryError,
    CANDIDATES_COLLECTION, CATALOG_RECORD, PIPELINE_COLLECTION,
};
pub use router::{pipeline_router, status_for};
