use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::workflows::domain::StageId;

/// Stage every `reject` call routes to.
pub const REJECTED_STAGE: &str = "rejected";

/// Named, ordered slot in the hiring process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub id: StageId,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub color: String,
    /// Sequential advancement stops here; drag/drop may still move candidates out.
    #[serde(default)]
    pub terminal: bool,
}

impl PipelineStage {
    pub fn new(id: &str, name: &str, order: i32, color: &str) -> Self {
        Self {
            id: StageId::from(id),
            name: name.to_string(),
            order,
            color: color.to_string(),
            terminal: false,
        }
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }
}

/// Reasons a stage list cannot become the active catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one stage")]
    Empty,
    #[error("stage order {0} is used more than once")]
    DuplicateOrder(i32),
    #[error("stage id '{0}' is used more than once")]
    DuplicateStage(StageId),
    #[error("stage ids must not be blank")]
    BlankStageId,
}

/// Validated stage list: non-empty, unique ids, unique `order`, sorted by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PipelineStage>", into = "Vec<PipelineStage>")]
pub struct StageCatalog {
    stages: Vec<PipelineStage>,
}

impl StageCatalog {
    pub fn new(mut stages: Vec<PipelineStage>) -> Result<Self, CatalogError> {
        if stages.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut orders = HashSet::new();
        let mut ids = HashSet::new();
        for stage in &stages {
            if stage.id.is_blank() {
                return Err(CatalogError::BlankStageId);
            }
            if !orders.insert(stage.order) {
                return Err(CatalogError::DuplicateOrder(stage.order));
            }
            if !ids.insert(stage.id.clone()) {
                return Err(CatalogError::DuplicateStage(stage.id.clone()));
            }
        }

        stages.sort_by_key(|stage| stage.order);
        Ok(Self { stages })
    }

    /// Default recruiting funnel seeded for new workspaces.
    pub fn standard() -> Self {
        Self {
            stages: vec![
                PipelineStage::new("new", "New Applications", 0, "#6c757d"),
                PipelineStage::new("screening", "Screening", 1, "#0d6efd"),
                PipelineStage::new("phone_interview", "Phone Interview", 2, "#6610f2"),
                PipelineStage::new("technical", "Technical Interview", 3, "#fd7e14"),
                PipelineStage::new("final_interview", "Final Interview", 4, "#20c997"),
                PipelineStage::new("offer", "Offer", 5, "#ffc107"),
                PipelineStage::new("hired", "Hired", 6, "#198754").terminal(),
                PipelineStage::new(REJECTED_STAGE, "Rejected", 7, "#dc3545").terminal(),
            ],
        }
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// Lowest-order stage; new and orphaned candidates land here.
    pub fn initial(&self) -> &PipelineStage {
        // Non-empty by construction.
        &self.stages[0]
    }

    pub fn get(&self, id: &StageId) -> Option<&PipelineStage> {
        self.stages.iter().find(|stage| &stage.id == id)
    }

    pub fn contains(&self, id: &StageId) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &StageId) -> Option<usize> {
        self.stages.iter().position(|stage| &stage.id == id)
    }

    /// Stage following `id` by order, `None` for the last or a terminal stage.
    pub fn next_after(&self, id: &StageId) -> Option<&PipelineStage> {
        let index = self.position(id)?;
        if self.stages[index].terminal {
            return None;
        }
        self.stages.get(index + 1)
    }

    pub fn display_name<'a>(&'a self, id: &'a StageId) -> &'a str {
        self.get(id)
            .map(|stage| stage.name.as_str())
            .unwrap_or(id.as_str())
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<PipelineStage>> for StageCatalog {
    type Error = CatalogError;

    fn try_from(stages: Vec<PipelineStage>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<StageCatalog> for Vec<PipelineStage> {
    fn from(catalog: StageCatalog) -> Self {
        catalog.stages
    }
}
