use serde::{Deserialize, Serialize};

/// Relative weight of each factor in the composite match score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
    pub industry: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.40,
            experience: 0.25,
            location: 0.15,
            salary: 0.10,
            industry: 0.10,
        }
    }
}

const WEIGHT_TOLERANCE: f64 = 1e-6;

impl MatchWeights {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.location + self.salary + self.industry
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let weights = [
            self.skills,
            self.experience,
            self.location,
            self.salary,
            self.industry,
        ];
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(MatchError::InvalidWeights {
                total: self.total(),
            });
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(MatchError::InvalidWeights { total });
        }

        Ok(())
    }
}

/// Raised only when the scorer itself is misconfigured; scoring never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("match weights must be non-negative and sum to 1.0 (found {total:.4})")]
    InvalidWeights { total: f64 },
}
