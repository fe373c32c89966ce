use serde::{Deserialize, Serialize};

use super::input::NormalizedJob;
use super::rules::SkillBreakdown;
use super::MatchFactors;

const SKILLS_THRESHOLD: f64 = 0.7;
const EXPERIENCE_THRESHOLD: f64 = 0.6;
const LOCATION_THRESHOLD: f64 = 0.5;
const MAX_LISTED_SKILLS: usize = 3;

/// Improvement hint attached to a match result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub priority: Priority,
    pub action: RecommendationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Skills,
    Experience,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    Training,
    ExploreRoles,
    UpdatePreferences,
}

pub(crate) fn recommend(
    factors: &MatchFactors,
    skills: &SkillBreakdown,
    job: &NormalizedJob,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if factors.skills_match < SKILLS_THRESHOLD {
        let gaps: Vec<&str> = skills
            .missing
            .iter()
            .take(MAX_LISTED_SKILLS)
            .map(String::as_str)
            .collect();
        let message = if gaps.is_empty() {
            "Deepen your experience with the skills this role lists".to_string()
        } else {
            format!("Develop these skills to improve your match: {}", gaps.join(", "))
        };
        recommendations.push(Recommendation {
            kind: RecommendationKind::Skills,
            message,
            priority: Priority::High,
            action: RecommendationAction::Training,
        });
    }

    if factors.experience_match < EXPERIENCE_THRESHOLD {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Experience,
            message: "Consider roles at a lower experience level while you grow into this one"
                .to_string(),
            priority: Priority::Medium,
            action: RecommendationAction::ExploreRoles,
        });
    }

    if factors.location_match < LOCATION_THRESHOLD {
        let message = match &job.location {
            Some(location) => format!("Would you relocate to {location}?"),
            None => "Would you relocate for this role?".to_string(),
        };
        recommendations.push(Recommendation {
            kind: RecommendationKind::Location,
            message,
            priority: Priority::Low,
            action: RecommendationAction::UpdatePreferences,
        });
    }

    recommendations
}
