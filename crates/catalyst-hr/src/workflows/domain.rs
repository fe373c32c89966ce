use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for candidates tracked on the board.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable key of a pipeline stage (`screening`, `offer`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(pub String);

impl StageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn blank() -> Self {
        Self(String::new())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validation failures raised while building domain records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("salary range minimum {min} exceeds maximum {max}")]
    InvalidSalaryRange { min: u64, max: u64 },
    #[error("unknown job status '{0}'")]
    UnknownJobStatus(String),
}

/// Monthly salary band. A missing maximum means "open ended".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSalaryRange")]
pub struct SalaryRange {
    pub min: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

#[derive(Deserialize)]
struct RawSalaryRange {
    #[serde(default)]
    min: u64,
    #[serde(default)]
    max: Option<u64>,
}

impl TryFrom<RawSalaryRange> for SalaryRange {
    type Error = DomainError;

    fn try_from(raw: RawSalaryRange) -> Result<Self, Self::Error> {
        SalaryRange::new(raw.min, raw.max)
    }
}

impl SalaryRange {
    pub fn new(min: u64, max: Option<u64>) -> Result<Self, DomainError> {
        match max {
            Some(max) if min > max => Err(DomainError::InvalidSalaryRange { min, max }),
            _ => Ok(Self { min, max }),
        }
    }
}

/// Seniority labels used by job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Trainee,
    Junior,
    SemiSenior,
    Senior,
    Lead,
    Architect,
}

impl ExperienceLevel {
    /// Minimum years of experience the level expects.
    pub const fn floor_years(self) -> u8 {
        match self {
            Self::Trainee => 0,
            Self::Junior => 1,
            Self::SemiSenior => 3,
            Self::Senior => 5,
            Self::Lead => 8,
            Self::Architect => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trainee => "Trainee",
            Self::Junior => "Junior",
            Self::SemiSenior => "Semi-Senior",
            Self::Senior => "Senior",
            Self::Lead => "Lead",
            Self::Architect => "Architect",
        }
    }

    /// Case-insensitive lookup; `None` for labels outside the table.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trainee" | "intern" => Some(Self::Trainee),
            "junior" => Some(Self::Junior),
            "semi-senior" | "semisenior" | "semi_senior" | "semi senior" | "mid" => {
                Some(Self::SemiSenior)
            }
            "senior" => Some(Self::Senior),
            "lead" => Some(Self::Lead),
            "architect" | "lead/architect" => Some(Self::Architect),
            _ => None,
        }
    }
}

/// Unknown levels are kept as `None` so matching falls back to a zero-year floor.
fn lenient_experience_level<'de, D>(deserializer: D) -> Result<Option<ExperienceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ExperienceLevel::parse))
}

/// Publication status of a posting, validated when records are ingested.
///
/// Serde and [`FromStr`] share one parser, so ingestion is case-insensitive either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum JobStatus {
    Draft,
    PendingApproval,
    #[default]
    Active,
    Paused,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }

    pub const fn accepts_applications(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending_approval" => Ok(Self::PendingApproval),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "closed" => Ok(Self::Closed),
            other => Err(DomainError::UnknownJobStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Append-only recruiter note attached to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateNote {
    pub author: String,
    pub date: DateTime<Utc>,
    pub text: String,
}

/// Job seeker tracked by the hiring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: CandidateId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub preferred_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub industry: String,
    #[serde(default = "StageId::blank")]
    pub stage: StageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Vec<CandidateNote>,
}

impl CandidateProfile {
    /// Fresh applicant with no stage yet; the engine assigns the initial stage on registration.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CandidateId(id.into()),
            name: name.into(),
            skills: Vec::new(),
            experience_years: 0.0,
            preferred_location: String::new(),
            salary_range: None,
            industry: String::new(),
            stage: StageId::blank(),
            applied_on: None,
            notes: Vec::new(),
        }
    }
}

/// Open position as published on the job board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: JobId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_experience_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub status: JobStatus,
}
