use catalyst_hr::workflows::domain::{
    CandidateProfile, ExperienceLevel, JobId, JobPosting, JobStatus, SalaryRange,
};
use catalyst_hr::workflows::pipeline::{
    Notification, NotificationLevel, NotificationSink, PipelineEngine, RecordStore,
    RepositoryError,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

type Collections = HashMap<String, BTreeMap<String, Value>>;

pub(crate) type ServiceEngine = PipelineEngine<ConfiguredStore, TracingNotificationSink>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock(collections: &Mutex<Collections>) -> Result<MutexGuard<'_, Collections>, RepositoryError> {
    collections
        .lock()
        .map_err(|_| RepositoryError::Unavailable("record store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    collections: Arc<Mutex<Collections>>,
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        let guard = lock(&self.collections)?;
        Ok(guard
            .get(collection)
            .and_then(|records| records.get(id).cloned()))
    }

    fn list(&self, collection: &str) -> Result<Vec<Value>, RepositoryError> {
        let guard = lock(&self.collections)?;
        Ok(guard
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn put(&self, collection: &str, id: &str, record: Value) -> Result<(), RepositoryError> {
        lock(&self.collections)?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }
}

/// Every collection kept in a single JSON document on disk, rewritten on each put.
pub(crate) struct JsonFileRecordStore {
    path: PathBuf,
    collections: Mutex<Collections>,
}

impl JsonFileRecordStore {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let collections = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Collections::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| RepositoryError::Corrupt {
                collection: "*".to_string(),
                id: path.display().to_string(),
                reason: err.to_string(),
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(err) => return Err(unavailable(&path, err)),
        };
        info!(path = %path.display(), collections = collections.len(), "opened json record store");
        Ok(Self {
            path,
            collections: Mutex::new(collections),
        })
    }

    fn flush(&self, collections: &Collections) -> Result<(), RepositoryError> {
        let bytes = serde_json::to_vec_pretty(collections)?;
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, bytes).map_err(|err| unavailable(&staging, err))?;
        std::fs::rename(&staging, &self.path).map_err(|err| unavailable(&self.path, err))
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {}", path.display(), err))
}

impl RecordStore for JsonFileRecordStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        let guard = lock(&self.collections)?;
        Ok(guard
            .get(collection)
            .and_then(|records| records.get(id).cloned()))
    }

    fn list(&self, collection: &str) -> Result<Vec<Value>, RepositoryError> {
        let guard = lock(&self.collections)?;
        Ok(guard
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn put(&self, collection: &str, id: &str, record: Value) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.collections)?;
        let mut next = guard.clone();
        next.entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        self.flush(&next)?;
        *guard = next;
        Ok(())
    }
}

/// Store selected at startup from `APP_STORE_PATH`.
pub(crate) enum ConfiguredStore {
    Memory(InMemoryRecordStore),
    File(JsonFileRecordStore),
}

impl ConfiguredStore {
    pub(crate) fn from_path(path: Option<&Path>) -> Result<Self, RepositoryError> {
        match path {
            Some(path) => JsonFileRecordStore::open(path).map(Self::File),
            None => Ok(Self::Memory(InMemoryRecordStore::default())),
        }
    }
}

impl RecordStore for ConfiguredStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, RepositoryError> {
        match self {
            Self::Memory(store) => store.get(collection, id),
            Self::File(store) => store.get(collection, id),
        }
    }

    fn list(&self, collection: &str) -> Result<Vec<Value>, RepositoryError> {
        match self {
            Self::Memory(store) => store.list(collection),
            Self::File(store) => store.list(collection),
        }
    }

    fn put(&self, collection: &str, id: &str, record: Value) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(store) => store.put(collection, id, record),
            Self::File(store) => store.put(collection, id, record),
        }
    }
}

const NOTIFICATION_HISTORY: usize = 50;

/// Logs every notification and keeps the most recent ones for the demo output.
#[derive(Default, Clone)]
pub(crate) struct TracingNotificationSink {
    history: Arc<Mutex<VecDeque<Notification>>>,
}

impl TracingNotificationSink {
    pub(crate) fn recent(&self) -> Vec<Notification> {
        self.history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => info!(text = %notification.message, "notification"),
            NotificationLevel::Error => warn!(text = %notification.message, "notification"),
        }
        if let Ok(mut history) = self.history.lock() {
            if history.len() == NOTIFICATION_HISTORY {
                history.pop_front();
            }
            history.push_back(notification);
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn applicant(
    id: &str,
    name: &str,
    skills: &[&str],
    years: f64,
    location: &str,
    industry: &str,
    applied_on: (i32, u32, u32),
) -> CandidateProfile {
    let mut profile = CandidateProfile::new(id, name);
    profile.skills = strings(skills);
    profile.experience_years = years;
    profile.preferred_location = location.to_string();
    profile.industry = industry.to_string();
    profile.applied_on = NaiveDate::from_ymd_opt(applied_on.0, applied_on.1, applied_on.2);
    profile
}

/// Applicants loaded into an empty pipeline for demos.
pub(crate) fn demo_candidates() -> Vec<CandidateProfile> {
    let mut laura = applicant(
        "cand-001",
        "Laura Gómez",
        &["React", "Node.js", "TypeScript"],
        3.0,
        "Remoto",
        "technology",
        (2025, 3, 2),
    );
    laura.salary_range = SalaryRange::new(3_000_000, Some(5_000_000)).ok();

    let mut andres = applicant(
        "cand-002",
        "Andrés Pérez",
        &["Python", "SQL", "Pandas"],
        5.0,
        "Bogotá, Colombia",
        "fintech",
        (2025, 2, 14),
    );
    andres.salary_range = SalaryRange::new(6_000_000, None).ok();

    vec![
        laura,
        andres,
        applicant(
            "cand-003",
            "Camila Ruiz",
            &["Flutter", "Kotlin"],
            1.5,
            "Medellín, Colombia",
            "e-commerce",
            (2025, 3, 10),
        ),
        applicant(
            "cand-004",
            "Mateo Díaz",
            &["AWS", "Docker", "Terraform"],
            8.0,
            "Cali, Colombia",
            "technology",
            (2025, 1, 28),
        ),
    ]
}

fn posting(
    id: &str,
    title: &str,
    skills: &[&str],
    level: ExperienceLevel,
    location: &str,
    salary: (u64, u64),
    industry: &str,
) -> JobPosting {
    JobPosting {
        id: JobId(id.to_string()),
        title: title.to_string(),
        required_skills: strings(skills),
        experience_level: Some(level),
        location: location.to_string(),
        salary_range: SalaryRange::new(salary.0, Some(salary.1)).ok(),
        industry: industry.to_string(),
        status: JobStatus::Active,
    }
}

/// Open positions used by the demo and the `match` command.
pub(crate) fn demo_jobs() -> Vec<JobPosting> {
    vec![
        posting(
            "job-101",
            "Full Stack Developer",
            &["React", "Node.js", "SQL"],
            ExperienceLevel::SemiSenior,
            "Remoto",
            (4_000_000, 6_000_000),
            "technology",
        ),
        posting(
            "job-102",
            "Data Analyst",
            &["Python", "SQL", "Power BI"],
            ExperienceLevel::Junior,
            "Bogotá, Colombia",
            (3_500_000, 5_000_000),
            "finance",
        ),
        posting(
            "job-103",
            "Mobile Developer",
            &["Flutter", "Dart", "Firebase"],
            ExperienceLevel::Junior,
            "Medellín, Colombia",
            (3_000_000, 4_500_000),
            "e-commerce",
        ),
        posting(
            "job-104",
            "DevOps Lead",
            &["AWS", "Kubernetes", "Terraform"],
            ExperienceLevel::Lead,
            "Remoto",
            (9_000_000, 12_000_000),
            "technology",
        ),
    ]
}
