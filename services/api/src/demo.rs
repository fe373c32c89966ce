use crate::infra::{
    demo_candidates, demo_jobs, ConfiguredStore, InMemoryRecordStore, TracingNotificationSink,
};
use catalyst_hr::config::AppConfig;
use catalyst_hr::error::AppError;
use catalyst_hr::workflows::domain::{CandidateId, CandidateProfile, JobPosting, StageId};
use catalyst_hr::workflows::matching::{MatchScorer, RankedJob};
use catalyst_hr::workflows::pipeline::{
    insertion_index, CardBounds, NotificationLevel, NotificationSink, PipelineEngine,
    PipelineError, PipelineIntent, RecordStore, StageCatalog,
};
use clap::Args;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the job matching portion of the demo.
    #[arg(long)]
    pub(crate) skip_matching: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MatchArgs {
    /// Candidate profile JSON file (defaults to the first demo candidate)
    #[arg(long)]
    pub(crate) candidate: Option<PathBuf>,
    /// JSON array of job postings (defaults to the demo postings)
    #[arg(long)]
    pub(crate) jobs: Option<PathBuf>,
    /// Only print the best N matches
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Print the ranking as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// JSON store to export (defaults to APP_STORE_PATH; the demo seed when unset)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let sink = TracingNotificationSink::default();
    let engine = seeded_engine(Arc::new(InMemoryRecordStore::default()), sink.clone())?;
    let moves = Arc::new(Mutex::new(Vec::new()));
    let recorded = moves.clone();
    engine.subscribe(move |change| {
        if let Ok(mut moves) = recorded.lock() {
            moves.push(change.clone());
        }
    });

    println!("Catalyst HR pipeline demo");
    render_summary(&engine);

    let session = vec![
        PipelineIntent::Advance {
            candidate_id: id("cand-002"),
        },
        PipelineIntent::Advance {
            candidate_id: id("cand-002"),
        },
        PipelineIntent::DropOnStage {
            candidate_id: id("cand-004"),
            target_stage_id: StageId::from("final_interview"),
        },
        PipelineIntent::AddNote {
            candidate_id: id("cand-004"),
            author: "Hiring Manager".to_string(),
            text: "Strong infrastructure background; fast-track".to_string(),
        },
        PipelineIntent::Reject {
            candidate_id: id("cand-003"),
        },
        PipelineIntent::AddNote {
            candidate_id: id("cand-001"),
            author: "Recruiter".to_string(),
            text: "   ".to_string(),
        },
    ];

    println!("\nRecruiter session");
    for intent in session {
        if let Err(err) = engine.dispatch(intent) {
            println!("  Intent failed: {}", err);
        }
    }
    for notification in sink.recent() {
        let marker = match notification.level {
            NotificationLevel::Info => "ok",
            NotificationLevel::Error => "!!",
        };
        println!("  [{}] {}", marker, notification.message);
    }

    println!("\nStage changes observed: {}", moves.lock().map(|m| m.len()).unwrap_or(0));
    render_summary(&engine);

    let column: Vec<CardBounds> = (0..3)
        .map(|index| CardBounds {
            top: f64::from(index) * 120.0,
            height: 110.0,
        })
        .collect();
    println!(
        "\nDrag preview: a card released at y=130 lands at position {} of {}",
        insertion_index(130.0, &column),
        column.len()
    );

    if !args.skip_matching {
        let candidate = engine.candidate(&id("cand-001"))?;
        println!("\nRecommended jobs for {}", candidate.name);
        render_ranking(&MatchScorer::default().rank(&candidate, &demo_jobs()));
    }

    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let candidate = match &args.candidate {
        Some(path) => read_json::<CandidateProfile>(path)?,
        None => demo_candidates()
            .into_iter()
            .next()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no demo candidate"))?,
    };
    let jobs = match &args.jobs {
        Some(path) => read_json::<Vec<JobPosting>>(path)?,
        None => demo_jobs(),
    };

    let mut ranked = MatchScorer::default().rank(&candidate, &jobs);
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&ranked).map_err(std::io::Error::from)?;
        println!("{}", rendered);
    } else {
        println!("Job matches for {} ({})", candidate.name, candidate.id);
        render_ranking(&ranked);
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let store_path = match args.store {
        Some(path) => Some(path),
        None => AppConfig::load()?.storage.store_path,
    };

    let sink = TracingNotificationSink::default();
    let engine = match store_path {
        Some(path) => {
            let store = ConfiguredStore::from_path(Some(&path)).map_err(PipelineError::from)?;
            PipelineEngine::hydrate(Arc::new(store), Arc::new(sink), StageCatalog::standard())?
        }
        None => seeded_engine(
            Arc::new(ConfiguredStore::from_path(None).map_err(PipelineError::from)?),
            sink,
        )?,
    };

    let rows = match args.output {
        Some(path) => {
            let rows = engine.export_board_csv(File::create(&path)?)?;
            eprintln!("Wrote {} candidates to {}", rows, path.display());
            rows
        }
        None => engine.export_board_csv(std::io::stdout().lock())?,
    };
    tracing::debug!(rows, "pipeline export finished");
    Ok(())
}

fn id(value: &str) -> CandidateId {
    CandidateId(value.to_string())
}

fn seeded_engine<S, N>(store: Arc<S>, sink: N) -> Result<PipelineEngine<S, N>, PipelineError>
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    let engine = PipelineEngine::new(store, Arc::new(sink), StageCatalog::standard());
    for candidate in demo_candidates() {
        engine.register(candidate)?;
    }
    Ok(engine)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let value = serde_json::from_reader(reader).map_err(std::io::Error::from)?;
    Ok(value)
}

fn render_summary<S, N>(engine: &PipelineEngine<S, N>)
where
    S: RecordStore + 'static,
    N: NotificationSink + 'static,
{
    let summary = engine.summary();
    println!("\nPipeline ({} candidates)", summary.total);
    for entry in summary.stages.iter().filter(|entry| entry.count > 0) {
        println!("  {:<22} {}", entry.stage_name, entry.count);
    }
}

fn render_ranking(ranked: &[RankedJob]) {
    for entry in ranked {
        println!(
            "  {:>3}%  {} ({})",
            entry.result.score, entry.title, entry.job_id
        );
        for recommendation in &entry.result.recommendations {
            println!("        - {}", recommendation.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_engine_places_demo_candidates_on_the_first_stage() {
        let engine = seeded_engine(
            Arc::new(InMemoryRecordStore::default()),
            TracingNotificationSink::default(),
        )
        .expect("seed");
        let summary = engine.summary();
        assert_eq!(summary.total, demo_candidates().len());
        assert_eq!(summary.stages[0].count, summary.total);
    }

    #[test]
    fn demo_and_match_commands_complete() {
        run_demo(DemoArgs::default()).expect("demo runs");
        run_match(MatchArgs {
            limit: Some(2),
            ..MatchArgs::default()
        })
        .expect("match runs");
    }

    #[test]
    fn export_writes_csv_from_a_json_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store_path = dir.path().join("pipeline.json");
        let output = dir.path().join("board.csv");
        {
            let store = ConfiguredStore::from_path(Some(&store_path)).expect("store");
            seeded_engine(Arc::new(store), TracingNotificationSink::default()).expect("seed");
        }

        run_export(ExportArgs {
            store: Some(store_path),
            output: Some(output.clone()),
        })
        .expect("export");

        let csv = std::fs::read_to_string(output).expect("read csv");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("candidate_id,name,stage_id,stage_name,applied_on,note_count")
        );
        assert_eq!(lines.count(), demo_candidates().len());
    }

    #[test]
    fn match_reads_candidate_and_jobs_from_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let candidate_path = dir.path().join("candidate.json");
        let jobs_path = dir.path().join("jobs.json");
        std::fs::write(
            &candidate_path,
            r#"{ "id": "c-9", "name": "Sofía", "skills": ["Python"] }"#,
        )
        .expect("write candidate");
        std::fs::write(
            &jobs_path,
            r#"[{ "id": "job-1", "title": "Analyst", "requiredSkills": ["Python"] }]"#,
        )
        .expect("write jobs");

        run_match(MatchArgs {
            candidate: Some(candidate_path),
            jobs: Some(jobs_path),
            limit: None,
            json: true,
        })
        .expect("match runs");

        std::fs::write(dir.path().join("bad.json"), "[").expect("write");
        assert!(run_match(MatchArgs {
            jobs: Some(dir.path().join("bad.json")),
            ..MatchArgs::default()
        })
        .is_err());
    }
}
