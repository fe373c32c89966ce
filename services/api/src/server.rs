use crate::cli::ServeArgs;
use crate::infra::{demo_candidates, AppState, ConfiguredStore, TracingNotificationSink};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use catalyst_hr::config::AppConfig;
use catalyst_hr::error::AppError;
use catalyst_hr::telemetry;
use catalyst_hr::workflows::matching::MatchScorer;
use catalyst_hr::workflows::pipeline::{PipelineEngine, PipelineError, StageCatalog};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(store) = args.store.take() {
        config.storage.store_path = Some(store);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = ConfiguredStore::from_path(config.storage.store_path.as_deref())
        .map_err(PipelineError::from)?;
    let engine = Arc::new(PipelineEngine::hydrate(
        Arc::new(store),
        Arc::new(TracingNotificationSink::default()),
        StageCatalog::standard(),
    )?);

    if args.seed_demo && engine.summary().total == 0 {
        for candidate in demo_candidates() {
            engine.register(candidate)?;
        }
        info!(candidates = engine.summary().total, "seeded demo candidates");
    }

    let app = with_service_routes(engine, Arc::new(MatchScorer::default()))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hiring pipeline service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
