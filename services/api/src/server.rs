use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryJobStore, InMemoryRecordStore};
use crate::routes::with_automation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use docflow::automation::{standard_registry, AutomationDispatcher, AutomationState};
use docflow::config::AppConfig;
use docflow::error::AppError;
use docflow::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let records = Arc::new(InMemoryRecordStore::default());
    let jobs = Arc::new(InMemoryJobStore::default());
    let registry = Arc::new(standard_registry());
    let strategies = registry.len();
    let dispatcher = Arc::new(AutomationDispatcher::new(
        records.clone(),
        jobs.clone(),
        registry,
        &config.automation,
    ));

    let app = with_automation_routes(AutomationState {
        dispatcher: dispatcher.clone(),
        records,
        jobs,
    })
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strategies,
        workers = config.automation.workers,
        "document automation service ready"
    );

    axum::serve(listener, app).await?;
    dispatcher.shutdown();
    Ok(())
}
