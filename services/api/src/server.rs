use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, AppState, InMemoryActivityLog, InMemoryEligibilityStore, InMemoryEvaluationLedger,
    InMemoryProfileStore, StaticSchemeCatalog,
};
use crate::routes::with_credit_routes;
use agri_credit::config::AppConfig;
use agri_credit::error::AppError;
use agri_credit::telemetry;
use agri_credit::workflows::credit::CreditAnalysisService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let schemes = load_catalog(args.catalog.take())?;
    let service = Arc::new(CreditAnalysisService::new(
        Arc::new(InMemoryEvaluationLedger::default()),
        Arc::new(InMemoryProfileStore::default()),
        Arc::new(InMemoryEligibilityStore::default()),
        Arc::new(StaticSchemeCatalog::new(schemes)),
        Arc::new(InMemoryActivityLog::default()),
        config.engine.clone(),
    ));

    let app = with_credit_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "farmer credit engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
