use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use emploseek::api_router;
use emploseek::config::AppConfig;
use emploseek::contracts::RandomContractNumbers;
use emploseek::error::AppError;
use emploseek::identity::StaticTokenProvider;
use emploseek::store::MemoryStore;
use emploseek::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let identity = StaticTokenProvider::from_config(&config.identity);
    if identity.is_empty() {
        warn!("APP_ADMIN_TOKENS is empty; every admin route will answer 401");
    }

    let api = api_router(
        Arc::new(MemoryStore::new()),
        Arc::new(RandomContractNumbers),
        Arc::new(identity),
        &config.contracts,
    );

    let app = with_operational_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        transitions = ?config.contracts.transitions,
        offer_deletion = ?config.contracts.offer_deletion,
        "emploseek contract service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
