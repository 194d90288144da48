use crate::cli::ServeArgs;
use crate::infra::{load_rubric, AppState, ConfiguredSink};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scoresheet::config::AppConfig;
use scoresheet::error::AppError;
use scoresheet::telemetry;
use scoresheet::workflows::evaluation::SharedSession;
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

    let rubric = load_rubric(config.rubric_path.as_deref())?;
    let sink = Arc::new(ConfiguredSink::from_config(&config.persistence)?);
    let shared = Arc::new(SharedSession::new(sink, rubric));

    let app = with_service_routes(shared)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scoring sheet service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
