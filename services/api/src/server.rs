use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemorySubmissionRepository, SeededDirectory, TracingNotificationSender,
};
use crate::routes::with_proposal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use propvet::config::AppConfig;
use propvet::error::AppError;
use propvet::telemetry;
use propvet::workflows::proposals::ProposalService;
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

    let repository = Arc::new(InMemorySubmissionRepository::default());
    let directory = Arc::new(SeededDirectory::with_campus_fixture());
    let notifier = Arc::new(TracingNotificationSender);
    let proposal_service = Arc::new(ProposalService::new(repository, directory, notifier));

    let app = with_proposal_routes(proposal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "proposal vetting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
