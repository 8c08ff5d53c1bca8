use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryJobRepository, InMemoryNotificationStore, InMemoryUserDirectory,
};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skillbridge::config::AppConfig;
use skillbridge::email::ConfiguredEmailDispatcher;
use skillbridge::error::AppError;
use skillbridge::jobs::JobService;
use skillbridge::notifications::NotificationCenter;
use skillbridge::sequence::InMemorySequence;
use skillbridge::telemetry;
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

    let email = ConfiguredEmailDispatcher::from_config(&config.email)?;
    info!(transport = email.transport_label(), "email dispatcher configured");

    let sequence = Arc::new(InMemorySequence::new());
    let users = Arc::new(InMemoryUserDirectory::default());
    let notifications = Arc::new(NotificationCenter::new(
        Arc::new(InMemoryNotificationStore::default()),
        sequence.clone(),
    ));
    let job_service = Arc::new(JobService::new(
        Arc::new(InMemoryJobRepository::default()),
        users.clone(),
        notifications.clone(),
        Arc::new(email),
        sequence,
    ));

    let app = with_portal_routes(job_service, notifications, users)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "skillbridge job portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
