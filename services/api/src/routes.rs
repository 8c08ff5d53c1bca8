use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use skillbridge::email::EmailDispatcher;
use skillbridge::jobs::{job_router, JobRepository, JobService};
use skillbridge::notifications::{notification_router, NotificationCenter, NotificationStore};
use skillbridge::users::{user_router, UserRegistry};
use std::sync::Arc;

/// Portal API plus the operational endpoints every deployment exposes.
pub(crate) fn with_portal_routes<R, U, S, E>(
    jobs: Arc<JobService<R, U, NotificationCenter<S>, E>>,
    notifications: Arc<NotificationCenter<S>>,
    users: Arc<U>,
) -> axum::Router
where
    R: JobRepository + 'static,
    U: UserRegistry + 'static,
    S: NotificationStore + 'static,
    E: EmailDispatcher + 'static,
{
    job_router(jobs)
        .merge(notification_router(notifications))
        .merge(user_router(users))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
