use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{Applicant, ApplicationStatus, ApplicationTransition, Job, JobId};
use super::service::{JobService, JobServiceError};
use super::repository::{JobRepository, RepositoryError};
use crate::email::EmailDispatcher;
use crate::error::error_body;
use crate::notifications::NotificationDispatcher;
use crate::users::{UserDirectory, UserId};

/// Router builder exposing the job lifecycle endpoints.
pub fn job_router<R, U, N, E>(service: Arc<JobService<R, U, N, E>>) -> Router
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            post(post_job_handler::<R, U, N, E>).get(list_jobs_handler::<R, U, N, E>),
        )
        .route("/api/v1/jobs/:job_id", get(get_job_handler::<R, U, N, E>))
        .route(
            "/api/v1/jobs/:job_id/apply",
            post(apply_handler::<R, U, N, E>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/history/:status",
            get(history_handler::<R, U, N, E>),
        )
        .route(
            "/api/v1/posters/:poster_id/jobs",
            get(posted_by_handler::<R, U, N, E>),
        )
        .route(
            "/api/v1/applications/status",
            post(change_status_handler::<R, U, N, E>),
        )
        .with_state(service)
}

pub(crate) async fn post_job_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
    axum::Json(job): axum::Json<Job>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    let created = job.id.is_new();
    match run_blocking(move || service.post_job(job)).await {
        Ok(job) => {
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(job)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn list_jobs_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    match run_blocking(move || service.get_all_jobs()).await {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn get_job_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
    Path(job_id): Path<JobId>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    match run_blocking(move || service.get_job(job_id)).await {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn apply_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
    Path(job_id): Path<JobId>,
    axum::Json(applicant): axum::Json<Applicant>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    match run_blocking(move || service.apply_job(job_id, applicant)).await {
        Ok(receipt) => {
            let payload = json!({
                "message": "Applied Successfully",
                "job_id": receipt.job.id,
                "email": receipt.email,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn history_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
    Path((applicant_id, status)): Path<(UserId, ApplicationStatus)>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    match run_blocking(move || service.get_history(applicant_id, status)).await {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn posted_by_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
    Path(poster_id): Path<UserId>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    match run_blocking(move || service.get_jobs_posted_by(poster_id)).await {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn change_status_handler<R, U, N, E>(
    State(service): State<Arc<JobService<R, U, N, E>>>,
    axum::Json(transition): axum::Json<ApplicationTransition>,
) -> Response
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    match run_blocking(move || service.change_app_status(transition)).await {
        Ok(change) => {
            let payload = json!({
                "message": "Status Changed Successfully",
                "matched": change.matched,
                "notifications": change.notifications,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

/// Runs a service call on the blocking pool. Repository, notification and SMTP adapters are
/// synchronous and may hold the thread for a full network round trip.
async fn run_blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> Result<T, JobServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(service_error_response),
        Err(err) => {
            error!(error = %err, "job request worker failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", "job request worker failed"),
            )
                .into_response())
        }
    }
}

fn service_error_response(err: JobServiceError) -> Response {
    let status = match &err {
        JobServiceError::JobNotFound(_) | JobServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,
        JobServiceError::AlreadyApplied { .. } => StatusCode::CONFLICT,
        JobServiceError::Repository(
            RepositoryError::VersionConflict { .. }
            | RepositoryError::Duplicate(_)
            | RepositoryError::Missing(_),
        ) => StatusCode::CONFLICT,
        JobServiceError::Notification(_) => StatusCode::BAD_GATEWAY,
        JobServiceError::Repository(RepositoryError::Unavailable(_))
        | JobServiceError::Directory(_)
        | JobServiceError::Sequence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(error = %err, code = err.code(), "job request failed");
    }

    (status, error_body(err.code(), err.to_string())).into_response()
}
