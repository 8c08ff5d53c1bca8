use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use tracing::error;

use super::domain::NotificationId;
use super::service::{NotificationCenter, NotificationCenterError};
use super::store::NotificationStore;
use crate::error::error_body;
use crate::users::UserId;

/// Inbox endpoints: list unread entries and mark one read.
pub fn notification_router<S>(center: Arc<NotificationCenter<S>>) -> Router
where
    S: NotificationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/notifications/unread/:user_id",
            get(unread_handler::<S>),
        )
        .route(
            "/api/v1/notifications/read/:notification_id",
            put(mark_read_handler::<S>),
        )
        .with_state(center)
}

pub(crate) async fn unread_handler<S>(
    State(center): State<Arc<NotificationCenter<S>>>,
    Path(user_id): Path<UserId>,
) -> Response
where
    S: NotificationStore + 'static,
{
    match center.unread_for(user_id) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => center_error_response(err),
    }
}

pub(crate) async fn mark_read_handler<S>(
    State(center): State<Arc<NotificationCenter<S>>>,
    Path(notification_id): Path<NotificationId>,
) -> Response
where
    S: NotificationStore + 'static,
{
    match center.mark_read(notification_id) {
        Ok(notification) => (StatusCode::OK, axum::Json(notification)).into_response(),
        Err(err) => center_error_response(err),
    }
}

fn center_error_response(err: NotificationCenterError) -> Response {
    let status = match err {
        NotificationCenterError::NotFound(_) => StatusCode::NOT_FOUND,
        NotificationCenterError::Store(_) => {
            error!(error = %err, "notification store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, error_body(err.code(), err.to_string())).into_response()
}
