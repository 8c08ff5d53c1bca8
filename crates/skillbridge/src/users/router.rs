use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use tracing::{error, info};

use super::{User, UserId, UserRegistry};
use crate::error::error_body;

/// Account endpoints for deployments that keep the directory in process.
pub fn user_router<D>(directory: Arc<D>) -> Router
where
    D: UserRegistry + 'static,
{
    Router::new()
        .route("/api/v1/users", put(upsert_handler::<D>))
        .route("/api/v1/users/:user_id", get(lookup_handler::<D>))
        .with_state(directory)
}

pub(crate) async fn upsert_handler<D>(
    State(directory): State<Arc<D>>,
    axum::Json(user): axum::Json<User>,
) -> Response
where
    D: UserRegistry + 'static,
{
    match directory.upsert(user) {
        Ok(user) => {
            info!(user_id = %user.id, "user registered");
            (StatusCode::OK, axum::Json(user)).into_response()
        }
        Err(err) => {
            error!(error = %err, "user registration failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("DIRECTORY_UNAVAILABLE", err.to_string()),
            )
                .into_response()
        }
    }
}

pub(crate) async fn lookup_handler<D>(
    State(directory): State<Arc<D>>,
    Path(user_id): Path<UserId>,
) -> Response
where
    D: UserRegistry + 'static,
{
    match directory.find(user_id) {
        Ok(Some(user)) => (StatusCode::OK, axum::Json(user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_body("USER_NOT_FOUND", format!("user {user_id} not found")),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("DIRECTORY_UNAVAILABLE", err.to_string()),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{DirectoryError, UserDirectory};
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemoryRegistry {
        users: Mutex<HashMap<UserId, User>>,
    }

    impl UserDirectory for MemoryRegistry {
        fn find(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
            Ok(self.users.lock().expect("registry mutex poisoned").get(&id).cloned())
        }
    }

    impl UserRegistry for MemoryRegistry {
        fn upsert(&self, user: User) -> Result<User, DirectoryError> {
            self.users
                .lock()
                .expect("registry mutex poisoned")
                .insert(user.id, user.clone());
            Ok(user)
        }
    }

    #[tokio::test]
    async fn registered_user_can_be_looked_up() {
        let registry = Arc::new(MemoryRegistry::default());
        let router = user_router(Arc::clone(&registry));

        let payload = serde_json::json!({ "id": 7, "name": "Priya", "email": "priya@example.com" });
        let response = router
            .clone()
            .oneshot(
                Request::put("/api/v1/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/api/v1/users/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        let user: User = serde_json::from_slice(&body).expect("user payload");
        assert_eq!(user.email, "priya@example.com");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let router = user_router(Arc::new(MemoryRegistry::default()));
        let response = router
            .oneshot(Request::get("/api/v1/users/99").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
