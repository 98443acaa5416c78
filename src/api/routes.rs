//! API Routes

use super::{
    handlers::{health, images, notifications, users},
    state::AppState,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

/// HTTP API router
pub struct ApiRoutes;

impl ApiRoutes {
    /// Create the API router
    pub fn create_router(state: AppState) -> Router {
        let user_routes = Router::new()
            .route(
                "/",
                get(users::current_user)
                    .put(users::change_password)
                    .post(users::log_in),
            )
            .route("/dir", get(users::directory))
            .route("/register", post(users::register))
            .route("/out", post(users::log_out))
            .route("/outall", post(users::log_out_all))
            .route("/image", put(users::update_image))
            .route("/:id", get(users::get_user))
            .route("/:id/reset", put(users::reset_password));

        let image_routes = Router::new()
            .route("/", post(images::upload_image))
            .route("/:id", get(images::get_image))
            .route("/:id/info", get(images::get_image_info));

        let notification_routes = Router::new()
            .route("/", get(notifications::get_all).delete(notifications::delete_all))
            .route("/:id", delete(notifications::delete_one));

        let api_routes = Router::new()
            .route("/health", get(health::health_check))
            .route("/metrics", get(health::export_metrics))
            .nest("/users", user_routes)
            .nest("/images", image_routes)
            .nest("/notif", notification_routes);

        Router::new()
            .nest("/api", api_routes)
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let mut config = Config::default();
        config.auth.argon2_memory_kib = 64;
        config.auth.argon2_iterations = 1;
        AppState::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_public_health_endpoint() {
        let app = ApiRoutes::create_router(create_test_state());

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_endpoint_without_session() {
        let app = ApiRoutes::create_router(create_test_state());

        let request = Request::builder()
            .uri("/api/users")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_endpoint_with_session() {
        let state = create_test_state();
        let record = state.sessions.verifier().hash("pw").unwrap();
        state.store.create_account("alice", record).unwrap();
        let session = state.sessions.store().create("alice");
        let app = ApiRoutes::create_router(state);

        let request = Request::builder()
            .uri("/api/users")
            .header("SessionID", session.id().to_string())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
