//! Todo API backend: username/password login, JWT bearer tokens and
//! per-user todo lists stored in Postgres.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
mod models;
mod schema;

use auth::AuthGateway;
use db::DbPool;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub auth: Arc<AuthGateway>,
}

impl AppState {
    pub fn new(pool: DbPool, auth: AuthGateway) -> Self {
        Self {
            pool,
            auth: Arc::new(auth),
        }
    }
}

/// Assemble the full HTTP router.
pub fn build_router(state: AppState, cors_allowed_origins: Option<&str>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Auth routes
        .route("/auth/", get(auth::auth_me).post(auth::create_user))
        .route("/auth/all", get(auth::list_users))
        .route("/auth/token", post(auth::login_for_access_token))
        // Todo routes
        .route("/todos/", get(handlers::list_todos))
        .route("/todos/todo", post(handlers::create_todo))
        .route(
            "/todos/todo/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .layer(build_cors_layer(cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build CORS layer based on configuration.
///
/// If allowed origins are given, only those origins are allowed.
/// If not set, defaults to permissive CORS (for development only).
fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                tracing::warn!(
                    "CORS_ALLOWED_ORIGINS is set but empty, using permissive CORS \
                     (not recommended for production)"
                );
                CorsLayer::permissive()
            } else {
                tracing::info!("CORS configured for origins: {:?}", origins);
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                    .allow_credentials(true)
            }
        }
        None => {
            tracing::warn!(
                "CORS_ALLOWED_ORIGINS not set, using permissive CORS \
                 (not recommended for production)"
            );
            CorsLayer::permissive()
        }
    }
}
