//! Route definitions for the gwadmin HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and layers.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .route("/health", get(handlers::health::health));

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: login, logout, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// Tenant-scoped administration
fn admin_routes() -> Router<AppState> {
    use handlers::admin::{channels, groups, tenants, users};

    Router::new()
        .route(
            "/tenants/{id}",
            get(tenants::get_tenant).delete(tenants::delete_tenant),
        )
        .route("/channels/{id}", delete(channels::delete_channel))
        .route("/users/{id}", get(users::get_user).delete(users::delete_user))
        .route("/groups/{id}/members", post(groups::add_member))
}
