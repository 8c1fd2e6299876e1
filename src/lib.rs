pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use crate::{config::Config, errors::{AppError, AppResult}, state::AppState};

/// Builds the full HTTP API. Everything except health, signup, login and
/// logout sits behind the access gate.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        // Session
        .route("/auth/me", get(handlers::current_user))

        // Task routes
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/by-label/:label_id", get(handlers::list_tasks_by_label))
        .route(
            "/tasks/:task_id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )

        // Label routes
        .route("/labels", get(handlers::list_labels).post(handlers::create_label))
        .route(
            "/labels/:label_id",
            get(handlers::get_label)
                .put(handlers::update_label)
                .delete(handlers::delete_label),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))

        // Auth routes
        .route("/auth/signup", post(handlers::handle_signup))
        .route("/auth/login", post(handlers::handle_login))
        .route("/auth/logout", post(handlers::handle_logout))
        .merge(protected)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
