//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Authentication
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        // Group CRUD
        .route("/groups", get(handlers::list_groups))
        .route("/groups", post(handlers::create_group))
        .route("/groups/{group_id}", get(handlers::get_group))
        .route("/groups/{group_id}", put(handlers::update_group))
        .route("/groups/{group_id}", delete(handlers::delete_group))
        // Students
        .route("/groups/{group_id}/students", get(handlers::list_students))
        .route("/groups/{group_id}/students", post(handlers::add_student))
        .route(
            "/groups/{group_id}/students/{student_id}",
            delete(handlers::delete_student),
        )
        // Attendance
        .route("/groups/{group_id}/attendance", get(handlers::get_day_sheet))
        .route("/groups/{group_id}/attendance", put(handlers::record_attendance))
        .route("/groups/{group_id}/attendance/{date}", get(handlers::get_day_detail))
        .route("/groups/{group_id}/history", get(handlers::get_history))
        // Calendar, birthdays, export
        .route("/calendar", get(handlers::get_calendar))
        .route("/birthdays", get(handlers::get_birthdays))
        .route("/groups/{group_id}/export", get(handlers::export_attendance));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
