//! Axum router configuration with middleware.
//!
//! Middleware: CORS (permissive) and request tracing.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/patients", get(handlers::patient::list_patients))
        .route("/patient", post(handlers::patient::create_patient))
        .route("/patient/{id}", get(handlers::patient::get_patient))
        .route("/patient/{id}", put(handlers::patient::update_patient))
        .route(
            "/appointment_info/{patient_id}",
            get(handlers::appointment::appointment_info),
        )
        .route("/search", post(handlers::search::search))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Liveness message.
async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "message": "Clinical records API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
