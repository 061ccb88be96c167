//! Axum router configuration with middleware.
//!
//! REST routes are under `/api/v1/`; the relay WebSocket is at `/ws`.
//! Middleware: CORS, tracing.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&state.config.server.cors_origin))
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Participants
        .route("/participants", post(handlers::participant::create_participant))
        // Messages
        .route("/messages", post(handlers::message::create_message))
        .route(
            "/messages/between/{sender_id}",
            post(handlers::message::messages_between),
        )
        .route(
            "/messages/for/{user_id}",
            get(handlers::message::messages_for_user),
        )
        .route("/messages/{id}/read", post(handlers::message::mark_read));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `"*"` allows any origin; anything else must be a single valid origin.
fn allow_origin(origin: &str) -> AllowOrigin {
    if origin == "*" {
        return AllowOrigin::any();
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(err) => {
            tracing::warn!(%origin, "invalid cors_origin ({err}), allowing any origin");
            AllowOrigin::any()
        }
    }
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
