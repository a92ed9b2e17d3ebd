//! Router construction.

use crate::handlers::{self, AppState};
use crate::middleware::{require_admin, AdminGateState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Write endpoints sit behind the admin gate; redirect and health stay
/// public.
pub fn build_routes(state: Arc<AppState>, gate: Arc<AdminGateState>) -> Router {
    let admin_routes = Router::new()
        .route("/url", post(handlers::save::save))
        .route("/url/:alias", delete(handlers::delete::delete))
        .route_layer(axum::middleware::from_fn_with_state(gate, require_admin));

    Router::new()
        .merge(admin_routes)
        .route("/:alias", get(handlers::redirect::redirect))
        .route("/health", get(health_check))
        .with_state(state)
        // Request ids are assigned before tracing so every span carries one;
        // the id is echoed back on responses.
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
