// REST API endpoints in front of and behind the gate

use axum::{
    Router,
    middleware,
    response::Json,
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthContext, VerificationGate, require_auth};

#[cfg(test)]
mod integration_tests;

/// Put every route of `router` behind the gate.
///
/// Uses `route_layer`, so unmatched paths still return 404 rather than 401.
pub fn protect<S>(router: Router<S>, gate: Arc<VerificationGate>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, require_auth))
}

pub fn create_router(gate: Arc<VerificationGate>) -> Router {
    let protected = protect(Router::new().route("/me", get(current_identity)), gate);

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Echo the verified identity of the caller.
async fn current_identity(ctx: AuthContext) -> Json<Value> {
    Json(serde_json::json!({
        "source": ctx.source(),
        "claims": ctx.claims(),
    }))
}
