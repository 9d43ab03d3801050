use std::sync::Arc;

use anyhow::Result;

use crate::api::create_router;
use crate::auth::{GateConfig, SigningSecret, VerificationGate};

/// Start the HTTP server with the gate in front of protected routes.
///
/// # Arguments
/// * `bind` - The address to bind to (e.g., "0.0.0.0:3000")
/// * `gate_config` - Gate configuration; rejected here if invalid
/// * `secret` - Verification key, injected once for the process lifetime
pub async fn start_http(bind: &str, gate_config: GateConfig, secret: SigningSecret) -> Result<()> {
    let gate = Arc::new(VerificationGate::new(gate_config, &secret)?);

    tracing::info!(
        header = %gate.config().header_name,
        cookie = %gate.config().cookie_name,
        algorithms = ?gate.config().algorithms,
        "Verification gate configured"
    );

    let router = create_router(gate);
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
