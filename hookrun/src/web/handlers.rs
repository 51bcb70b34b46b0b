//! Webhook endpoint handler.
//!
//! One handler serves every configured route:
//! 1. Resolve the request path in the route table
//! 2. Verify the HMAC signature over the raw body
//! 3. Sanity-check that the body is JSON
//! 4. Run the configured script and map its outcome to the response
//!
//! Failures terminate only the current request; every reason is logged with
//! the request path, while the caller only sees a short plain-text status.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::routes::RouteTable;
use crate::runner::ActionRunner;
use crate::web::signature::{verify_signature, SIGNATURE_HEADER};

/// Shared application state, immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub routes: Arc<RouteTable>,
    pub runner: Arc<dyn ActionRunner>,
}

impl AppState {
    pub fn new(config: Config, routes: Arc<RouteTable>, runner: Arc<dyn ActionRunner>) -> Self {
        Self {
            config: Arc::new(config),
            routes,
            runner,
        }
    }
}

/// Handle one webhook delivery.
///
/// Registered for POST on every configured path; the method check itself is
/// the method router's (non-POST lands in [`method_not_allowed`]).
pub async fn handle_webhook(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let path = uri.path();

    info!(path = %path, body_bytes = body.len(), "webhook_received");

    // The router only dispatches registered paths here, but the table stays
    // the source of truth for what is configured.
    let Some(action) = state.routes.resolve(path) else {
        warn!(path = %path, "route_not_registered");
        return (StatusCode::NOT_FOUND, "no action configured for path\n");
    };

    let sig_header = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    if !verify_signature(sig_header, &body, state.config.secret_token.as_bytes()) {
        // The specific reason was already logged; the caller learns nothing
        warn!(path = %path, "signature_rejected");
        return (StatusCode::FORBIDDEN, "invalid signature\n");
    }

    // Well-formedness filter only; the payload content is not inspected
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&body) {
        warn!(path = %path, error = %e, "payload_not_json");
        return (StatusCode::BAD_REQUEST, "invalid JSON body\n");
    }

    info!(path = %path, command = %action.command, "action_starting");

    match state.runner.run(&action.command).await {
        Ok(output) => {
            info!(
                path = %path,
                stdout = %output.stdout.trim_end(),
                "action_succeeded"
            );
            (StatusCode::OK, "update completed\n")
        }
        Err(err) => {
            error!(
                path = %path,
                error = %err,
                stderr = err.stderr().map(str::trim_end).unwrap_or(""),
                "action_failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "update failed\n")
        }
    }
}

/// Per-route method fallback: anything but POST.
pub async fn method_not_allowed(uri: Uri) -> (StatusCode, &'static str) {
    warn!(path = %uri.path(), "method_not_allowed");
    (StatusCode::METHOD_NOT_ALLOWED, "method not allowed\n")
}

/// Router-wide fallback for paths with no configured action.
pub async fn not_found(uri: Uri) -> (StatusCode, &'static str) {
    warn!(path = %uri.path(), "route_not_found");
    (StatusCode::NOT_FOUND, "no action configured for path\n")
}
