//! Web server module: routing and request handling.
//!
//! Each configured route is registered for POST only; other methods get an
//! explicit 405 and unregistered paths an explicit 404, so no response comes
//! from a silent framework default.

pub mod handlers;
pub mod signature;

use axum::routing::post;
use axum::Router;

pub use handlers::{handle_webhook, method_not_allowed, not_found, AppState};
pub use signature::{sign, verify_signature, SIGNATURE_HEADER, SIGNATURE_PREFIX};

/// Build the application router from the route table in `state`.
pub fn build_router(state: AppState) -> Router {
    let paths: Vec<String> = state.routes.paths().map(str::to_string).collect();

    let mut router = Router::new();
    for path in &paths {
        router = router.route(path, post(handle_webhook).fallback(method_not_allowed));
    }

    router.fallback(not_found).with_state(state)
}
