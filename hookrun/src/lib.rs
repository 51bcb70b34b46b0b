//! hookrun - HMAC-authenticated webhook deploy receiver.
//!
//! Receives webhook notifications (e.g. a source host's push event), verifies
//! the `X-Hub-Signature-256` HMAC against a shared secret, and runs the update
//! script configured for the request path.
//!
//! ## Request flow
//!
//! ```text
//! POST /deploy → verify HMAC → parse JSON sanity check → run script → 200/500
//! ```

pub mod config;
pub mod routes;
pub mod runner;
pub mod web;

// Re-export commonly used types
pub use config::{Config, LogConfig, RouteConfig};
pub use routes::{Action, RouteTable};
pub use runner::{ActionError, ActionOutput, ActionRunner, ShellRunner};
pub use web::AppState;
