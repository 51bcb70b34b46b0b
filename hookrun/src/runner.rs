//! Action execution: run a configured script and capture its output.
//!
//! The handler talks to an [`ActionRunner`] trait object rather than spawning
//! processes itself, so request handling can be tested without touching the
//! process table. The production implementation runs the script under `bash`
//! and waits for it to finish.
//!
//! There is deliberately no timeout around the wait: a hung script holds its
//! request task until the child exits, matching the documented baseline
//! behavior.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Shell interpreter every action is run under.
const INTERPRETER: &str = "bash";

/// Captured output of a successful action run.
#[derive(Debug, Clone)]
pub struct ActionOutput {
    /// Captured standard output, logged but never returned to the HTTP caller
    pub stdout: String,
}

/// Why an action run failed.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The interpreter process could not be started at all.
    #[error("failed to spawn action process: {0}")]
    Spawn(#[from] std::io::Error),

    /// The process ran but exited non-zero (or was killed by a signal).
    #[error("action exited with status {}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ExitStatus {
        code: Option<i32>,
        /// Captured standard error, for local logs only
        stderr: String,
    },
}

impl ActionError {
    /// Captured stderr, when the process got far enough to produce any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ActionError::Spawn(_) => None,
            ActionError::ExitStatus { stderr, .. } => Some(stderr),
        }
    }
}

/// The "execute action" capability consumed by the webhook handler.
#[async_trait]
pub trait ActionRunner: Send + Sync {
    /// Run `command` to completion, capturing stdout and stderr.
    async fn run(&self, command: &str) -> Result<ActionOutput, ActionError>;
}

/// Production runner: `bash <command>`, synchronous wait, captured streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

#[async_trait]
impl ActionRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<ActionOutput, ActionError> {
        debug!(command = %command, "action_spawning");

        let output = Command::new(INTERPRETER)
            .arg(command)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ActionError::ExitStatus {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(ActionOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
