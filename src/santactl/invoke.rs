//! Process execution for built santactl commands.

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, trace};

use super::CommandSpec;

/// Outcome of one santactl run: captured stdout, or an error description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Output(String),
    Failed { operation: String, error: String },
}

impl Invocation {
    pub fn failed(spec: &CommandSpec, error: impl Into<String>) -> Self {
        Invocation::Failed {
            operation: spec.operation().to_string(),
            error: error.into(),
        }
    }

    /// Text relayed to the client. Failures are prefixed with the operation.
    pub fn into_text(self) -> String {
        match self {
            Invocation::Output(out) => out,
            Invocation::Failed { operation, error } => format!("Error with {operation}: {error}"),
        }
    }
}

/// Executes a [`CommandSpec`]. Swapped for a fake in tests.
pub trait Runner: Send + Sync + 'static {
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = Invocation> + Send;
}

/// Spawns the real process and waits for it to exit.
///
/// stdin is closed for the child: when serving over stdio, the parent's stdin
/// carries protocol frames. `sudo` prompts on the controlling tty, not stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Invocation {
        let program = spec.program();
        debug!(command = %spec, "spawning santactl");

        let output = Command::new(program)
            .args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => return Invocation::failed(spec, format!("failed to launch {program}: {e}")),
        };

        trace!(
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "santactl exited"
        );

        if output.status.success() {
            return Invocation::Output(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Invocation::failed(spec, output.status.to_string())
        } else {
            Invocation::failed(spec, format!("{}: {stderr}", output.status))
        }
    }
}
