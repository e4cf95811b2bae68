//! Subprocess backend adapter.
//!
//! Spawns one short-lived bridge process per call:
//!
//! ```text
//! <program> <prefix args...> <command> <args...>
//! ```
//!
//! The bridge prints a single JSON object on stdout and exits zero. Its
//! stderr is only collected for error reporting.

use std::{path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::{
    Backend, BackendError, BackendKind, BackendOperation, BackendPayload, BackendReply,
};

pub struct ProcessBackend {
    program: String,
    prefix_args: Vec<String>,
    timeout: Duration,
}

impl ProcessBackend {
    pub fn new(program: impl Into<String>, prefix_args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            prefix_args,
            timeout,
        }
    }

    /// Bridge script run by an interpreter, e.g. `python3 python_bridge.py`
    pub fn bridge(program: String, script: PathBuf, timeout: Duration) -> Self {
        Self::new(program, vec![script.to_string_lossy().into_owned()], timeout)
    }

    /// Positional arguments for an operation, command name first
    fn arguments(operation: BackendOperation, payload: BackendPayload) -> Vec<String> {
        let mut args = vec![operation.command().to_string()];
        match operation {
            BackendOperation::Chat => {
                args.extend(payload.message);
                args.extend(payload.user_id);
            }
            BackendOperation::Clear | BackendOperation::Analyze => {
                args.extend(payload.user_id);
            }
            BackendOperation::Help | BackendOperation::Tools => {}
        }
        args
    }

    /// `<program> <prefix args...> <args...>`
    fn bridge_command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args).args(args);
        cmd
    }

    /// Run the command to completion and collect its output.
    ///
    /// On timeout the child is left running; it is reaped in the background
    /// once it exits.
    async fn run(&self, mut cmd: Command) -> Result<std::process::Output, BackendError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|e| {
            BackendError::Unreachable(format!("failed to spawn '{}': {}", self.program, e))
        })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(BackendError::ProcessFailure {
                code: None,
                stderr: format!("failed to collect output: {}", e),
            }),
            Err(_) => Err(BackendError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl Backend for ProcessBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Process
    }

    async fn invoke(
        &self,
        operation: BackendOperation,
        payload: BackendPayload,
    ) -> Result<BackendReply, BackendError> {
        let args = Self::arguments(operation, payload);
        tracing::debug!("Spawning bridge '{}' for {}", self.program, operation);

        let output = self.run(self.bridge_command(&args)).await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!("Bridge stderr ({}): {}", operation, stderr.trim());
        }

        if !output.status.success() {
            return Err(BackendError::ProcessFailure {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        parse_bridge_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn probe(&self) -> Result<(), BackendError> {
        // Only the interpreter is checked; the bridge script is not started.
        let mut cmd = Command::new(&self.program);
        cmd.arg("--version");
        let output = self.run(cmd).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(BackendError::ProcessFailure {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Parse bridge stdout.
///
/// The whole output is tried first; if that fails, the last non-empty line
/// is tried so that stray diagnostics printed before the result do not
/// break parsing.
pub(crate) fn parse_bridge_output(stdout: &str) -> Result<BackendReply, BackendError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(BackendError::MalformedOutput(
            "bridge produced no output".to_string(),
        ));
    }

    match BackendReply::from_json_str(trimmed) {
        Ok(reply) => Ok(reply),
        Err(err) => match trimmed.lines().map(str::trim).filter(|l| !l.is_empty()).last() {
            Some(last) if last != trimmed => BackendReply::from_json_str(last),
            _ => Err(err),
        },
    }
}
