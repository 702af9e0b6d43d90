use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::ScriptCommand;

/// Everything a finished script wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect script output: {0}")]
    Io(#[source] std::io::Error),

    #[error("script timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("script exited with status {code:?}")]
    Failed { code: Option<i32>, stderr: String },
}

impl ScriptError {
    /// Text that is safe to hand to a client when the script never produced its own.
    pub fn public_detail(&self) -> String {
        match self {
            ScriptError::Spawn { .. } => "script could not be started".into(),
            ScriptError::Io(_) => "script output could not be read".into(),
            ScriptError::TimedOut(limit) => format!("script timed out after {}s", limit.as_secs()),
            ScriptError::Failed { stderr, .. } => stderr.clone(),
        }
    }
}

#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, command: &ScriptCommand) -> Result<ScriptOutput, ScriptError>;
}

/// Launches scripts as child processes with a hard time limit.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn run(&self, command: &ScriptCommand) -> Result<ScriptOutput, ScriptError> {
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScriptError::Spawn {
                program: command.program.clone(),
                source,
            })?;
        debug!(program = %command.program, pid = ?child.id(), "script started");

        // the child is owned by this future: timing out or dropping the request kills it
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScriptError::TimedOut(self.timeout))?
            .map_err(ScriptError::Io)?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ScriptError::Failed {
                code: output.status.code(),
                stderr,
            });
        }
        Ok(ScriptOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> ScriptCommand {
        ScriptCommand {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
        }
    }

    fn runner() -> ProcessRunner {
        ProcessRunner::new(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn captures_output_of_successful_script() {
        let out = runner()
            .run(&sh("echo recognised; echo warming up >&2"))
            .await
            .expect("script should succeed");
        assert_eq!(out.stdout.trim(), "recognised");
        assert_eq!(out.stderr.trim(), "warming up");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let err = runner()
            .run(&sh("echo boom >&2; exit 1"))
            .await
            .unwrap_err();
        match err {
            ScriptError::Failed { code, stderr } => {
                assert_eq!(code, Some(1));
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let cmd = ScriptCommand {
            program: "/nonexistent/bin/not-a-python".into(),
            args: vec!["app.py".into()],
        };
        let err = runner().run(&cmd).await.unwrap_err();
        assert!(matches!(err, ScriptError::Spawn { .. }));
        assert_eq!(err.public_detail(), "script could not be started");
    }

    #[tokio::test]
    async fn hung_script_is_cut_off() {
        let started = std::time::Instant::now();
        let err = ProcessRunner::new(Duration::from_millis(200))
            .run(&sh("sleep 30"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::TimedOut(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
