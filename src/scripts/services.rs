use std::fmt;

use tracing::{debug, info};

use super::runner::ScriptRunner;
use crate::{
    config::{ScriptCommand, ScriptsConfig},
    error::{AppError, AppResult},
};

/// The two scripts the demo can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Recognize,
    Collect,
}

impl ScriptKind {
    pub fn command(self, scripts: &ScriptsConfig) -> &ScriptCommand {
        match self {
            ScriptKind::Recognize => &scripts.recognize,
            ScriptKind::Collect => &scripts.collect,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            ScriptKind::Recognize => "Recognize Signs script executed successfully!",
            ScriptKind::Collect => "Collect Data script executed successfully!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            ScriptKind::Recognize => "Failed to execute recognize script",
            ScriptKind::Collect => "Failed to execute collect script",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptKind::Recognize => f.write_str("recognize"),
            ScriptKind::Collect => f.write_str("collect"),
        }
    }
}

/// Run the script behind `kind` to completion.
pub async fn invoke(
    runner: &dyn ScriptRunner,
    scripts: &ScriptsConfig,
    kind: ScriptKind,
) -> AppResult<()> {
    let command = kind.command(scripts);
    info!(script = %kind, program = %command.program, args = ?command.args, "executing script");

    let output = runner
        .run(command)
        .await
        .map_err(|source| AppError::Script { kind, source })?;

    info!(script = %kind, stdout = %output.stdout.trim_end(), "script output");
    if !output.stderr.is_empty() {
        debug!(script = %kind, stderr = %output.stderr.trim_end(), "script diagnostics");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scripts::runner::ScriptError,
        state::{FakeOutcome, FakeRunner},
    };

    fn scripts() -> ScriptsConfig {
        ScriptsConfig {
            recognize: ScriptCommand::new("python3", "recognize.py"),
            collect: ScriptCommand::new("python3", "collect_data.py"),
            timeout_secs: 5,
        }
    }

    #[test]
    fn each_kind_has_its_own_command() {
        let cfg = scripts();
        assert_eq!(ScriptKind::Recognize.command(&cfg).args, vec!["recognize.py"]);
        assert_eq!(ScriptKind::Collect.command(&cfg).args, vec!["collect_data.py"]);
    }

    #[tokio::test]
    async fn invoke_runs_selected_script() {
        let runner = FakeRunner::new(FakeOutcome::Succeed("done".into()));
        invoke(&runner, &scripts(), ScriptKind::Collect)
            .await
            .expect("invoke should succeed");
        assert_eq!(runner.calls(), vec![ScriptCommand::new("python3", "collect_data.py")]);
    }

    #[tokio::test]
    async fn invoke_wraps_runner_failure_with_kind() {
        let runner = FakeRunner::new(FakeOutcome::Fail {
            code: 1,
            stderr: "boom".into(),
        });
        let err = invoke(&runner, &scripts(), ScriptKind::Recognize)
            .await
            .unwrap_err();
        match err {
            AppError::Script {
                kind: ScriptKind::Recognize,
                source: ScriptError::Failed { stderr, .. },
            } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
