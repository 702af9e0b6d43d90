use crate::config::AppConfig;
use crate::db;
use crate::scripts::runner::{ProcessRunner, ScriptRunner};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub scripts: Arc<dyn ScriptRunner>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let db = db::connect(&config.database_url).await?;
        db::ensure_schema(&db).await?;
        info!(database = %config.database_url, "database ready");

        let scripts =
            Arc::new(ProcessRunner::new(config.scripts.timeout())) as Arc<dyn ScriptRunner>;

        Ok(Self::from_parts(db, config, scripts))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        scripts: Arc<dyn ScriptRunner>,
    ) -> Self {
        Self {
            db,
            config,
            scripts,
        }
    }

    /// In-memory database, test config and the given script runner.
    #[cfg(test)]
    pub async fn fake(scripts: Arc<dyn ScriptRunner>) -> Self {
        use crate::config::{ScriptCommand, ScriptsConfig};

        let db = db::memory_pool().await;
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            debug: false,
            scripts: ScriptsConfig {
                recognize: ScriptCommand::new("python3", "recognize.py"),
                collect: ScriptCommand::new("python3", "collect_data.py"),
                timeout_secs: 5,
            },
        });
        Self::from_parts(db, config, scripts)
    }
}

#[cfg(test)]
pub use fake::{FakeOutcome, FakeRunner};

#[cfg(test)]
mod fake {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::ScriptCommand;
    use crate::scripts::runner::{ScriptError, ScriptOutput, ScriptRunner};

    #[derive(Debug, Clone)]
    pub enum FakeOutcome {
        Succeed(String),
        Fail { code: i32, stderr: String },
        Missing,
    }

    /// Records every command and answers with a canned outcome.
    pub struct FakeRunner {
        outcome: FakeOutcome,
        calls: Mutex<Vec<ScriptCommand>>,
    }

    impl FakeRunner {
        pub fn new(outcome: FakeOutcome) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<ScriptCommand> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScriptRunner for FakeRunner {
        async fn run(&self, command: &ScriptCommand) -> Result<ScriptOutput, ScriptError> {
            self.calls.lock().unwrap().push(command.clone());
            match &self.outcome {
                FakeOutcome::Succeed(stdout) => Ok(ScriptOutput {
                    stdout: stdout.clone(),
                    stderr: String::new(),
                }),
                FakeOutcome::Fail { code, stderr } => Err(ScriptError::Failed {
                    code: Some(*code),
                    stderr: stderr.clone(),
                }),
                FakeOutcome::Missing => Err(ScriptError::Spawn {
                    program: command.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }
}
