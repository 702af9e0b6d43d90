use std::time::Duration;

/// Program and arguments for one external script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ScriptCommand {
    /// Runs `script` through `interpreter`, or directly when the interpreter is empty.
    pub fn new(interpreter: &str, script: &str) -> Self {
        if interpreter.trim().is_empty() {
            Self {
                program: script.to_string(),
                args: Vec::new(),
            }
        } else {
            Self {
                program: interpreter.to_string(),
                args: vec![script.to_string()],
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptsConfig {
    pub recognize: ScriptCommand,
    pub collect: ScriptCommand,
    pub timeout_secs: u64,
}

impl ScriptsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub scripts: ScriptsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://user_data.db".into());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);
        let debug = debug_enabled(std::env::var("DEBUG").ok().as_deref());

        let interpreter =
            std::env::var("SCRIPT_INTERPRETER").unwrap_or_else(|_| "python3".into());
        let scripts = ScriptsConfig {
            recognize: ScriptCommand::new(
                &interpreter,
                &std::env::var("RECOGNIZE_SCRIPT")
                    .unwrap_or_else(|_| "scripts/recognize.py".into()),
            ),
            collect: ScriptCommand::new(
                &interpreter,
                &std::env::var("COLLECT_SCRIPT")
                    .unwrap_or_else(|_| "scripts/collect_data.py".into()),
            ),
            timeout_secs: std::env::var("SCRIPT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(300),
        };

        Ok(Self {
            database_url,
            host,
            port,
            debug,
            scripts,
        })
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "signlang_backend=debug,tower_http=debug"
        } else {
            "signlang_backend=info,tower_http=info"
        }
    }
}

// Unset means debug, matching how the demo has always been launched.
fn debug_enabled(raw: Option<&str>) -> bool {
    raw.map(|v| v == "True").unwrap_or(true)
}
