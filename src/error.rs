use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::scripts::{runner::ScriptError, services::ScriptKind};

#[derive(Debug, Error)]
pub enum AppError {
    /// A required request field is missing or empty.
    #[error("{0}")]
    Validation(&'static str),

    /// Body was not JSON, had the wrong content type or mistyped fields.
    #[error("Invalid request body")]
    MalformedBody(#[from] JsonRejection),

    #[error("Username or email already exists")]
    Duplicate,

    /// Unknown username and wrong password look the same from outside.
    #[error("Invalid username or password")]
    Authentication,

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("{kind} script failed: {source}")]
    Script {
        kind: ScriptKind,
        #[source]
        source: ScriptError,
    },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedBody(_) | AppError::Duplicate => {
                StatusCode::BAD_REQUEST
            }
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Internal(_) | AppError::Script { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the JSON body with the human-readable text under `message_key`.
    /// Internal faults are logged here with a correlation id; only the id goes out.
    fn into_body(self, message_key: &str) -> (StatusCode, Value) {
        let status = self.status();
        let display = self.to_string();
        let mut body = Map::new();

        let message = match self {
            AppError::Validation(_) | AppError::Duplicate | AppError::Authentication => display,
            AppError::MalformedBody(ref rejection) => {
                warn!(status = %rejection.status(), error = %rejection.body_text(), "rejected request body");
                display
            }
            AppError::Storage(ref e) => {
                let id = correlate(e, "database failure");
                body.insert("correlation_id".into(), json!(id));
                "Server error".to_string()
            }
            AppError::Internal(ref e) => {
                let id = correlate(e, "internal failure");
                body.insert("correlation_id".into(), json!(id));
                "Server error".to_string()
            }
            AppError::Script {
                kind,
                source: ScriptError::Failed { code, stderr },
            } => {
                error!(script = %kind, ?code, %stderr, "script exited with failure");
                body.insert("details".into(), json!(stderr));
                kind.failure_message().to_string()
            }
            AppError::Script { kind, source } => {
                let id = Uuid::new_v4();
                error!(correlation_id = %id, script = %kind, error = %source, "script could not complete");
                body.insert("details".into(), json!(source.public_detail()));
                body.insert("correlation_id".into(), json!(id));
                "An unexpected error occurred".to_string()
            }
        };

        body.insert(message_key.to_string(), json!(message));
        (status, Value::Object(body))
    }
}

fn correlate(err: &dyn std::fmt::Display, what: &str) -> Uuid {
    let id = Uuid::new_v4();
    error!(correlation_id = %id, error = %err, "{}", what);
    id
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_body("error");
        (status, Json(body)).into_response()
    }
}

/// Signup failures report under `message`, which is what the web client reads.
#[derive(Debug)]
pub struct SignupError(pub AppError);

impl From<AppError> for SignupError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        let (status, body) = self.0.into_body("message");
        (status, Json(body)).into_response()
    }
}
