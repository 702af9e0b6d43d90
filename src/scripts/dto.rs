use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ScriptResponse {
    pub message: &'static str,
}
