use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod runner;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::script_routes()
}
