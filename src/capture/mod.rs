pub mod dto;
pub mod handlers;
pub mod services;
pub mod session;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
