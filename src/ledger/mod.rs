pub mod dto;
pub mod handlers;
pub mod reconcile;
pub mod record;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
