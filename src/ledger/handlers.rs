use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::state::AppState;

use super::dto::{DailySnapshot, EditCompletion};
use super::record::NutritionRecord;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/record", get(get_record))
        .route("/record/edit", post(apply_edit))
}

#[instrument(skip(state))]
pub async fn get_record(State(state): State<AppState>) -> Json<DailySnapshot> {
    let record = state.ledger.read().await.clone();
    let session = state.session.lock().await;
    Json(DailySnapshot {
        record,
        mode: session.mode,
        is_submitting: session.is_submitting,
    })
}

#[instrument(skip(state, edit))]
pub async fn apply_edit(
    State(state): State<AppState>,
    Json(edit): Json<EditCompletion>,
) -> Json<NutritionRecord> {
    let mut ledger = state.ledger.write().await;
    let next = ledger.apply_edit(&edit);
    *ledger = next;
    info!(version = ledger.edit_version, dish = %ledger.dish_name, "edit applied");
    Json(ledger.clone())
}
