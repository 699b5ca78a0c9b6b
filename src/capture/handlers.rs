use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use crate::error::CaptureError;
use crate::state::AppState;

use super::dto::{SelectRequest, SessionView, SubmitImageJson, SubmitResponse};
use super::services::submit_image;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/capture", get(session_view))
        .route("/capture/menu", post(open_menu))
        .route("/capture/select", post(select_acquisition))
        .route("/capture/close", post(close))
        .route("/capture/submit", post(submit_multipart))
        .route("/capture/submit/json", post(submit_json))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state))]
pub async fn session_view(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::of(&session))
}

#[instrument(skip(state))]
pub async fn open_menu(State(state): State<AppState>) -> Result<Json<SessionView>, CaptureError> {
    let mut session = state.session.lock().await;
    session.request_quick_add_menu()?;
    Ok(Json(SessionView::of(&session)))
}

#[instrument(skip(state))]
pub async fn select_acquisition(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionView>, CaptureError> {
    let mut session = state.session.lock().await;
    session.select_acquisition(req.kind)?;
    Ok(Json(SessionView::of(&session)))
}

#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Result<Json<SessionView>, CaptureError> {
    let mut session = state.session.lock().await;
    session.close()?;
    Ok(Json(SessionView::of(&session)))
}

/// POST /capture/submit (multipart, single `file` field)
#[instrument(skip(state, mp))]
pub async fn submit_multipart(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<SubmitResponse>, (StatusCode, String)> {
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field.bytes().await.map_err(internal)?;
            return Ok(Json(submit_image(&state, data, &content_type).await));
        }
    }
    Err((StatusCode::BAD_REQUEST, "file field is required".into()))
}

/// POST /capture/submit/json { image: bytes, content_type?: "image/jpeg" }
#[instrument(skip(state, body))]
pub async fn submit_json(
    State(state): State<AppState>,
    Json(body): Json<SubmitImageJson>,
) -> Json<SubmitResponse> {
    let data = Bytes::from(body.image.into_vec());
    Json(submit_image(&state, data, &body.content_type).await)
}

fn internal<E: std::error::Error>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
