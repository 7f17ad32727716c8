//! `POST /api/chat`

use astrix_core::{ChatReply, ChatRequest, CoreError};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use super::{ensure_configured, parse_json};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, HttpError> {
    ensure_configured(&state)?;
    let request: ChatRequest = parse_json(&body)?;

    let reply = state.service.chat(&request).await.map_err(|err| match err {
        CoreError::Validation(message) => HttpError::bad_request(message, "Provide chat message text"),
        other => other.into(),
    })?;
    Ok(Json(reply))
}
