//! HTTP handlers. Each calls exactly one `AstrixService` operation.

pub mod chat;
pub mod speech;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::HttpError;
use crate::state::AppState;

const JSON_HINT: &str = "Send JSON payload";

/// Fail before touching the request body when the credential is missing.
fn ensure_configured(state: &AppState) -> Result<(), HttpError> {
    state.service.config().require_api_key()?;
    Ok(())
}

/// Parse a JSON request body, mapping every failure to a 400.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(HttpError::bad_request("Missing request body", JSON_HINT));
    }
    serde_json::from_slice(body)
        .map_err(|e| HttpError::bad_request(format!("Malformed request body: {e}"), JSON_HINT))
}
