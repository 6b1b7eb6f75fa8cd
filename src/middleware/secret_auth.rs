use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::AppState;

pub const DEBUG_KEY_HEADER: &str = "X-Debug-Key";

/// An empty configured key disables the operator routes entirely.
fn check_debug_key(expected: &str, provided: Option<&str>) -> Result<(), StatusCode> {
    if expected.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    let provided = provided.ok_or(StatusCode::UNAUTHORIZED)?;

    if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Guards operator endpoints behind the X-Debug-Key header
pub async fn require_debug_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = request
        .headers()
        .get(DEBUG_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(status) = check_debug_key(&state.config.debug_key, provided) {
        tracing::warn!(
            path = %request.uri().path(),
            status = status.as_u16(),
            "Rejected operator endpoint access"
        );
        return Err(status);
    }

    Ok(next.run(request).await)
}
