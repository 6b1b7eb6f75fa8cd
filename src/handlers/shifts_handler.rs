use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    extractors::AuthenticatedWorker,
    models::{CreateShiftInput, ShiftRepresentation},
    AppError, AppResult, AppState,
};

/// POST /api/shifts - Submit a shift for the authenticated worker
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = CreateShiftInput,
    responses(
        (status = 201, description = "Shift created", body = ShiftRepresentation),
        (status = 400, description = "Validation failed; body is keyed by field, e.g. {\"start_hour\": \"start hour must be 0, 8, or 16\"}"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "shifts",
    security(("cookie_auth" = []))
)]
pub async fn create_shift(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedWorker,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ShiftRepresentation>)> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Value::Object(body) = body else {
        return Err(AppError::BadRequest("Expected a JSON object".to_string()));
    };
    let input = CreateShiftInput::from_json(&body)?;

    tracing::debug!(
        auth_id = %auth.auth_id,
        worker_id = auth.worker.id,
        date = %input.date,
        start_hour = input.start_hour,
        "create_shift called"
    );

    let shift = match state.intake.submit(&input, &auth.worker).await {
        Ok(shift) => shift,
        Err(e @ AppError::Unauthorized(_)) => {
            state.worker_cache.invalidate(&auth.auth_id).await;
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    Ok((StatusCode::CREATED, Json(shift)))
}

/// GET /api/shifts - Shifts of the authenticated worker, ordered by date
#[utoipa::path(
    get,
    path = "/api/shifts",
    responses(
        (status = 200, description = "The worker's shifts", body = Vec<ShiftRepresentation>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "shifts",
    security(("cookie_auth" = []))
)]
pub async fn list_shifts(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedWorker,
) -> AppResult<Json<Vec<ShiftRepresentation>>> {
    let shifts = state.shifts.list_for_worker(auth.worker.id).await?;

    Ok(Json(
        shifts.iter().map(|s| state.intake.represent(s)).collect(),
    ))
}

/// GET /api/shifts/{id}
#[utoipa::path(
    get,
    path = "/api/shifts/{id}",
    params(
        ("id" = i64, Path, description = "Shift ID")
    ),
    responses(
        (status = 200, description = "The shift", body = ShiftRepresentation),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Shift not found")
    ),
    tag = "shifts",
    security(("cookie_auth" = []))
)]
pub async fn get_shift(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedWorker,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftRepresentation>> {
    let shift = state
        .shifts
        .get(id)
        .await?
        .filter(|s| s.worker.as_ref().map(|w| w.id) == Some(auth.worker.id))
        .ok_or_else(|| AppError::NotFound(format!("Shift {} not found", id)))?;

    Ok(Json(state.intake.represent(&shift)))
}
