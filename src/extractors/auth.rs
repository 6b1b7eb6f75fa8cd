use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::future::Future;
use std::sync::Arc;

use crate::{auth, models::Worker, AppError, AppResult, AppState};

/// Extracts the session token from either the __session cookie (frontend) or
/// the Authorization header (testing)
fn extract_token_from_request(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts.headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            // cookie = "name=value; name2=value2"
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(value) = cookie.strip_prefix("__session=") {
                    return Some(value.to_string());
                }
            }
        }
    }

    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    None
}

/// The worker behind the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedWorker {
    pub auth_id: String,
    pub worker: Worker,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedWorker {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = extract_token_from_request(parts);

        let state = state.clone();

        async move {
            let token = token.ok_or_else(|| {
                AppError::Unauthorized(
                    "Missing authentication: no __session cookie or Authorization header"
                        .to_string(),
                )
            })?;

            let claims = auth::validate_jwt(&token, &state.config.jwt_secret).map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AppError::Unauthorized(e)
            })?;

            let auth_id = claims.sub;

            let worker = resolve_worker(&state, &auth_id).await?.ok_or_else(|| {
                tracing::warn!(auth_id, "No worker for authenticated subject");
                AppError::Unauthorized(format!("Worker not found for subject: {}", auth_id))
            })?;

            Ok(AuthenticatedWorker { auth_id, worker })
        }
    }
}

async fn resolve_worker(state: &AppState, auth_id: &str) -> AppResult<Option<Worker>> {
    if let Some(cached) = state.worker_cache.get(auth_id).await {
        tracing::debug!(auth_id, worker_id = cached.id, "Worker resolved from cache");
        return Ok(Some(cached));
    }

    let worker = state.workers.find_by_auth_id(auth_id).await.map_err(|e| {
        tracing::error!(error = %e, auth_id, "Worker lookup failed");
        e
    })?;

    // Misses are not cached so a freshly created user can sign in right away.
    if let Some(worker) = &worker {
        state
            .worker_cache
            .insert(auth_id.to_string(), worker.clone())
            .await;
        tracing::debug!(auth_id, worker_id = worker.id, "Worker cached for future requests");
    }

    Ok(worker)
}
