use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

pub const INVALID_DATE_MESSAGE: &str = "you cannot create shift for previous days";
pub const START_HOUR_NOT_ALLOWED_MESSAGE: &str = "start hour must be 0, 8, or 16";
pub const START_HOUR_UNMAPPED_MESSAGE: &str = "invalid start hour";
pub const DUPLICATE_SHIFT_MESSAGE: &str = "user already has an existing shift for this day";
pub const FIELD_REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_INTEGER_MESSAGE: &str = "A valid integer is required.";
pub const INVALID_DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// A user-correctable rejection of a shift submission, keyed by the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", INVALID_DATE_MESSAGE)]
    InvalidDate,

    #[error("{message}")]
    InvalidStartHour { message: &'static str },

    #[error("{}", DUPLICATE_SHIFT_MESSAGE)]
    DuplicateShift,

    /// A payload field that is missing or of the wrong shape.
    #[error("{message}")]
    Malformed {
        field: &'static str,
        message: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidDate => "date",
            ValidationError::InvalidStartHour { .. } => "start_hour",
            ValidationError::DuplicateShift => "shift",
            ValidationError::Malformed { field, .. } => *field,
        }
    }

    /// `{ "<field>": "<message>" }`
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.field().to_string(), Value::String(self.to_string()));
        Value::Object(body)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(err) => {
                return (StatusCode::BAD_REQUEST, Json(err.to_body())).into_response();
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_is_keyed_by_field() {
        let err = ValidationError::InvalidStartHour {
            message: START_HOUR_NOT_ALLOWED_MESSAGE,
        };
        assert_eq!(
            err.to_body(),
            json!({"start_hour": "start hour must be 0, 8, or 16"})
        );

        assert_eq!(
            ValidationError::InvalidDate.to_body(),
            json!({"date": "you cannot create shift for previous days"})
        );
        assert_eq!(
            ValidationError::DuplicateShift.to_body(),
            json!({"shift": "user already has an existing shift for this day"})
        );
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::Validation(ValidationError::DuplicateShift).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::NotFound("Shift 1 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Unauthorized("no token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
