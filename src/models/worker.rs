use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// The submitting identity. Owned by the identity subsystem; shifts only
/// reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Worker {
    pub id: i32,
    pub username: String,
}
