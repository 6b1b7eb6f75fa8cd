use async_trait::async_trait;
use sqlx::PgPool;

use crate::{models::Worker, AppResult};

/// Read-only view of the identity subsystem's users.
#[async_trait]
pub trait WorkerStore: Send + Sync {
    async fn find_by_auth_id(&self, auth_id: &str) -> AppResult<Option<Worker>>;
}

pub struct PgWorkerStore {
    db: PgPool,
}

impl PgWorkerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkerStore for PgWorkerStore {
    async fn find_by_auth_id(&self, auth_id: &str) -> AppResult<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"SELECT id, username FROM "Users" WHERE auth_id = $1"#,
        )
        .bind(auth_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(worker)
    }
}
