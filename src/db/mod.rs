pub mod pool;
pub mod shift_store;
pub mod worker_store;

#[cfg(test)]
pub mod memory;

pub use pool::{create_pool, run_migrations};
pub use shift_store::{PgShiftStore, ShiftStore};
pub use worker_store::{PgWorkerStore, WorkerStore};
