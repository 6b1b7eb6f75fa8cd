use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ShiftStore, WorkerStore};
use crate::{
    clock::Clock,
    models::{Shift, ShiftPeriod, Worker},
    AppError, AppResult,
};

/// In-process `ShiftStore` backed by a `Vec`.
pub struct MemoryShiftStore {
    clock: Arc<dyn Clock>,
    shifts: Mutex<Vec<Shift>>,
    removed_workers: Mutex<HashSet<i32>>,
}

impl MemoryShiftStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            shifts: Mutex::new(Vec::new()),
            removed_workers: Mutex::new(HashSet::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.shifts.lock().await.len()
    }

    /// Simulates the owning user being removed (`ON DELETE SET NULL`).
    pub async fn detach_worker(&self, worker_id: i32) {
        self.removed_workers.lock().await.insert(worker_id);
        let mut shifts = self.shifts.lock().await;
        for shift in shifts.iter_mut() {
            if shift.worker.as_ref().map(|w| w.id) == Some(worker_id) {
                shift.worker = None;
            }
        }
    }
}

#[async_trait]
impl ShiftStore for MemoryShiftStore {
    async fn exists(&self, worker_id: i32, date: NaiveDate) -> AppResult<bool> {
        let shifts = self.shifts.lock().await;
        Ok(shifts
            .iter()
            .any(|s| s.date == date && s.worker.as_ref().map(|w| w.id) == Some(worker_id)))
    }

    async fn create(
        &self,
        worker: &Worker,
        shift_period: ShiftPeriod,
        date: NaiveDate,
    ) -> AppResult<Shift> {
        if self.removed_workers.lock().await.contains(&worker.id) {
            return Err(AppError::Unauthorized(format!(
                "Worker {} no longer exists",
                worker.id
            )));
        }

        let mut shifts = self.shifts.lock().await;
        let shift = Shift {
            id: shifts.len() as i64 + 1,
            date,
            created_at: self.clock.now(),
            shift_period,
            worker: Some(worker.clone()),
        };
        shifts.push(shift.clone());
        Ok(shift)
    }

    async fn list_for_worker(&self, worker_id: i32) -> AppResult<Vec<Shift>> {
        let shifts = self.shifts.lock().await;
        let mut owned: Vec<Shift> = shifts
            .iter()
            .filter(|s| s.worker.as_ref().map(|w| w.id) == Some(worker_id))
            .cloned()
            .collect();
        owned.sort_by_key(|s| (s.date, s.id));
        Ok(owned)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Shift>> {
        let shifts = self.shifts.lock().await;
        Ok(shifts.iter().find(|s| s.id == id).cloned())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// In-process `WorkerStore` keyed by auth id.
#[derive(Default)]
pub struct MemoryWorkerStore {
    workers: HashMap<String, Worker>,
}

impl MemoryWorkerStore {
    pub fn with_worker(mut self, auth_id: &str, id: i32, username: &str) -> Self {
        self.workers.insert(
            auth_id.to_string(),
            Worker {
                id,
                username: username.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl WorkerStore for MemoryWorkerStore {
    async fn find_by_auth_id(&self, auth_id: &str) -> AppResult<Option<Worker>> {
        Ok(self.workers.get(auth_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn alice() -> Worker {
        Worker {
            id: 1,
            username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let clock = FixedClock::on(date(2026, 5, 1));
        let store = MemoryShiftStore::new(Arc::new(clock));

        let first = store.create(&alice(), ShiftPeriod::Day, date(2026, 5, 1)).await.unwrap();
        let second = store.create(&alice(), ShiftPeriod::Night, date(2026, 4, 30)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, clock.0);
        assert!(store.exists(1, date(2026, 5, 1)).await.unwrap());
        assert!(!store.exists(2, date(2026, 5, 1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_date() {
        let store = MemoryShiftStore::new(Arc::new(FixedClock::on(date(2026, 5, 1))));
        store.create(&alice(), ShiftPeriod::Day, date(2026, 5, 1)).await.unwrap();
        store.create(&alice(), ShiftPeriod::Night, date(2026, 4, 2)).await.unwrap();

        let listed = store.list_for_worker(1).await.unwrap();
        let dates: Vec<NaiveDate> = listed.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2026, 4, 2), date(2026, 5, 1)]);
    }

    #[tokio::test]
    async fn test_detached_shift_no_longer_counts() {
        let store = MemoryShiftStore::new(Arc::new(FixedClock::on(date(2026, 5, 1))));
        let shift = store.create(&alice(), ShiftPeriod::Day, date(2026, 5, 1)).await.unwrap();

        store.detach_worker(1).await;

        assert!(!store.exists(1, date(2026, 5, 1)).await.unwrap());
        assert_eq!(store.get(shift.id).await.unwrap().unwrap().worker, None);

        let err = store
            .create(&alice(), ShiftPeriod::Day, date(2026, 4, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
