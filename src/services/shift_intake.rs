use metrics::counter;
use std::sync::Arc;

use crate::{
    clock::Clock,
    db::ShiftStore,
    error::{ValidationError, START_HOUR_NOT_ALLOWED_MESSAGE},
    models::{
        CreateShiftInput, Shift, ShiftPeriod, ShiftRepresentation, ValidatedShift, Worker,
        ALLOWED_START_HOURS,
    },
    AppResult,
};

/// Validates, persists and renders shift submissions.
#[derive(Clone)]
pub struct ShiftIntake {
    store: Arc<dyn ShiftStore>,
    clock: Arc<dyn Clock>,
}

impl ShiftIntake {
    pub fn new(store: Arc<dyn ShiftStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Runs the submission rules in order and stops at the first failure:
    /// date, start hour, one shift per worker per day, then period mapping.
    ///
    /// The date rule rejects dates after today, although its message speaks
    /// of previous days.
    pub async fn validate(
        &self,
        input: &CreateShiftInput,
        worker: &Worker,
    ) -> AppResult<ValidatedShift> {
        let result = self.check(input, worker).await;

        if let Err(crate::AppError::Validation(err)) = &result {
            tracing::debug!(
                worker_id = worker.id,
                date = %input.date,
                start_hour = input.start_hour,
                field = err.field(),
                "Shift submission rejected"
            );
            counter!("shift_validation_failures_total", "field" => err.field()).increment(1);
        }

        result
    }

    async fn check(&self, input: &CreateShiftInput, worker: &Worker) -> AppResult<ValidatedShift> {
        let today = self.clock.today();
        if today < input.date {
            return Err(ValidationError::InvalidDate.into());
        }

        if !ALLOWED_START_HOURS.contains(&input.start_hour) {
            return Err(ValidationError::InvalidStartHour {
                message: START_HOUR_NOT_ALLOWED_MESSAGE,
            }
            .into());
        }

        if self.store.exists(worker.id, input.date).await? {
            return Err(ValidationError::DuplicateShift.into());
        }

        let shift_period = ShiftPeriod::from_start_hour(input.start_hour)?;

        Ok(ValidatedShift {
            worker: worker.clone(),
            shift_period,
            date: input.date,
        })
    }

    pub async fn create(&self, validated: &ValidatedShift) -> AppResult<Shift> {
        let shift = self
            .store
            .create(&validated.worker, validated.shift_period, validated.date)
            .await?;

        tracing::info!(
            shift_id = shift.id,
            worker_id = validated.worker.id,
            date = %shift.date,
            shift_period = %shift.shift_period,
            "Shift created"
        );
        counter!("shifts_created_total").increment(1);

        Ok(shift)
    }

    pub fn represent(&self, shift: &Shift) -> ShiftRepresentation {
        ShiftRepresentation::from(shift)
    }

    /// validate, create, represent.
    pub async fn submit(
        &self,
        input: &CreateShiftInput,
        worker: &Worker,
    ) -> AppResult<ShiftRepresentation> {
        let validated = self.validate(input, worker).await?;
        let shift = self.create(&validated).await?;
        Ok(self.represent(&shift))
    }
}
