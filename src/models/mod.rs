pub mod shift;
pub mod shift_input;
pub mod worker;

pub use shift::{Shift, ShiftPeriod, ShiftRepresentation, ShiftRow, ALLOWED_START_HOURS};
pub use shift_input::{CreateShiftInput, ValidatedShift};
pub use worker::Worker;
