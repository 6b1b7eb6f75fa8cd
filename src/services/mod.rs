pub mod shift_intake;

pub use shift_intake::ShiftIntake;
