pub mod debug;
pub mod health;
pub mod metrics;
pub mod shifts_handler;

pub use debug::{debug_handler, mark_process_start};
pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
