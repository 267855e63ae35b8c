pub mod scheduler;

pub use scheduler::{CycleOutcome, IngestionScheduler, SchedulerState};
