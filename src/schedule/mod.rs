//! Amortization engine producing month-by-month loan schedules

mod state;
mod engine;
mod rows;

pub use state::ScheduleState;
pub use engine::{
    AmortizationEngine, ScheduleConfig, generate_schedule,
    MAX_SCHEDULE_MONTHS, PAYOFF_TOLERANCE,
};
pub use rows::{AmortizationRow, Schedule, ScheduleSummary};
