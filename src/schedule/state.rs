//! Running state for a schedule simulation

/// State of the loan between simulated months
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current schedule month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Unrounded outstanding balance
    pub balance: f64,

    /// Unrounded interest accrued so far
    pub cumulative_interest: f64,
}

impl ScheduleState {
    /// Initialize state at the simulation start
    pub fn opening(balance: f64) -> Self {
        Self {
            month: 0,
            balance,
            cumulative_interest: 0.0,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    /// Apply one month: accrue `interest` and retire `principal_applied`
    pub fn apply(&mut self, interest: f64, principal_applied: f64) {
        self.balance -= principal_applied;
        self.cumulative_interest += interest;
    }

    /// Balance retired to within the payoff tolerance
    pub fn is_paid_off(&self, tolerance: f64) -> bool {
        self.balance <= tolerance
    }
}
