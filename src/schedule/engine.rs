//! Core amortization engine for month-by-month loan schedules

use chrono::NaiveDate;

use crate::dates;
use crate::loan::{monthly_rate, round_currency, LoanInfo, PrepaymentPlan};
use super::rows::{AmortizationRow, Schedule};
use super::state::ScheduleState;

/// Hard cap on simulated months (50 years)
pub const MAX_SCHEDULE_MONTHS: u32 = 600;

/// Balance at or below which the loan counts as fully paid
pub const PAYOFF_TOLERANCE: f64 = 0.01;

/// Configuration for a schedule run
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Maximum number of months to simulate
    pub max_months: u32,

    /// Balance treated as fully retired
    pub payoff_tolerance: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_months: MAX_SCHEDULE_MONTHS,
            payoff_tolerance: PAYOFF_TOLERANCE,
        }
    }
}

/// Amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: ScheduleConfig,
}

impl AmortizationEngine {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Generate the schedule for `loan` under `plan`, starting at
    /// `start_date` (labelled month 1) from `opening_balance`
    pub fn generate(
        &self,
        loan: &LoanInfo,
        plan: &PrepaymentPlan,
        start_date: NaiveDate,
        opening_balance: f64,
    ) -> Schedule {
        let rate = monthly_rate(loan.interest_rate);
        let mut schedule = Schedule::new();
        let mut state = ScheduleState::opening(opening_balance);

        while !state.is_paid_off(self.config.payoff_tolerance)
            && state.month < self.config.max_months
        {
            state.advance_month();
            let row = self.calculate_month(loan, plan, rate, start_date, &mut state);
            schedule.add_row(row);
        }

        schedule.final_balance = state.balance;
        schedule.converged = state.is_paid_off(self.config.payoff_tolerance);

        if schedule.converged {
            log::debug!(
                "schedule paid off in {} months, total interest {:.0}",
                schedule.months(),
                schedule.total_interest()
            );
        } else {
            log::warn!(
                "schedule hit the {} month cap with balance {:.2} outstanding (EMI {:.2} vs first-month interest {:.2})",
                self.config.max_months,
                state.balance,
                loan.current_emi,
                opening_balance * rate
            );
        }

        schedule
    }

    /// Calculate one month and update state
    fn calculate_month(
        &self,
        loan: &LoanInfo,
        plan: &PrepaymentPlan,
        rate: f64,
        start_date: NaiveDate,
        state: &mut ScheduleState,
    ) -> AmortizationRow {
        let month = state.month;
        let interest = state.balance * rate;

        // Negative when the EMI does not cover interest
        let scheduled_principal = loan.current_emi - interest;

        let extra = plan.monthly_payment();
        let lumpsum = plan.lumpsum_for(month);

        // Overshoot is forfeited, never carried forward
        let principal_applied = (scheduled_principal + extra + lumpsum).min(state.balance);

        state.apply(interest, principal_applied);

        AmortizationRow {
            month,
            date: dates::month_label(dates::add_months(start_date, month - 1)),
            emi: round_currency(loan.current_emi),
            interest: round_currency(interest),
            principal: round_currency(principal_applied - extra - lumpsum),
            extra: round_currency(extra),
            lumpsum: round_currency(lumpsum),
            balance: round_currency(state.balance),
            cumulative_interest: round_currency(state.cumulative_interest),
        }
    }
}

/// Generate a schedule with the default 600-month cap
pub fn generate_schedule(
    loan: &LoanInfo,
    plan: &PrepaymentPlan,
    start_date: NaiveDate,
    opening_balance: f64,
) -> Schedule {
    AmortizationEngine::default().generate(loan, plan, start_date, opening_balance)
}
