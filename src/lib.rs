//! Home Loan Advisor - prepay-or-invest simulation for fixed-EMI home loans
//!
//! This library provides:
//! - Month-by-month amortization schedules under monthly, yearly and lumpsum prepayments
//! - Compound-growth projection of the same cash flow invested instead
//! - Plan-vs-baseline and percentage-split scenario comparison
//! - Rule-based allocation advice and a channel-level prepayment strategy
//! - Household financial health scoring
//!
//! Every calculation is a pure function of its inputs; the current date is
//! always passed in explicitly.

pub mod error;
pub mod dates;
pub mod loan;
pub mod schedule;
pub mod investment;
pub mod scenario;
pub mod advice;
pub mod health;
pub mod format;
pub mod config;
pub mod report;

// Re-export commonly used types
pub use error::{AdvisorError, Result};
pub use loan::{LoanInfo, PrepaymentPlan, Lumpsum, Channel};
pub use schedule::{AmortizationEngine, AmortizationRow, Schedule, ScheduleSummary};
pub use investment::{InvestmentOption, RiskLevel};
pub use scenario::{ScenarioComparator, PlanComparison, ScenarioCatalog, SplitScenarioResult};
pub use advice::{Recommendation, OptimalPrepaymentStrategy, AdvisorInsight};
pub use health::{FinancialHealth, FinancialMetrics, HealthScore};
pub use config::AdvisorInput;
pub use report::{build_report, AdvisorReport};
