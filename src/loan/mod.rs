//! Loan data, prepayment plans and loan math primitives

mod data;
pub mod math;
pub mod loader;

pub use data::{LoanInfo, PrepaymentPlan, Lumpsum, Channel};
pub use math::{monthly_rate, emi, outstanding_principal, round_currency};
pub use loader::{load_lumpsums, load_lumpsums_from_reader};
