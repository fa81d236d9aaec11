//! Investment alternatives and compound-growth projection

mod options;
mod projector;

pub use options::{InvestmentOption, RiskLevel, default_catalog, find_option, DEFAULT_OPTION};
pub use projector::{Injection, future_value, yearly_injections};
