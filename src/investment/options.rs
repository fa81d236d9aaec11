//! Investment option catalog

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Qualitative risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

/// An investment alternative to prepaying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOption {
    pub name: String,
    /// Nominal annual return in percent
    pub expected_return: f64,
    /// Flat tax on gains in percent
    pub tax_rate: f64,
    pub risk_level: RiskLevel,
    pub lock_in: String,
}

impl InvestmentOption {
    pub fn new(
        name: &str,
        expected_return: f64,
        tax_rate: f64,
        risk_level: RiskLevel,
        lock_in: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            expected_return,
            tax_rate,
            risk_level,
            lock_in: lock_in.to_string(),
        }
    }

    /// Annual return after tax, in percent
    pub fn post_tax_return(&self) -> f64 {
        self.expected_return * (1.0 - self.tax_rate / 100.0)
    }

    /// Gross value less tax on the gain over `contributed`
    pub fn post_tax_value(&self, gross_value: f64, contributed: f64) -> f64 {
        let tax = (gross_value - contributed) * (self.tax_rate / 100.0);
        gross_value - tax
    }
}

/// Name of the option selected when none is given
pub const DEFAULT_OPTION: &str = "Equity Mutual Fund";

/// The fixed catalog offered to users
pub fn default_catalog() -> Vec<InvestmentOption> {
    vec![
        InvestmentOption::new("Equity Mutual Fund", 12.0, 10.0, RiskLevel::High, "None"),
        InvestmentOption::new("Debt Mutual Fund", 7.5, 20.0, RiskLevel::Low, "None"),
        InvestmentOption::new("Fixed Deposit", 6.5, 30.0, RiskLevel::VeryLow, "1-5 years"),
        InvestmentOption::new("PPF", 7.1, 0.0, RiskLevel::VeryLow, "15 years"),
    ]
}

/// Look up a catalog option by name (case-insensitive)
pub fn find_option(name: &str) -> Result<InvestmentOption> {
    default_catalog()
        .into_iter()
        .find(|o| o.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| AdvisorError::UnknownInvestment(name.to_string()))
}
