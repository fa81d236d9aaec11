//! JSON advisor input

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::health::FinancialHealth;
use crate::investment::{find_option, InvestmentOption, DEFAULT_OPTION};
use crate::loan::{LoanInfo, PrepaymentPlan};

fn default_surplus() -> f64 {
    20_000.0
}

fn default_investment() -> String {
    DEFAULT_OPTION.to_string()
}

/// Everything needed for one advisory run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorInput {
    pub loan: LoanInfo,

    #[serde(default)]
    pub prepayment: PrepaymentPlan,

    #[serde(default)]
    pub financial_health: FinancialHealth,

    /// Monthly surplus available to prepay or invest
    #[serde(default = "default_surplus")]
    pub surplus_amount: f64,

    /// Catalog option name, ignored when `custom_investment` is set
    #[serde(default = "default_investment")]
    pub investment: String,

    #[serde(default)]
    pub custom_investment: Option<InvestmentOption>,

    /// Simulation start; callers substitute today when absent
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl Default for AdvisorInput {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN);
        let mut loan = LoanInfo::new(start, 5_000_000.0, 240, 45_000.0, 7.5);
        loan.prepayment_penalty = 2.0;
        Self {
            loan,
            prepayment: PrepaymentPlan::none(),
            financial_health: FinancialHealth::default(),
            surplus_amount: default_surplus(),
            investment: default_investment(),
            custom_investment: None,
            as_of: None,
        }
    }
}

impl AdvisorInput {
    /// Read and validate an input file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let input = Self::from_json(&text)?;
        log::debug!("loaded advisor input from {}", path.display());
        Ok(input)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let input: Self = serde_json::from_str(text)?;
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<()> {
        self.loan.validate()?;
        self.prepayment.validate()?;
        self.financial_health.validate()?;
        if !(self.surplus_amount >= 0.0) {
            return Err(AdvisorError::invalid("surplus_amount", "must not be negative"));
        }
        if let Some(custom) = &self.custom_investment {
            if custom.tax_rate < 0.0 || custom.tax_rate > 100.0 {
                return Err(AdvisorError::invalid("custom_investment.tax_rate", "must be between 0 and 100"));
            }
        }
        self.investment_option().map(|_| ())
    }

    /// The custom option if given, otherwise the named catalog option
    pub fn investment_option(&self) -> Result<InvestmentOption> {
        match &self.custom_investment {
            Some(option) => Ok(option.clone()),
            None => find_option(&self.investment),
        }
    }

    /// `as_of` from the file, or `fallback`
    pub fn simulation_start(&self, fallback: NaiveDate) -> NaiveDate {
        self.as_of.unwrap_or(fallback)
    }

    /// Outstanding balance at the simulation start
    pub fn outstanding_principal(&self, as_of: NaiveDate) -> f64 {
        self.loan.outstanding_principal(as_of)
    }
}
