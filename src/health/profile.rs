//! Household financial profile

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Snapshot of a borrower's broader finances. All amounts are monthly unless
/// named as a stock (fund, savings, investments, debts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealth {
    // Income
    pub monthly_income: f64,
    #[serde(default)]
    pub other_income: f64,

    // Expenses
    pub monthly_expenses: f64,
    pub monthly_expenses_excluding_loan: f64,

    // Cash reserves
    #[serde(default)]
    pub emergency_fund: f64,
    #[serde(default)]
    pub liquid_savings: f64,

    // Investments
    #[serde(default)]
    pub total_investments: f64,
    #[serde(default)]
    pub monthly_investment_sip: f64,

    // Other liabilities
    #[serde(default)]
    pub other_loans: f64,
    #[serde(default)]
    pub credit_card_debt: f64,

    // Life stage
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub retirement_age: Option<u32>,
    #[serde(default)]
    pub dependents: Option<u32>,
    #[serde(default)]
    pub goal_amount: Option<f64>,
    #[serde(default)]
    pub goal_timeline_years: Option<u32>,
}

impl Default for FinancialHealth {
    fn default() -> Self {
        Self {
            monthly_income: 150_000.0,
            other_income: 16_667.0,
            monthly_expenses: 95_000.0,
            monthly_expenses_excluding_loan: 50_000.0,
            emergency_fund: 300_000.0,
            liquid_savings: 200_000.0,
            total_investments: 1_000_000.0,
            monthly_investment_sip: 15_000.0,
            other_loans: 0.0,
            credit_card_debt: 0.0,
            age: None,
            retirement_age: None,
            dependents: None,
            goal_amount: None,
            goal_timeline_years: None,
        }
    }
}

impl FinancialHealth {
    pub fn total_monthly_income(&self) -> f64 {
        self.monthly_income + self.other_income
    }

    /// Months of total expenses covered by the emergency fund (0 when expenses are 0)
    pub fn emergency_months(&self) -> f64 {
        months_covered(self.emergency_fund, self.monthly_expenses)
    }

    /// Months of non-loan expenses covered by the emergency fund (0 when expenses are 0)
    pub fn emergency_months_excluding_loan(&self) -> f64 {
        months_covered(self.emergency_fund, self.monthly_expenses_excluding_loan)
    }

    /// Whether the fund holds at least `months` of non-loan expenses.
    /// An empty fund never qualifies; a positive fund with no expenses always does.
    pub fn has_emergency_cover(&self, months: f64) -> bool {
        self.emergency_fund > 0.0
            && self.emergency_fund >= months * self.monthly_expenses_excluding_loan
    }

    /// Years left until retirement, when both ages are known
    pub fn years_to_retirement(&self) -> Option<u32> {
        match (self.age, self.retirement_age) {
            (Some(age), Some(retirement)) => Some(retirement.saturating_sub(age)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("financial_health.monthly_income", self.monthly_income),
            ("financial_health.other_income", self.other_income),
            ("financial_health.monthly_expenses", self.monthly_expenses),
            ("financial_health.monthly_expenses_excluding_loan", self.monthly_expenses_excluding_loan),
            ("financial_health.emergency_fund", self.emergency_fund),
            ("financial_health.liquid_savings", self.liquid_savings),
            ("financial_health.total_investments", self.total_investments),
            ("financial_health.monthly_investment_sip", self.monthly_investment_sip),
            ("financial_health.other_loans", self.other_loans),
            ("financial_health.credit_card_debt", self.credit_card_debt),
        ];
        for (field, value) in amounts {
            if !(value >= 0.0) {
                return Err(AdvisorError::invalid(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

fn months_covered(fund: f64, monthly_expenses: f64) -> f64 {
    if monthly_expenses > 0.0 {
        fund / monthly_expenses
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_emergency_months() {
        let health = FinancialHealth::default();
        assert_relative_eq!(health.emergency_months(), 300_000.0 / 95_000.0);
        assert_relative_eq!(health.emergency_months_excluding_loan(), 6.0);
    }

    #[test]
    fn test_zero_expenses_cover_nothing() {
        let health = FinancialHealth {
            monthly_expenses: 0.0,
            monthly_expenses_excluding_loan: 0.0,
            ..FinancialHealth::default()
        };
        assert_eq!(health.emergency_months(), 0.0);
        assert_eq!(health.emergency_months_excluding_loan(), 0.0);
    }

    #[test]
    fn test_emergency_cover() {
        let health = FinancialHealth::default();
        assert!(health.has_emergency_cover(6.0));
        assert!(!health.has_emergency_cover(7.0));

        let no_expenses = FinancialHealth {
            monthly_expenses_excluding_loan: 0.0,
            ..FinancialHealth::default()
        };
        assert!(no_expenses.has_emergency_cover(6.0));

        let empty = FinancialHealth {
            emergency_fund: 0.0,
            monthly_expenses_excluding_loan: 0.0,
            ..FinancialHealth::default()
        };
        assert!(!empty.has_emergency_cover(6.0));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "monthly_income": 100000,
            "monthly_expenses": 60000,
            "monthly_expenses_excluding_loan": 30000
        }"#;
        let health: FinancialHealth = serde_json::from_str(json).unwrap();
        assert_eq!(health.emergency_fund, 0.0);
        assert!(health.years_to_retirement().is_none());
        assert!(health.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let health = FinancialHealth {
            credit_card_debt: -1.0,
            ..FinancialHealth::default()
        };
        assert!(health.validate().is_err());
    }
}
