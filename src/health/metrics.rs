//! Derived household ratios

use serde::{Deserialize, Serialize};

use crate::loan::LoanInfo;
use super::profile::FinancialHealth;

/// Ratios are in percent. Any ratio whose denominator is zero resolves to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub total_monthly_income: f64,
    pub annual_income: f64,

    pub savings_rate: f64,
    pub expense_ratio: f64,
    pub loan_to_income_ratio: f64,

    pub liquid_assets: f64,
    pub investment_assets: f64,
    pub total_assets: f64,
    pub net_worth: f64,

    pub total_liabilities: f64,
    pub debt_to_income_ratio: f64,
    pub debt_to_asset_ratio: f64,

    pub sip_to_income_ratio: f64,
}

impl FinancialMetrics {
    /// Months of 60% of income the liquid assets would cover
    pub fn liquidity_months(&self) -> f64 {
        ratio(self.liquid_assets, self.total_monthly_income * 0.6)
    }

    /// Net worth as a multiple of annual income
    pub fn net_worth_to_income(&self) -> f64 {
        ratio(self.net_worth, self.annual_income)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Derive the ratio set from a profile and the loan's current balance
pub fn calculate_financial_metrics(
    health: &FinancialHealth,
    loan: &LoanInfo,
    outstanding_principal: f64,
) -> FinancialMetrics {
    let total_monthly_income = health.total_monthly_income();
    let annual_income = total_monthly_income * 12.0;

    let liquid_assets = health.emergency_fund + health.liquid_savings;
    let investment_assets = health.total_investments;
    let total_assets = liquid_assets + investment_assets;

    let total_liabilities = outstanding_principal + health.other_loans + health.credit_card_debt;

    FinancialMetrics {
        total_monthly_income,
        annual_income,
        savings_rate: ratio(total_monthly_income - health.monthly_expenses, total_monthly_income) * 100.0,
        expense_ratio: ratio(health.monthly_expenses, total_monthly_income) * 100.0,
        loan_to_income_ratio: ratio(loan.current_emi, total_monthly_income) * 100.0,
        liquid_assets,
        investment_assets,
        total_assets,
        net_worth: total_assets - total_liabilities,
        total_liabilities,
        debt_to_income_ratio: ratio(total_liabilities, annual_income) * 100.0,
        debt_to_asset_ratio: ratio(total_liabilities, total_assets) * 100.0,
        sip_to_income_ratio: ratio(health.monthly_investment_sip, total_monthly_income) * 100.0,
    }
}
