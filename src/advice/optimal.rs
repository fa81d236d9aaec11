//! Channel-level prepayment suggestion from a rate-differential ladder
//!
//! Independent of the allocation table in `recommendation`: thresholds differ
//! and the output is absolute amounts per channel. Savings figures are rough
//! analytic estimates, not schedule re-runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::format::format_currency;
use crate::health::FinancialHealth;
use crate::loan::{round_currency, LoanInfo, Lumpsum, PrepaymentPlan};

/// Minimum months of non-loan expenses held before any prepayment
pub const EMERGENCY_FUND_MONTHS: f64 = 6.0;

/// Ceiling on the suggested bonus prepayment
pub const LUMPSUM_CEILING: f64 = 200_000.0;

/// Share of the prepayment paid monthly; the rest is paid once a year
const MONTHLY_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn from_rate_differential(diff: f64) -> Self {
        if diff.abs() > 1.5 {
            Confidence::High
        } else if diff.abs() > 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

/// (rate differential strictly above, prepayment ratio, risk profile)
const RATIO_LADDER: [(f64, f64, RiskProfile); 4] = [
    (2.0, 0.3, RiskProfile::Aggressive),
    (0.5, 0.4, RiskProfile::Balanced),
    (-0.5, 0.5, RiskProfile::Balanced),
    (-2.0, 0.6, RiskProfile::Balanced),
];
const LADDER_FLOOR: (f64, RiskProfile) = (0.75, RiskProfile::Aggressive);

fn ladder_ratio(rate_differential: f64) -> (f64, RiskProfile) {
    RATIO_LADDER
        .iter()
        .find(|(threshold, _, _)| rate_differential > *threshold)
        .map(|(_, ratio, risk)| (*ratio, *risk))
        .unwrap_or(LADDER_FLOOR)
}

/// Shift the ratio for loans near the end (more prepayment) or far from it (less)
fn adjust_for_tenure(ratio: f64, risk: RiskProfile, remaining_years: f64) -> (f64, RiskProfile) {
    if remaining_years < 3.0 {
        ((ratio + 0.2).min(0.9), RiskProfile::Aggressive)
    } else if remaining_years > 15.0 {
        ((ratio - 0.15).max(0.2), risk)
    } else {
        (ratio, risk)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalPrepaymentStrategy {
    pub monthly_prepayment: f64,
    pub yearly_prepayment: f64,
    pub lumpsum_prepayment: f64,
    pub total_annual_prepayment: f64,
    pub expected_interest_saved: f64,
    pub expected_months_saved: u32,
    /// Share of the surplus directed at prepayment (0 when the fund gate fails)
    pub prepayment_ratio: f64,
    pub rationale: String,
    pub confidence: Confidence,
    pub risk_profile: RiskProfile,
    /// Months of surplus needed to reach the emergency fund target, when it is unmet
    pub months_to_build_fund: Option<u32>,
}

impl OptimalPrepaymentStrategy {
    fn build_fund_first(surplus: f64, health: &FinancialHealth) -> Self {
        let target = health.monthly_expenses_excluding_loan * EMERGENCY_FUND_MONTHS;
        let months_to_build_fund = (surplus > 0.0 && target > 0.0)
            .then(|| ((target - health.emergency_fund) / surplus).ceil().max(0.0) as u32);

        let mut rationale = if target > 0.0 {
            format!(
                "Build your emergency fund first. Allocate the entire surplus ({}/month) to it until you reach {} (6 months of expenses).",
                format_currency(surplus),
                format_currency(target)
            )
        } else {
            format!(
                "Build your emergency fund first. Allocate the entire surplus ({}/month) to it before committing to prepayment.",
                format_currency(surplus)
            )
        };
        if let Some(months) = months_to_build_fund {
            rationale.push_str(&format!(" This will take about {} months.", months));
        }
        rationale.push_str(" Only then consider prepayment.");

        Self {
            monthly_prepayment: 0.0,
            yearly_prepayment: 0.0,
            lumpsum_prepayment: 0.0,
            total_annual_prepayment: 0.0,
            expected_interest_saved: 0.0,
            expected_months_saved: 0,
            prepayment_ratio: 0.0,
            rationale,
            confidence: Confidence::High,
            risk_profile: RiskProfile::Conservative,
            months_to_build_fund,
        }
    }

    pub fn is_fund_building(&self) -> bool {
        self.total_annual_prepayment == 0.0 && self.risk_profile == RiskProfile::Conservative
    }

    /// Plan form: monthly channel, yearly in month 3, one lumpsum in month 6.
    /// Channels with a zero amount stay disabled.
    pub fn to_plan(&self) -> PrepaymentPlan {
        let lumpsums = if self.lumpsum_prepayment > 0.0 {
            vec![Lumpsum::new(6, self.lumpsum_prepayment, "Suggested bonus prepayment")]
        } else {
            Vec::new()
        };
        PrepaymentPlan {
            enable_monthly: self.monthly_prepayment > 0.0,
            monthly_extra: self.monthly_prepayment,
            enable_yearly: self.yearly_prepayment > 0.0,
            yearly_amount: self.yearly_prepayment,
            yearly_month: 3,
            enable_lumpsum: !lumpsums.is_empty(),
            lumpsums,
        }
    }
}

fn rationale(rate_differential: f64, ratio: f64, loan_rate: f64, post_tax_return: f64, remaining_years: f64) -> String {
    let mut text = if rate_differential > 1.0 {
        format!(
            "Investment returns ({:.1}%) beat the loan rate ({}%) by {:.1}%. Strategy: {:.0}% invest, {:.0}% prepay. This balances guaranteed savings with growth potential.",
            post_tax_return,
            loan_rate,
            rate_differential,
            (1.0 - ratio) * 100.0,
            ratio * 100.0
        )
    } else if rate_differential < -1.0 {
        format!(
            "Loan rate ({}%) exceeds investment returns ({:.1}%) by {:.1}%. Strategy: {:.0}% prepay for guaranteed savings, {:.0}% invest for diversification.",
            loan_rate,
            post_tax_return,
            rate_differential.abs(),
            ratio * 100.0,
            (1.0 - ratio) * 100.0
        )
    } else {
        format!(
            "Returns are similar (loan: {}%, investment: {:.1}%). A balanced approach gives the best risk-return tradeoff.",
            loan_rate, post_tax_return
        )
    };

    if remaining_years < 5.0 {
        text.push_str(&format!(
            " With only {:.1} years left, prioritizing debt closure for financial freedom.",
            remaining_years
        ));
    } else if remaining_years > 15.0 {
        text.push_str(&format!(
            " With {:.0} years remaining, focus on wealth building while managing debt.",
            remaining_years
        ));
    }
    text
}

/// Suggest channel amounts for `monthly_surplus` given the post-tax return
/// of the chosen investment
pub fn optimal_prepayment_strategy(
    monthly_surplus: f64,
    loan: &LoanInfo,
    health: &FinancialHealth,
    post_tax_return: f64,
    as_of: NaiveDate,
) -> OptimalPrepaymentStrategy {
    if !health.has_emergency_cover(EMERGENCY_FUND_MONTHS) {
        log::debug!(
            "emergency fund covers {:.1} months; suggesting fund building",
            health.emergency_months_excluding_loan()
        );
        return OptimalPrepaymentStrategy::build_fund_first(monthly_surplus, health);
    }

    let loan_rate = loan.interest_rate;
    let rate_differential = post_tax_return - loan_rate;
    let remaining_years =
        loan.original_tenure as f64 / 12.0 - dates::loan_age_years(loan.start_date, as_of);

    let (ratio, risk) = ladder_ratio(rate_differential);
    let (ratio, risk_profile) = adjust_for_tenure(ratio, risk, remaining_years);

    let prepayment = round_currency(monthly_surplus * ratio);
    let monthly_prepayment = round_currency(prepayment * MONTHLY_SHARE);
    let yearly_prepayment = round_currency(prepayment * (1.0 - MONTHLY_SHARE) * 12.0);

    let bonus = health.other_income * 12.0;
    let lumpsum_prepayment = if bonus > 0.0 {
        round_currency(bonus * 0.5).min(LUMPSUM_CEILING)
    } else {
        0.0
    };

    let total_annual_prepayment = monthly_prepayment * 12.0 + yearly_prepayment + lumpsum_prepayment;
    let average_monthly = total_annual_prepayment / 12.0;
    let expected_interest_saved = average_monthly * remaining_years * (loan_rate / 100.0) * 0.7;
    let expected_months_saved = if loan.current_emi > 0.0 {
        round_currency(average_monthly / loan.current_emi * 12.0 * 0.8).max(0.0) as u32
    } else {
        0
    };

    OptimalPrepaymentStrategy {
        monthly_prepayment,
        yearly_prepayment,
        lumpsum_prepayment,
        total_annual_prepayment,
        expected_interest_saved,
        expected_months_saved,
        prepayment_ratio: ratio,
        rationale: rationale(rate_differential, ratio, loan_rate, post_tax_return, remaining_years),
        confidence: Confidence::from_rate_differential(rate_differential),
        risk_profile,
        months_to_build_fund: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    fn loan(start: (i32, u32)) -> LoanInfo {
        LoanInfo::new(
            NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
            5_000_000.0,
            240,
            45_000.0,
            7.5,
        )
    }

    #[test]
    fn test_ladder() {
        assert_eq!(ladder_ratio(3.3), (0.3, RiskProfile::Aggressive));
        assert_eq!(ladder_ratio(2.0), (0.4, RiskProfile::Balanced));
        assert_eq!(ladder_ratio(0.0), (0.5, RiskProfile::Balanced));
        assert_eq!(ladder_ratio(-1.0), (0.6, RiskProfile::Balanced));
        assert_eq!(ladder_ratio(-2.0), (0.75, RiskProfile::Aggressive));
    }

    #[test]
    fn test_tenure_adjustment_bounds() {
        assert_eq!(adjust_for_tenure(0.75, RiskProfile::Aggressive, 2.0), (0.9, RiskProfile::Aggressive));
        assert_eq!(adjust_for_tenure(0.3, RiskProfile::Aggressive, 20.0), (0.2, RiskProfile::Aggressive));
        assert_eq!(adjust_for_tenure(0.5, RiskProfile::Balanced, 10.0), (0.5, RiskProfile::Balanced));
    }

    #[test]
    fn test_empty_fund_builds_fund_first() {
        let health = FinancialHealth {
            emergency_fund: 0.0,
            monthly_expenses_excluding_loan: 50_000.0,
            ..FinancialHealth::default()
        };
        let strategy = optimal_prepayment_strategy(20_000.0, &loan((2024, 1)), &health, 10.8, as_of());

        assert!(strategy.is_fund_building());
        assert_eq!(strategy.monthly_prepayment, 0.0);
        assert_eq!(strategy.expected_months_saved, 0);
        assert_eq!(strategy.confidence, Confidence::High);
        // 300,000 target at 20,000 a month
        assert_eq!(strategy.months_to_build_fund, Some(15));
        assert!(!strategy.to_plan().has_active_channel());
    }

    #[test]
    fn test_zero_surplus_reports_no_timeline() {
        let health = FinancialHealth {
            emergency_fund: 0.0,
            ..FinancialHealth::default()
        };
        let strategy = optimal_prepayment_strategy(0.0, &loan((2024, 1)), &health, 10.8, as_of());
        assert!(strategy.months_to_build_fund.is_none());
    }

    #[test]
    fn test_fund_with_no_expenses_passes_gate() {
        let health = FinancialHealth {
            emergency_fund: 10_000_000.0,
            monthly_expenses_excluding_loan: 0.0,
            ..FinancialHealth::default()
        };
        let strategy = optimal_prepayment_strategy(20_000.0, &loan((2024, 1)), &health, 10.8, as_of());

        assert!(!strategy.is_fund_building());
        assert!(strategy.monthly_prepayment > 0.0);
        assert!(strategy.months_to_build_fund.is_none());
        assert!(!strategy.rationale.contains("Build your emergency fund"));
    }

    #[test]
    fn test_no_fund_and_no_expenses_has_no_target() {
        let health = FinancialHealth {
            emergency_fund: 0.0,
            monthly_expenses_excluding_loan: 0.0,
            ..FinancialHealth::default()
        };
        let strategy = optimal_prepayment_strategy(20_000.0, &loan((2024, 1)), &health, 10.8, as_of());

        assert!(strategy.is_fund_building());
        assert!(strategy.months_to_build_fund.is_none());
        assert!(!strategy.rationale.contains("until you reach"));
    }

    #[test]
    fn test_young_loan_strong_edge() {
        // Default profile holds exactly 6 months; ~17.25 years remain
        let strategy = optimal_prepayment_strategy(
            20_000.0,
            &loan((2024, 1)),
            &FinancialHealth::default(),
            10.8,
            as_of(),
        );

        assert_relative_eq!(strategy.prepayment_ratio, 0.2);
        assert_eq!(strategy.risk_profile, RiskProfile::Aggressive);
        assert_eq!(strategy.monthly_prepayment, 2_800.0);
        assert_eq!(strategy.yearly_prepayment, 14_400.0);
        // Half of 12 x 16,667
        assert_eq!(strategy.lumpsum_prepayment, 100_002.0);
        assert_eq!(strategy.total_annual_prepayment, 148_002.0);
        assert_eq!(strategy.expected_months_saved, 3);
        assert_eq!(strategy.confidence, Confidence::High);
        assert!(strategy.rationale.contains("80% invest, 20% prepay"));
        assert!(strategy.rationale.contains("focus on wealth building"));
    }

    #[test]
    fn test_final_years_push_prepayment() {
        // ~2 years remain; PPF 7.1% against 7.5%
        let health = FinancialHealth {
            other_income: 0.0,
            ..FinancialHealth::default()
        };
        let strategy = optimal_prepayment_strategy(20_000.0, &loan((2008, 10)), &health, 7.1, as_of());

        assert_relative_eq!(strategy.prepayment_ratio, 0.7);
        assert_eq!(strategy.risk_profile, RiskProfile::Aggressive);
        assert_eq!(strategy.monthly_prepayment, 9_800.0);
        assert_eq!(strategy.yearly_prepayment, 50_400.0);
        assert_eq!(strategy.lumpsum_prepayment, 0.0);
        assert_eq!(strategy.confidence, Confidence::Low);
        assert!(strategy.rationale.contains("years left"));
    }

    #[test]
    fn test_to_plan() {
        let strategy = optimal_prepayment_strategy(
            20_000.0,
            &loan((2024, 1)),
            &FinancialHealth::default(),
            10.8,
            as_of(),
        );
        let plan = strategy.to_plan();
        assert!(plan.enable_monthly && plan.enable_yearly && plan.enable_lumpsum);
        assert_eq!(plan.yearly_month, 3);
        assert_eq!(plan.lumpsums.len(), 1);
        assert_eq!(plan.lumpsums[0].month, 6);
        assert!(plan.validate().is_ok());
    }
}
