//! Prioritized advisory cards built from a plan comparison and the household profile

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::format::{format_currency, format_large_number};
use crate::health::FinancialHealth;
use crate::investment::InvestmentOption;
use crate::loan::{LoanInfo, PrepaymentPlan};
use crate::scenario::PlanComparison;
use super::recommendation::{EmergencyStatus, LoanAge};

/// Principal repayment deduction cap (section 80C)
pub const PRINCIPAL_DEDUCTION_CAP: f64 = 150_000.0;
/// Home-loan interest deduction cap (section 24(b))
pub const INTEREST_DEDUCTION_CAP: f64 = 200_000.0;
/// Marginal tax rate assumed for deduction value
pub const MARGINAL_TAX_RATE: f64 = 0.31;

const OPPORTUNITY_COST_THRESHOLD: f64 = 100_000.0;
const COMMITMENT_LIMIT: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightCategory {
    FinancialSafety,
    LoanLifecycle,
    CurrentStrategy,
    WealthBuilding,
    TaxOptimization,
    RiskManagement,
    OpportunityCost,
    Timeline,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::FinancialSafety => "Financial Safety",
            InsightCategory::LoanLifecycle => "Loan Lifecycle",
            InsightCategory::CurrentStrategy => "Current Strategy",
            InsightCategory::WealthBuilding => "Wealth Building",
            InsightCategory::TaxOptimization => "Tax Optimization",
            InsightCategory::RiskManagement => "Risk Management",
            InsightCategory::OpportunityCost => "Opportunity Cost",
            InsightCategory::Timeline => "Timeline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorInsight {
    pub category: InsightCategory,
    pub priority: InsightPriority,
    pub title: String,
    pub analysis: String,
    pub recommendation: String,
    pub impact: String,
}

/// Everything the insight rules read
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub loan: &'a LoanInfo,
    pub health: &'a FinancialHealth,
    pub plan: &'a PrepaymentPlan,
    pub investment: &'a InvestmentOption,
    pub comparison: &'a PlanComparison,
    pub outstanding_principal: f64,
    pub surplus: f64,
    pub as_of: NaiveDate,
}

impl InsightContext<'_> {
    fn rate_differential(&self) -> f64 {
        self.investment.post_tax_return() - self.loan.interest_rate
    }

    fn remaining_months(&self) -> u32 {
        self.loan.remaining_tenure(self.as_of)
    }
}

fn years_months(months: i64) -> String {
    let months = months.max(0);
    format!("{}y {}m", months / 12, months % 12)
}

fn insight(
    category: InsightCategory,
    priority: InsightPriority,
    title: impl Into<String>,
    analysis: String,
    recommendation: String,
    impact: impl Into<String>,
) -> AdvisorInsight {
    AdvisorInsight {
        category,
        priority,
        title: title.into(),
        analysis,
        recommendation,
        impact: impact.into(),
    }
}

fn emergency_fund(ctx: &InsightContext) -> AdvisorInsight {
    let health = ctx.health;
    let months = health.emergency_months();

    match EmergencyStatus::from_months(months) {
        EmergencyStatus::Critical => {
            let target = health.monthly_expenses * 6.0;
            let mut recommendation = format!(
                "Stop all prepayments and investments. Redirect your entire surplus of {}/month to build the emergency fund to at least {} (6 months).",
                format_currency(ctx.surplus),
                format_currency(target)
            );
            if ctx.surplus > 0.0 {
                let needed = ((target - health.emergency_fund) / ctx.surplus).ceil().max(0.0);
                recommendation.push_str(&format!(" This will take approximately {:.0} months.", needed));
            }
            insight(
                InsightCategory::FinancialSafety,
                InsightPriority::Critical,
                "Critical: Emergency Fund Insufficient",
                format!(
                    "Your emergency fund of {} covers only {:.1} months of expenses. This is below the minimum recommended 3 months and puts you at significant financial risk.",
                    format_currency(health.emergency_fund),
                    months
                ),
                recommendation,
                "Protects you from financial emergencies and job loss",
            )
        }
        EmergencyStatus::Low => insight(
            InsightCategory::FinancialSafety,
            InsightPriority::High,
            "Emergency Fund Needs Strengthening",
            format!(
                "Your emergency fund covers {:.1} months. While above minimum, it's below the recommended 6-12 months for optimal security.",
                months
            ),
            format!(
                "Allocate 30-40% of surplus ({}/month) to the emergency fund until you reach {} (8 months). Continue with reduced prepayment and investment.",
                format_currency(ctx.surplus * 0.35),
                format_currency(health.monthly_expenses * 8.0)
            ),
            "Improves financial resilience and peace of mind",
        ),
        EmergencyStatus::Adequate | EmergencyStatus::Good => insight(
            InsightCategory::FinancialSafety,
            InsightPriority::Low,
            "Emergency Fund Strong",
            format!(
                "Your emergency fund of {} covers {:.1} months of expenses. You're well-protected against financial shocks.",
                format_currency(health.emergency_fund),
                months
            ),
            "Maintain the current emergency fund level. You can pursue prepayment or investment strategies with confidence.".to_string(),
            "Strong financial foundation established",
        ),
    }
}

fn loan_lifecycle(ctx: &InsightContext) -> AdvisorInsight {
    let loan = ctx.loan;
    let elapsed = loan.months_elapsed(ctx.as_of);
    let remaining = ctx.remaining_months();
    let progress = elapsed as f64 / loan.original_tenure as f64 * 100.0;
    let diff = ctx.rate_differential();
    let age_years = elapsed as f64 / 12.0;
    let remaining_years = remaining as f64 / 12.0;

    match LoanAge::from_months_elapsed(elapsed) {
        LoanAge::New => insight(
            InsightCategory::LoanLifecycle,
            InsightPriority::High,
            "Early Stage Loan - Maximum Flexibility",
            format!(
                "Your loan is {:.1} years old ({:.0}% complete) with {:.1} years ahead. The interest component is highest now, but you also have maximum time for investments to compound.",
                age_years, progress, remaining_years
            ),
            if diff > 1.0 {
                format!(
                    "With {:.0} years remaining and investment returns ({:.1}%) exceeding the loan rate ({}%), prioritize wealth building: 70-80% to investments, 20-30% to prepayment.",
                    remaining_years,
                    ctx.investment.post_tax_return(),
                    loan.interest_rate
                )
            } else {
                "Even though the loan rate is higher, consider a 50-50 split. You have time to build wealth while managing debt, and you'll need liquidity for life events.".to_string()
            },
            format!(
                "The right split could add {} of wealth over the loan tenure",
                format_large_number((diff * ctx.surplus * ctx.comparison.plan_months as f64 / 100.0).abs())
            ),
        ),
        LoanAge::Mid => insight(
            InsightCategory::LoanLifecycle,
            InsightPriority::High,
            "Mid-Stage Loan - Balance is Key",
            format!(
                "Your loan is {:.1} years old ({:.0}% complete). The interest/principal split is becoming more balanced.",
                age_years, progress
            ),
            if diff > 0.5 {
                format!(
                    "Continue a balanced approach tilted towards investment (60-40). Target {} in investments by loan completion.",
                    format_currency(ctx.health.total_investments * 2.0)
                )
            } else {
                format!(
                    "Shift focus to debt reduction (60-40 towards prepayment). This frees up the EMI for retirement savings in {:.0} years.",
                    remaining_years
                )
            },
            "Sets the foundation for debt-free retirement years",
        ),
        LoanAge::Mature => {
            let left = remaining as i64 - ctx.comparison.months_saved;
            insight(
                InsightCategory::LoanLifecycle,
                InsightPriority::High,
                "Final Stage - Finish Line in Sight",
                format!(
                    "Your loan is {:.1} years old ({:.0}% complete). Only {:.1} years remaining; the principal component is now dominant.",
                    age_years, progress, remaining_years
                ),
                if remaining <= 36 {
                    format!(
                        "With less than 3 years left, consider aggressive prepayment (80-20). With the current plan you could be debt-free in {}.",
                        years_months(left)
                    )
                } else {
                    format!(
                        "Focus on debt closure (70-30 towards prepayment). Your EMI of {} will become available for investments.",
                        format_currency(loan.current_emi)
                    )
                },
                format!(
                    "Becoming debt-free frees up {}/month for retirement or other goals",
                    format_currency(loan.current_emi)
                ),
            )
        }
    }
}

fn current_strategy(ctx: &InsightContext) -> AdvisorInsight {
    let cmp = ctx.comparison;

    if cmp.total_prepayment > 0.0 {
        let net = cmp.net_benefit;
        let mut channels = Vec::new();
        if ctx.plan.enable_monthly {
            channels.push(format!("{}/month", format_currency(ctx.plan.monthly_extra)));
        }
        if ctx.plan.enable_yearly {
            channels.push(format!("{}/year", format_currency(ctx.plan.yearly_amount)));
        }
        if ctx.plan.enable_lumpsum {
            channels.push(format!("{} lumpsums", ctx.plan.lumpsums.len()));
        }

        return insight(
            InsightCategory::CurrentStrategy,
            InsightPriority::High,
            "Your Prepayment Strategy Analysis",
            format!(
                "You're prepaying {} in total ({}). This saves {} in interest ({:.1}% total return, {:.1}% annualized) and reduces the tenure by {}.",
                format_large_number(cmp.total_prepayment),
                channels.join(" + "),
                format_large_number(cmp.interest_saved),
                cmp.total_roi(),
                cmp.annualized_roi(),
                years_months(cmp.months_saved)
            ),
            if net > 0.0 {
                format!(
                    "Prepaying saves {} in interest against {} you'd gain by investing, a net benefit of {}. This return is guaranteed; continue the strategy.",
                    format_large_number(cmp.interest_saved),
                    format_large_number(cmp.investment_gain),
                    format_large_number(net)
                )
            } else {
                format!(
                    "Investing would be better. You'd gain {} from investments against {} saved in interest, a difference of {}. Consider reducing prepayment by 30-40% and investing the difference.",
                    format_large_number(cmp.investment_gain),
                    format_large_number(cmp.interest_saved),
                    format_large_number(net.abs())
                )
            },
            format!(
                "Current strategy: {} - {} {}",
                if net > 0.0 { "Optimal" } else { "Sub-optimal" },
                if net > 0.0 { "gaining" } else { "missing" },
                format_large_number(net.abs())
            ),
        );
    }

    insight(
        InsightCategory::CurrentStrategy,
        InsightPriority::High,
        "No Prepayment Strategy Active",
        format!(
            "You're not making any prepayments. Your loan will take the full {:.1} years and you'll pay {} in total interest.",
            cmp.baseline_months as f64 / 12.0,
            format_large_number(cmp.baseline_interest)
        ),
        format!(
            "Start with a modest prepayment of {}/month (30% of surplus). This alone could save about {} in interest and cut roughly {} years off the tenure.",
            format_currency(ctx.surplus * 0.3),
            format_large_number(cmp.baseline_interest * 0.15),
            (cmp.baseline_months as f64 * 0.15 / 12.0).floor()
        ),
        "Even small prepayments can save lakhs in interest",
    )
}

fn wealth_building(ctx: &InsightContext) -> AdvisorInsight {
    let health = ctx.health;
    let ratio = if ctx.outstanding_principal > 0.0 {
        health.total_investments / ctx.outstanding_principal
    } else {
        0.0
    };
    let remaining_years = ctx.remaining_months() as f64 / 12.0;
    let strong = ratio > 0.5;

    insight(
        InsightCategory::WealthBuilding,
        if ratio < 0.3 { InsightPriority::High } else { InsightPriority::Medium },
        if strong { "Strong Investment Portfolio" } else { "Investment Portfolio Needs Attention" },
        format!(
            "Your investments ({}) are {:.0}% of your loan ({}). Monthly SIP: {}.",
            format_large_number(health.total_investments),
            ratio * 100.0,
            format_large_number(ctx.outstanding_principal),
            format_currency(health.monthly_investment_sip)
        ),
        if strong {
            let projected = health.total_investments
                * (1.0 + ctx.investment.post_tax_return() / 100.0).powf(remaining_years);
            format!(
                "Healthy asset-to-debt ratio. Continue the SIP and consider raising it 10% a year. Over the {:.0} years left, your investments could grow to {}.",
                remaining_years,
                format_large_number(projected)
            )
        } else {
            format!(
                "Your investments are low relative to debt. Increase the SIP to at least {} (add {} from surplus) and aim to match the loan amount by loan completion.",
                format_currency(health.monthly_investment_sip + ctx.surplus * 0.4),
                format_currency(ctx.surplus * 0.4)
            )
        },
        "Building parallel wealth provides options and security",
    )
}

fn tax_optimization(ctx: &InsightContext) -> AdvisorInsight {
    let annual_prepayment = ctx.plan.annual_commitment();
    let estimated_interest = ctx.outstanding_principal * ctx.loan.interest_rate / 100.0;
    let claimed_principal = annual_prepayment.min(PRINCIPAL_DEDUCTION_CAP);

    let recommendation = if annual_prepayment < PRINCIPAL_DEDUCTION_CAP {
        format!(
            "You're not using the full 80C principal deduction. Raise annual prepayment to {} ({}/month) to claim the full {} benefit at a 31% tax rate.",
            format_currency(PRINCIPAL_DEDUCTION_CAP),
            format_currency(PRINCIPAL_DEDUCTION_CAP / 12.0),
            format_currency(PRINCIPAL_DEDUCTION_CAP * MARGINAL_TAX_RATE)
        )
    } else if estimated_interest > INTEREST_DEDUCTION_CAP {
        "You're already claiming the maximum 24(b) interest deduction. Reducing principal faster lowers future interest.".to_string()
    } else {
        format!(
            "You're claiming both 80C and 24(b) deductions. Total annual tax saving: approximately {}.",
            format_currency(
                claimed_principal * MARGINAL_TAX_RATE
                    + estimated_interest.min(INTEREST_DEDUCTION_CAP) * MARGINAL_TAX_RATE
            )
        )
    };

    insight(
        InsightCategory::TaxOptimization,
        if annual_prepayment < PRINCIPAL_DEDUCTION_CAP { InsightPriority::Medium } else { InsightPriority::Low },
        "Tax Benefits Analysis",
        format!(
            "Annual prepayment: {}. Estimated interest: {}. Principal qualifies under 80C up to {} and interest under 24(b) up to {}.",
            format_currency(annual_prepayment),
            format_currency(estimated_interest),
            format_currency(PRINCIPAL_DEDUCTION_CAP),
            format_currency(INTEREST_DEDUCTION_CAP)
        ),
        recommendation,
        format!(
            "Potential tax savings: {}/year",
            format_currency((PRINCIPAL_DEDUCTION_CAP - claimed_principal) * MARGINAL_TAX_RATE)
        ),
    )
}

fn risk_management(ctx: &InsightContext) -> AdvisorInsight {
    let commitment = ctx.loan.current_emi + ctx.plan.monthly_payment() + ctx.health.monthly_investment_sip;
    // Income approximated as twice the expenses
    let estimated_income = ctx.health.monthly_expenses * 2.0;
    let ratio = if estimated_income > 0.0 { commitment / estimated_income } else { 0.0 };
    let high = ratio > COMMITMENT_LIMIT;

    insight(
        InsightCategory::RiskManagement,
        if high { InsightPriority::High } else { InsightPriority::Low },
        if high { "High Financial Commitment" } else { "Healthy Financial Commitment" },
        format!(
            "Total monthly commitment: {} (EMI + prepayment + SIP). This is {:.0}% of estimated income.",
            format_currency(commitment),
            ratio * 100.0
        ),
        if high {
            format!(
                "Your commitments are high. Reduce prepayment by 30% and keep it as flexible savings, and build a buffer of {} for 3 months of commitments.",
                format_currency(commitment * 3.0)
            )
        } else {
            format!(
                "Sustainable commitment level. You have room to add up to {} of prepayment or investment if desired.",
                format_currency((COMMITMENT_LIMIT - ratio) * estimated_income)
            )
        },
        "Ensures financial sustainability and reduces stress",
    )
}

fn opportunity_cost(ctx: &InsightContext) -> Option<AdvisorInsight> {
    let cmp = ctx.comparison;
    let invested_value = cmp.total_prepayment + cmp.investment_gain;
    let cost = invested_value - cmp.total_prepayment - cmp.interest_saved;
    if cost.abs() <= OPPORTUNITY_COST_THRESHOLD {
        return None;
    }

    Some(insight(
        InsightCategory::OpportunityCost,
        InsightPriority::Medium,
        if cost > 0.0 { "Significant Investment Opportunity" } else { "Prepayment is Optimal" },
        format!(
            "Investing your prepayments instead would leave you with {} against {} saved in interest. Net difference: {}.",
            format_large_number(invested_value),
            format_large_number(cmp.interest_saved),
            format_large_number(cost.abs())
        ),
        if cost > 0.0 {
            format!(
                "The numbers favor investing. A hybrid of 40% prepayment and 60% investment would still save {} in interest while building {} in wealth.",
                format_large_number(cmp.interest_saved * 0.4),
                format_large_number(invested_value * 0.6)
            )
        } else {
            format!(
                "Prepaying is the right choice: {} of guaranteed interest savings beats {} of market gains.",
                format_large_number(cmp.interest_saved),
                format_large_number(cmp.investment_gain)
            )
        },
        format!(
            "A better allocation could improve the outcome by {}",
            format_large_number(cost.abs() * 0.5)
        ),
    ))
}

fn timeline(ctx: &InsightContext) -> AdvisorInsight {
    let cmp = ctx.comparison;
    let years = cmp.plan_months as f64 / 12.0;
    let debt_free = dates::month_label(dates::add_months(ctx.as_of, cmp.plan_months));
    let progress = if cmp.months_saved > 0 {
        format!("You're {} ahead of schedule.", years_months(cmp.months_saved))
    } else {
        "On the original schedule.".to_string()
    };

    let recommendation = if years > 10.0 {
        format!(
            "{:.0} years is a long time. Don't over-commit to prepayment: keep 60% of surplus flexible in investments and prepay 40% for steady progress.",
            ctx.remaining_months() as f64 / 12.0
        )
    } else if years > 5.0 {
        format!(
            "{:.0} years is manageable. Maintain the current pace and add one-time prepayments from bonuses. Each {} prepaid now saves roughly {} in interest.",
            years,
            format_currency(100_000.0),
            format_currency(100_000.0 * ctx.loan.interest_rate / 100.0 * years)
        )
    } else {
        format!(
            "Less than 5 years to go. Consider aggressive prepayment; being debt-free frees up {}/month for other goals.",
            format_currency(ctx.loan.current_emi)
        )
    };

    insight(
        InsightCategory::Timeline,
        InsightPriority::Medium,
        format!("Path to Debt Freedom: {:.1} Years", years),
        format!("Current trajectory: debt-free by {}. {}", debt_free, progress),
        recommendation,
        "Aligns strategy with life stage and goals",
    )
}

/// Build every applicable insight, most urgent first. Ties keep rule order.
pub fn advisor_insights(ctx: &InsightContext) -> Vec<AdvisorInsight> {
    let mut insights = vec![
        emergency_fund(ctx),
        loan_lifecycle(ctx),
        current_strategy(ctx),
        wealth_building(ctx),
        tax_optimization(ctx),
        risk_management(ctx),
    ];
    insights.extend(opportunity_cost(ctx));
    insights.push(timeline(ctx));

    insights.sort_by_key(|i| i.priority);
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::find_option;
    use crate::scenario::ScenarioComparator;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    fn loan() -> LoanInfo {
        LoanInfo::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5_000_000.0, 240, 45_000.0, 7.5)
    }

    fn build(health: &FinancialHealth, plan: &PrepaymentPlan, option: &str) -> Vec<AdvisorInsight> {
        let loan = loan();
        let investment = find_option(option).unwrap();
        let outstanding = loan.outstanding_principal(as_of());
        let comparator = ScenarioComparator::new(loan.clone(), investment.clone(), as_of(), outstanding);
        let comparison = comparator.compare_plan(plan);
        let ctx = InsightContext {
            loan: &loan,
            health,
            plan,
            investment: &investment,
            comparison: &comparison,
            outstanding_principal: outstanding,
            surplus: 20_000.0,
            as_of: as_of(),
        };
        advisor_insights(&ctx)
    }

    fn find(insights: &[AdvisorInsight], category: InsightCategory) -> Option<&AdvisorInsight> {
        insights.iter().find(|i| i.category == category)
    }

    #[test]
    fn test_sorted_by_priority() {
        let insights = build(&FinancialHealth::default(), &PrepaymentPlan::monthly(10_000.0), "Equity Mutual Fund");
        assert!(insights.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert!(insights.len() >= 7);
    }

    #[test]
    fn test_critical_fund_comes_first() {
        let health = FinancialHealth {
            emergency_fund: 0.0,
            ..FinancialHealth::default()
        };
        let insights = build(&health, &PrepaymentPlan::none(), "PPF");
        assert_eq!(insights[0].category, InsightCategory::FinancialSafety);
        assert_eq!(insights[0].priority, InsightPriority::Critical);
        // 570,000 target at 20,000 a month
        assert!(insights[0].recommendation.ends_with("approximately 29 months."));
    }

    #[test]
    fn test_no_strategy_card() {
        let insights = build(&FinancialHealth::default(), &PrepaymentPlan::none(), "PPF");
        let card = find(&insights, InsightCategory::CurrentStrategy).unwrap();
        assert_eq!(card.title, "No Prepayment Strategy Active");
        assert!(find(&insights, InsightCategory::OpportunityCost).is_none());

        let tax = find(&insights, InsightCategory::TaxOptimization).unwrap();
        assert_eq!(tax.priority, InsightPriority::Medium);
        assert_eq!(tax.impact, "Potential tax savings: ₹46,500/year");
    }

    #[test]
    fn test_fd_prepayment_is_optimal() {
        let insights = build(&FinancialHealth::default(), &PrepaymentPlan::monthly(20_000.0), "Fixed Deposit");
        let card = find(&insights, InsightCategory::CurrentStrategy).unwrap();
        assert!(card.impact.starts_with("Current strategy: Optimal"));

        let tax = find(&insights, InsightCategory::TaxOptimization).unwrap();
        assert_eq!(tax.priority, InsightPriority::Low);
    }

    #[test]
    fn test_wealth_priority_by_ratio() {
        let low = FinancialHealth {
            total_investments: 100_000.0,
            ..FinancialHealth::default()
        };
        let insights = build(&low, &PrepaymentPlan::none(), "PPF");
        let card = find(&insights, InsightCategory::WealthBuilding).unwrap();
        assert_eq!(card.priority, InsightPriority::High);
        assert_eq!(card.title, "Investment Portfolio Needs Attention");
    }
}
