//! End-to-end advisory run over one input

use chrono::NaiveDate;
use serde::Serialize;

use crate::advice::{
    advisor_insights, generate_recommendation, optimal_prepayment_strategy, AdvisorInsight,
    InsightContext, OptimalPrepaymentStrategy, Recommendation,
};
use crate::config::AdvisorInput;
use crate::error::Result;
use crate::health::{
    calculate_financial_metrics, detailed_insights, financial_health_score, FinancialMetrics,
    HealthScore,
};
use crate::investment::InvestmentOption;
use crate::scenario::{PlanComparison, ScenarioCatalog, ScenarioComparator};
use crate::schedule::ScheduleSummary;

/// All advisory output for one input, as of one date
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorReport {
    pub as_of: NaiveDate,
    pub investment: InvestmentOption,
    pub months_elapsed: i32,
    pub remaining_tenure: u32,
    pub outstanding_principal: f64,
    pub baseline: ScheduleSummary,
    pub plan: ScheduleSummary,
    pub comparison: PlanComparison,
    pub scenarios: ScenarioCatalog,
    pub recommendation: Recommendation,
    pub optimal_strategy: OptimalPrepaymentStrategy,
    pub metrics: FinancialMetrics,
    pub health_score: HealthScore,
    pub health_insights: Vec<String>,
    pub insights: Vec<AdvisorInsight>,
    /// Set when either schedule hit the month cap before paying off
    pub warnings: Vec<String>,
}

impl AdvisorReport {
    pub fn is_reliable(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Run schedules, comparison, scenario catalog, advice and health scoring
pub fn build_report(input: &AdvisorInput, as_of: NaiveDate) -> Result<AdvisorReport> {
    let investment = input.investment_option()?;
    let loan = &input.loan;
    let health = &input.financial_health;
    let outstanding = loan.outstanding_principal(as_of);

    let comparator = ScenarioComparator::new(loan.clone(), investment.clone(), as_of, outstanding);
    let baseline = comparator.baseline();
    let plan_schedule = comparator.run(&input.prepayment);
    let comparison = comparator.compare_plan(&input.prepayment);
    let scenarios = comparator.scenario_catalog(input.surplus_amount);

    let recommendation = generate_recommendation(loan, health, &investment, as_of);
    let optimal_strategy = optimal_prepayment_strategy(
        input.surplus_amount,
        loan,
        health,
        investment.post_tax_return(),
        as_of,
    );

    let metrics = calculate_financial_metrics(health, loan, outstanding);
    let health_score = financial_health_score(&metrics);
    let health_insights = detailed_insights(&metrics, health);

    let insights = advisor_insights(&InsightContext {
        loan,
        health,
        plan: &input.prepayment,
        investment: &investment,
        comparison: &comparison,
        outstanding_principal: outstanding,
        surplus: input.surplus_amount,
        as_of,
    });

    let mut warnings = Vec::new();
    if !loan.amortizes(outstanding) {
        warnings.push(format!(
            "EMI of {:.0} does not cover the first month's interest of {:.0}",
            loan.current_emi,
            loan.first_month_interest(outstanding)
        ));
    }
    if !baseline.converged {
        warnings.push(format!(
            "The baseline schedule is still open after {} months",
            baseline.months()
        ));
    }
    if !plan_schedule.converged {
        warnings.push(format!(
            "The prepayment plan does not pay off the loan within {} months",
            plan_schedule.months()
        ));
    }

    log::debug!(
        "report as of {}: outstanding {:.0}, plan saves {:.0} over {} months",
        as_of,
        outstanding,
        comparison.interest_saved,
        comparison.months_saved
    );

    Ok(AdvisorReport {
        as_of,
        investment,
        months_elapsed: loan.months_elapsed(as_of),
        remaining_tenure: loan.remaining_tenure(as_of),
        outstanding_principal: outstanding,
        baseline: baseline.summary(),
        plan: plan_schedule.summary(),
        comparison,
        scenarios,
        recommendation,
        optimal_strategy,
        metrics,
        health_score,
        health_insights,
        insights,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::PrepaymentPlan;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    #[test]
    fn test_default_input_report() {
        let mut input = AdvisorInput::default();
        input.prepayment = PrepaymentPlan::monthly(10_000.0);
        let report = build_report(&input, as_of()).unwrap();

        // 2020-01 to 2026-10
        assert_eq!(report.months_elapsed, 81);
        assert_eq!(report.remaining_tenure, 159);
        assert!(report.outstanding_principal < 5_000_000.0);
        assert!(report.is_reliable());
        assert!(report.plan.total_months < report.baseline.total_months);
        assert!(report.comparison.interest_saved > 0.0);
        assert_eq!(report.scenarios.entries.len(), 6);
        assert!(report.recommendation.penalty_note.is_some());
        assert!(!report.insights.is_empty());
        assert!(!report.health_insights.is_empty());
    }

    #[test]
    fn test_report_is_deterministic() {
        let input = AdvisorInput::default();
        let a = serde_json::to_string(&build_report(&input, as_of()).unwrap()).unwrap();
        let b = serde_json::to_string(&build_report(&input, as_of()).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_infeasible_loan_warns() {
        let mut input = AdvisorInput::default();
        input.loan.current_emi = 10_000.0;
        input.loan.custom_outstanding_principal = Some(5_000_000.0);
        let report = build_report(&input, as_of()).unwrap();
        assert!(!report.is_reliable());
        assert!(!report.comparison.is_reliable());
    }
}
