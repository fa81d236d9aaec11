//! Rule-based prepay/invest allocation by loan age, emergency cover and rate edge
//!
//! Classification is table-driven: the emergency-fund gate runs first, then the
//! first rule in `ALLOCATION_RULES` whose age and condition match decides the
//! split. Narrative text is filled in afterwards from the matched rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::format_currency;
use crate::health::FinancialHealth;
use crate::investment::InvestmentOption;
use crate::loan::LoanInfo;

/// Loan-age bucket by years elapsed: new up to 5, mid up to 15, mature beyond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanAge {
    New,
    Mid,
    Mature,
}

impl LoanAge {
    pub fn from_months_elapsed(months_elapsed: i32) -> Self {
        let years = months_elapsed as f64 / 12.0;
        if years <= 5.0 {
            LoanAge::New
        } else if years <= 15.0 {
            LoanAge::Mid
        } else {
            LoanAge::Mature
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanAge::New => "new",
            LoanAge::Mid => "mid",
            LoanAge::Mature => "mature",
        }
    }
}

/// Emergency-fund cover: critical under 3 months, low under 6, adequate under 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyStatus {
    Critical,
    Low,
    Adequate,
    Good,
}

impl EmergencyStatus {
    pub fn from_months(months: f64) -> Self {
        if months < 3.0 {
            EmergencyStatus::Critical
        } else if months < 6.0 {
            EmergencyStatus::Low
        } else if months < 12.0 {
            EmergencyStatus::Adequate
        } else {
            EmergencyStatus::Good
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Critical,
    High,
    Good,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub level: PriorityLevel,
    pub title: String,
    pub description: String,
}

impl Priority {
    fn new(level: PriorityLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Condition on the rate differential (post-tax return minus loan rate) or
/// the remaining tenure
#[derive(Debug, Clone, Copy, PartialEq)]
enum Condition {
    DiffAbove(f64),
    DiffBelow(f64),
    RemainingAtMost(u32),
    Always,
}

impl Condition {
    fn holds(&self, rate_differential: f64, remaining_months: u32) -> bool {
        match *self {
            Condition::DiffAbove(t) => rate_differential > t,
            Condition::DiffBelow(t) => rate_differential < t,
            Condition::RemainingAtMost(m) => remaining_months <= m,
            Condition::Always => true,
        }
    }
}

/// One row of the allocation table. Descriptions may reference `{post_tax}`,
/// `{loan_rate}`, `{years_left}` and `{tenure_years}`.
struct AllocationRule {
    age: LoanAge,
    condition: Condition,
    strategy: &'static str,
    prepayment_percent: f64,
    investment_percent: f64,
    title: &'static str,
    description: &'static str,
    priority_title: &'static str,
    priority_description: &'static str,
}

static ALLOCATION_RULES: [AllocationRule; 9] = [
    AllocationRule {
        age: LoanAge::New,
        condition: Condition::DiffAbove(2.0),
        strategy: "Wealth Focus (20-80)",
        prepayment_percent: 20.0,
        investment_percent: 80.0,
        title: "Build Wealth While Managing Debt",
        description: "Your loan is new with {years_left} years remaining. With strong investment returns ({post_tax}% post-tax) vs loan rate ({loan_rate}%), focus on wealth creation while making modest prepayments.",
        priority_title: "Prioritize Wealth Building",
        priority_description: "With {tenure_years} years ahead, focus on building wealth through investments. Your post-tax return ({post_tax}%) significantly exceeds the loan rate ({loan_rate}%).",
    },
    AllocationRule {
        age: LoanAge::New,
        condition: Condition::DiffAbove(0.0),
        strategy: "Balanced (40-60)",
        prepayment_percent: 40.0,
        investment_percent: 60.0,
        title: "Balance Wealth and Debt Reduction",
        description: "Early in your loan journey with a moderate return advantage. Split surplus to build wealth and reduce debt.",
        priority_title: "Balanced Approach",
        priority_description: "Build wealth while reducing debt burden gradually.",
    },
    AllocationRule {
        age: LoanAge::New,
        condition: Condition::Always,
        strategy: "Debt Focus (60-40)",
        prepayment_percent: 60.0,
        investment_percent: 40.0,
        title: "Reduce Interest Burden Early",
        description: "Your loan rate ({loan_rate}%) is higher than post-tax returns. Focus more on prepayment to reduce long-term interest.",
        priority_title: "Moderate Prepayment Focus",
        priority_description: "Reduce interest burden while maintaining some investments.",
    },
    AllocationRule {
        age: LoanAge::Mid,
        condition: Condition::DiffAbove(1.5),
        strategy: "Wealth Focus (30-70)",
        prepayment_percent: 30.0,
        investment_percent: 70.0,
        title: "Maintain Investment Momentum",
        description: "Mid-way through your loan with good progress. Continue building wealth with {post_tax}% returns while making steady prepayments.",
        priority_title: "Continue Wealth Building",
        priority_description: "Maintain investment focus while making steady prepayments.",
    },
    AllocationRule {
        age: LoanAge::Mid,
        condition: Condition::DiffAbove(-0.5),
        strategy: "Balanced (50-50)",
        prepayment_percent: 50.0,
        investment_percent: 50.0,
        title: "Equal Focus on Both Goals",
        description: "You're halfway through. With rates nearly equal, split your surplus equally between prepayment and investment.",
        priority_title: "Balanced Strategy",
        priority_description: "Equal focus on debt reduction and wealth creation.",
    },
    AllocationRule {
        age: LoanAge::Mid,
        condition: Condition::Always,
        strategy: "Debt Focus (70-30)",
        prepayment_percent: 70.0,
        investment_percent: 30.0,
        title: "Accelerate Towards Debt Freedom",
        description: "With {years_left} years left and the loan rate higher than returns, prioritize prepayment.",
        priority_title: "Accelerate Debt Reduction",
        priority_description: "Focus on becoming debt-free faster.",
    },
    AllocationRule {
        age: LoanAge::Mature,
        condition: Condition::RemainingAtMost(36),
        strategy: "Aggressive Prepayment (80-20)",
        prepayment_percent: 80.0,
        investment_percent: 20.0,
        title: "Finish Strong - Become Debt Free",
        description: "You're in the final stretch with just {years_left} years remaining. Focus on closing out the loan for peace of mind.",
        priority_title: "Close Out the Loan",
        priority_description: "Only {years_left} years left. Consider aggressive prepayment to become debt-free.",
    },
    AllocationRule {
        age: LoanAge::Mature,
        condition: Condition::DiffBelow(0.0),
        strategy: "Debt Focus (70-30)",
        prepayment_percent: 70.0,
        investment_percent: 30.0,
        title: "Path to Debt Freedom",
        description: "With {years_left} years left and loan rate ({loan_rate}%) higher than returns, focus on prepayment.",
        priority_title: "Prioritize Debt Freedom",
        priority_description: "Focus on prepayment to become debt-free sooner.",
    },
    AllocationRule {
        age: LoanAge::Mature,
        condition: Condition::Always,
        strategy: "Balanced (60-40)",
        prepayment_percent: 60.0,
        investment_percent: 40.0,
        title: "Balance Debt Closure and Wealth",
        description: "Final years of your loan. Balance between becoming debt-free and continuing wealth building.",
        priority_title: "Balanced Final Push",
        priority_description: "Balance between closing loan and maintaining investments.",
    },
];

/// Allocation advice with its supporting classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strategy: String,
    pub title: String,
    pub description: String,
    pub prepayment_percent: f64,
    pub investment_percent: f64,
    pub loan_age: LoanAge,
    pub emergency_status: EmergencyStatus,
    pub emergency_months: f64,
    pub post_tax_return: f64,
    pub rate_differential: f64,
    pub priorities: Vec<Priority>,
    pub reasoning: Vec<String>,
    pub penalty_note: Option<String>,
}

/// Values substituted into rule text
struct Narrative {
    post_tax: String,
    loan_rate: String,
    years_left: String,
    tenure_years: String,
}

impl Narrative {
    fn fill(&self, template: &str) -> String {
        template
            .replace("{post_tax}", &self.post_tax)
            .replace("{loan_rate}", &self.loan_rate)
            .replace("{years_left}", &self.years_left)
            .replace("{tenure_years}", &self.tenure_years)
    }
}

fn find_rule(age: LoanAge, rate_differential: f64, remaining_months: u32) -> Option<&'static AllocationRule> {
    ALLOCATION_RULES
        .iter()
        .find(|r| r.age == age && r.condition.holds(rate_differential, remaining_months))
}

fn age_reasoning(age: LoanAge, progress_percent: f64) -> Vec<String> {
    match age {
        LoanAge::New => vec![
            "Loan is relatively new (early stage)".to_string(),
            "Interest component is highest in early years".to_string(),
            "Long time horizon favors equity investments".to_string(),
        ],
        LoanAge::Mid => vec![
            "Loan is in mid-stage".to_string(),
            format!("{:.0}% of loan completed", progress_percent),
            "Balance between debt reduction and wealth building".to_string(),
        ],
        LoanAge::Mature => vec![
            "Loan is in final stage".to_string(),
            format!("{:.0}% completed - finish line in sight", progress_percent),
            "Principal component is higher now".to_string(),
            "Psychological benefit of being debt-free".to_string(),
        ],
    }
}

fn emergency_priority(status: EmergencyStatus, months: f64) -> Priority {
    match status {
        EmergencyStatus::Low => Priority::new(
            PriorityLevel::Critical,
            "Strengthen Emergency Fund",
            format!("You have {:.1} months of expenses. Increase to 6-12 months before aggressive prepayment.", months),
        ),
        EmergencyStatus::Adequate => Priority::new(
            PriorityLevel::Good,
            "Emergency Fund Adequate",
            format!("You have {:.1} months of expenses saved. This is good!", months),
        ),
        // Critical never reaches here
        EmergencyStatus::Critical | EmergencyStatus::Good => Priority::new(
            PriorityLevel::Excellent,
            "Emergency Fund Strong",
            format!("You have {:.1} months of expenses saved. Excellent financial cushion!", months),
        ),
    }
}

fn penalty_note(loan: &LoanInfo) -> Option<String> {
    (loan.prepayment_penalty > 1.0).then(|| {
        format!(
            "Your {}% prepayment penalty is factored into calculations. Consider negotiating with your lender or timing prepayments during penalty-free windows.",
            loan.prepayment_penalty
        )
    })
}

/// Classify the borrower's situation and pick a prepay/invest split
pub fn generate_recommendation(
    loan: &LoanInfo,
    health: &FinancialHealth,
    investment: &InvestmentOption,
    as_of: NaiveDate,
) -> Recommendation {
    let months_elapsed = loan.months_elapsed(as_of);
    let remaining = loan.remaining_tenure(as_of);
    let loan_age = LoanAge::from_months_elapsed(months_elapsed);
    let emergency_months = health.emergency_months();
    let emergency_status = EmergencyStatus::from_months(emergency_months);
    let post_tax_return = investment.post_tax_return();
    let rate_differential = post_tax_return - loan.interest_rate;
    let progress_percent = months_elapsed as f64 / loan.original_tenure as f64 * 100.0;

    let mut recommendation = Recommendation {
        strategy: "Emergency Fund First".to_string(),
        title: "URGENT: Build Emergency Fund".to_string(),
        description: "Your emergency fund is critically low. This is your top priority before considering loan prepayment or investments.".to_string(),
        prepayment_percent: 0.0,
        investment_percent: 0.0,
        loan_age,
        emergency_status,
        emergency_months,
        post_tax_return,
        rate_differential,
        priorities: Vec::new(),
        reasoning: Vec::new(),
        penalty_note: penalty_note(loan),
    };

    if emergency_status == EmergencyStatus::Critical {
        recommendation.priorities.push(Priority::new(
            PriorityLevel::Critical,
            "Build Emergency Fund Immediately",
            format!(
                "You only have {:.1} months of expenses saved. Build this to at least 6 months ({}) before any prepayment or aggressive investing.",
                emergency_months,
                format_currency(health.monthly_expenses * 6.0)
            ),
        ));
        recommendation.reasoning = vec![
            "Emergency fund below 3 months is a critical risk".to_string(),
            "All surplus should go to emergency fund first".to_string(),
        ];
        return recommendation;
    }

    recommendation.priorities.push(emergency_priority(emergency_status, emergency_months));
    recommendation.reasoning = age_reasoning(loan_age, progress_percent);

    // Every age has an Always row, so a match is guaranteed
    if let Some(rule) = find_rule(loan_age, rate_differential, remaining) {
        let narrative = Narrative {
            post_tax: format!("{:.1}", post_tax_return),
            loan_rate: format!("{}", loan.interest_rate),
            years_left: format!("{:.1}", remaining as f64 / 12.0),
            tenure_years: format!("{:.0}", loan.original_tenure as f64 / 12.0),
        };
        recommendation.strategy = rule.strategy.to_string();
        recommendation.title = rule.title.to_string();
        recommendation.description = narrative.fill(rule.description);
        recommendation.prepayment_percent = rule.prepayment_percent;
        recommendation.investment_percent = rule.investment_percent;
        recommendation.priorities.push(Priority::new(
            PriorityLevel::High,
            rule.priority_title,
            narrative.fill(rule.priority_description),
        ));
    }

    log::debug!(
        "recommendation: {} ({} loan, {:?} emergency fund, rate edge {:.2})",
        recommendation.strategy,
        loan_age.as_str(),
        emergency_status,
        rate_differential
    );

    recommendation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::find_option;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    fn loan(start: (i32, u32), tenure: u32) -> LoanInfo {
        LoanInfo::new(
            NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
            5_000_000.0,
            tenure,
            45_000.0,
            7.5,
        )
    }

    fn healthy() -> FinancialHealth {
        FinancialHealth {
            emergency_fund: 1_200_000.0,
            ..FinancialHealth::default()
        }
    }

    #[test]
    fn test_loan_age_buckets() {
        assert_eq!(LoanAge::from_months_elapsed(-3), LoanAge::New);
        assert_eq!(LoanAge::from_months_elapsed(60), LoanAge::New);
        assert_eq!(LoanAge::from_months_elapsed(61), LoanAge::Mid);
        assert_eq!(LoanAge::from_months_elapsed(180), LoanAge::Mid);
        assert_eq!(LoanAge::from_months_elapsed(181), LoanAge::Mature);
    }

    #[test]
    fn test_emergency_status_thresholds() {
        assert_eq!(EmergencyStatus::from_months(0.0), EmergencyStatus::Critical);
        assert_eq!(EmergencyStatus::from_months(2.99), EmergencyStatus::Critical);
        assert_eq!(EmergencyStatus::from_months(3.0), EmergencyStatus::Low);
        assert_eq!(EmergencyStatus::from_months(6.0), EmergencyStatus::Adequate);
        assert_eq!(EmergencyStatus::from_months(12.0), EmergencyStatus::Good);
    }

    #[test]
    fn test_every_age_has_a_fallback_rule() {
        for age in [LoanAge::New, LoanAge::Mid, LoanAge::Mature] {
            assert!(find_rule(age, f64::NEG_INFINITY, u32::MAX).is_some());
        }
        for rule in &ALLOCATION_RULES {
            assert_eq!(rule.prepayment_percent + rule.investment_percent, 100.0);
        }
    }

    #[test]
    fn test_critical_fund_short_circuits() {
        let health = FinancialHealth {
            emergency_fund: 0.0,
            ..FinancialHealth::default()
        };
        let rec = generate_recommendation(&loan((2024, 1), 240), &health, &find_option("PPF").unwrap(), as_of());

        assert_eq!(rec.strategy, "Emergency Fund First");
        assert_eq!(rec.prepayment_percent, 0.0);
        assert_eq!(rec.investment_percent, 0.0);
        assert_eq!(rec.priorities.len(), 1);
        assert_eq!(rec.priorities[0].level, PriorityLevel::Critical);
        assert_eq!(rec.reasoning[0], "Emergency fund below 3 months is a critical risk");
    }

    #[test]
    fn test_new_loan_strong_edge() {
        // 33 months elapsed; equity post-tax 10.8% vs 7.5%
        let rec = generate_recommendation(
            &loan((2024, 1), 240),
            &FinancialHealth::default(),
            &find_option("Equity Mutual Fund").unwrap(),
            as_of(),
        );
        assert_eq!(rec.loan_age, LoanAge::New);
        assert_eq!(rec.strategy, "Wealth Focus (20-80)");
        assert_eq!((rec.prepayment_percent, rec.investment_percent), (20.0, 80.0));
        // 300k fund over 95k expenses
        assert_eq!(rec.emergency_status, EmergencyStatus::Low);
        assert_eq!(rec.priorities[0].title, "Strengthen Emergency Fund");
        assert_eq!(rec.priorities[1].level, PriorityLevel::High);
        assert!(rec.description.contains("10.8% post-tax"));
        assert_eq!(rec.reasoning.len(), 3);
    }

    #[test]
    fn test_mid_loan_rate_disadvantage() {
        // 120 months elapsed; FD post-tax 4.55% vs 7.5%
        let rec = generate_recommendation(&loan((2016, 10), 240), &healthy(), &find_option("Fixed Deposit").unwrap(), as_of());
        assert_eq!(rec.loan_age, LoanAge::Mid);
        assert_eq!(rec.strategy, "Debt Focus (70-30)");
        assert_eq!(rec.reasoning[1], "50% of loan completed");
        assert_eq!(rec.priorities[0].title, "Emergency Fund Strong");
    }

    #[test]
    fn test_mature_loan_final_stretch() {
        // 216 of 240 months elapsed
        let rec = generate_recommendation(&loan((2008, 10), 240), &healthy(), &find_option("Equity Mutual Fund").unwrap(), as_of());
        assert_eq!(rec.loan_age, LoanAge::Mature);
        assert_eq!(rec.strategy, "Aggressive Prepayment (80-20)");
        assert!(rec.description.contains("2.0 years remaining"));
        assert_eq!(rec.reasoning.len(), 4);
    }

    #[test]
    fn test_mature_loan_negative_edge() {
        // 84 months remaining; PPF 7.1% vs 7.5%
        let rec = generate_recommendation(&loan((2008, 10), 300), &healthy(), &find_option("PPF").unwrap(), as_of());
        assert_eq!(rec.strategy, "Debt Focus (70-30)");

        let rec = generate_recommendation(&loan((2008, 10), 300), &healthy(), &find_option("Equity Mutual Fund").unwrap(), as_of());
        assert_eq!(rec.strategy, "Balanced (60-40)");
    }

    #[test]
    fn test_penalty_note() {
        let mut l = loan((2024, 1), 240);
        let option = find_option("PPF").unwrap();
        assert!(generate_recommendation(&l, &healthy(), &option, as_of()).penalty_note.is_none());
        l.prepayment_penalty = 2.0;
        let note = generate_recommendation(&l, &healthy(), &option, as_of()).penalty_note.unwrap();
        assert!(note.starts_with("Your 2% prepayment penalty"));
    }
}
