//! Financial health score, letter grade and narrative insights

use serde::{Deserialize, Serialize};

use crate::format::{format_currency, format_large_number};
use super::metrics::FinancialMetrics;
use super::profile::FinancialHealth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            95.. => Grade::APlus,
            85..=94 => Grade::A,
            75..=84 => Grade::BPlus,
            65..=74 => Grade::B,
            55..=64 => Grade::C,
            45..=54 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// One step of a sub-score ladder
struct Band {
    points: u32,
    strength: Option<&'static str>,
    weakness: Option<&'static str>,
}

const fn band(points: u32, strength: Option<&'static str>, weakness: Option<&'static str>) -> Band {
    Band { points, strength, weakness }
}

const SAVINGS_BANDS: [Band; 4] = [
    band(20, Some("Excellent savings rate"), None),
    band(15, Some("Good savings rate"), None),
    band(10, None, None),
    band(5, None, Some("Low savings rate")),
];

const DEBT_BANDS: [Band; 4] = [
    band(20, Some("Healthy debt levels"), None),
    band(15, None, None),
    band(10, None, Some("High debt burden")),
    band(5, None, Some("Very high debt burden")),
];

const NET_WORTH_BANDS: [Band; 4] = [
    band(20, Some("Strong net worth"), None),
    band(15, None, None),
    band(10, None, None),
    band(5, None, Some("Negative net worth")),
];

const SIP_BANDS: [Band; 4] = [
    band(15, Some("Excellent investment discipline"), None),
    band(12, Some("Good investment discipline"), None),
    band(8, None, None),
    band(4, None, Some("Low investment allocation")),
];

const EXPENSE_BANDS: [Band; 4] = [
    band(15, Some("Controlled expenses"), None),
    band(12, None, None),
    band(8, None, Some("High expense ratio")),
    band(4, None, Some("Very high expense ratio")),
];

const LIQUIDITY_BANDS: [Band; 4] = [
    band(10, Some("Excellent liquidity"), None),
    band(8, None, None),
    band(5, None, None),
    band(2, None, Some("Low liquidity")),
];

/// Index of the first band whose threshold holds, or the last band
fn at_least(value: f64, thresholds: [f64; 3]) -> usize {
    thresholds.iter().position(|t| value >= *t).unwrap_or(3)
}

fn at_most(value: f64, thresholds: [f64; 3]) -> usize {
    thresholds.iter().position(|t| value <= *t).unwrap_or(3)
}

fn above(value: f64, thresholds: [f64; 3]) -> usize {
    thresholds.iter().position(|t| value > *t).unwrap_or(3)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 0-100
    pub score: u32,
    pub grade: Grade,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Sum six weighted sub-scores and grade the total
pub fn financial_health_score(metrics: &FinancialMetrics) -> HealthScore {
    let picks: [&Band; 6] = [
        &SAVINGS_BANDS[at_least(metrics.savings_rate, [30.0, 20.0, 10.0])],
        &DEBT_BANDS[at_most(metrics.debt_to_income_ratio, [200.0, 300.0, 400.0])],
        &NET_WORTH_BANDS[above(
            metrics.net_worth,
            [metrics.annual_income * 3.0, metrics.annual_income, 0.0],
        )],
        &SIP_BANDS[at_least(metrics.sip_to_income_ratio, [15.0, 10.0, 5.0])],
        &EXPENSE_BANDS[at_most(metrics.expense_ratio, [60.0, 75.0, 85.0])],
        &LIQUIDITY_BANDS[at_least(metrics.liquidity_months(), [12.0, 6.0, 3.0])],
    ];

    let score: u32 = picks.iter().map(|b| b.points).sum();
    HealthScore {
        score,
        grade: Grade::from_score(score),
        strengths: picks.iter().filter_map(|b| b.strength).map(String::from).collect(),
        weaknesses: picks.iter().filter_map(|b| b.weakness).map(String::from).collect(),
    }
}

/// Plain-language observations on income, savings, net worth, debt and portfolio
pub fn detailed_insights(metrics: &FinancialMetrics, health: &FinancialHealth) -> Vec<String> {
    let mut insights = Vec::new();

    insights.push(format!(
        "Your total monthly income is {} ({}/year).",
        format_currency(metrics.total_monthly_income),
        format_currency(metrics.annual_income)
    ));

    if health.other_income > 0.0 {
        insights.push(format!(
            "Other income of {}/month supplements your base salary.",
            format_currency(health.other_income)
        ));
    }

    let savings = metrics.savings_rate;
    insights.push(if savings >= 30.0 {
        format!("Outstanding! You're saving {:.0}% of income, well above the recommended 20%.", savings)
    } else if savings >= 20.0 {
        format!("Good job! You're saving {:.0}% of income, meeting the recommended 20% target.", savings)
    } else if savings >= 10.0 {
        format!("You're saving {:.0}% of income. Try to increase this to 20% for better financial security.", savings)
    } else {
        format!("Your savings rate is only {:.0}%. This is concerning; aim for at least 20%.", savings)
    });

    if metrics.net_worth > 0.0 {
        let multiple = metrics.net_worth_to_income();
        insights.push(format!(
            "Your net worth is {} ({:.1}x annual income).",
            format_large_number(metrics.net_worth),
            multiple
        ));
        if multiple < 1.0 {
            insights.push("Target: build net worth to at least 1x annual income in the next 5 years.".to_string());
        }
    } else {
        insights.push(format!(
            "Your net worth is negative ({}). Focus on debt reduction and asset building.",
            format_large_number(metrics.net_worth)
        ));
    }

    let dti = metrics.debt_to_income_ratio;
    insights.push(if dti > 300.0 {
        format!("Your debt is {:.0}% of annual income, which is high. Prioritize debt reduction.", dti)
    } else if dti > 200.0 {
        format!("Your debt is {:.0}% of annual income; manageable but monitor closely.", dti)
    } else {
        format!("Your debt levels are healthy at {:.0}% of annual income.", dti)
    });

    if metrics.investment_assets > 0.0 {
        insights.push(format!(
            "Investment portfolio: {}.",
            format_large_number(metrics.investment_assets)
        ));
    }

    if let Some(years) = health.years_to_retirement() {
        insights.push(format!("{} years remain until your planned retirement.", years));
    }

    insights
}
