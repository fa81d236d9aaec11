//! Scenario comparator: prepayment plans and surplus splits against a baseline
//!
//! Holds the loan, the selected investment option and the simulation start
//! once, then runs many schedules against them. Two net-benefit lenses are
//! exposed and intentionally kept separate:
//!
//! - split scenarios rank absolute outcomes: post-tax investment value minus
//!   total interest paid;
//! - plan comparisons frame a choice: interest saved by prepaying minus the
//!   gain from investing the same cash flow instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::investment::{future_value, yearly_injections, Injection, InvestmentOption, RiskLevel};
use crate::loan::{round_currency, Channel, LoanInfo, PrepaymentPlan};
use crate::schedule::{AmortizationEngine, Schedule};

/// A named prepay/invest percentage split of the monthly surplus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPreset {
    pub label: &'static str,
    pub prepayment_percent: f64,
    pub investment_percent: f64,
    pub description: &'static str,
}

/// The fixed scenario catalog. The first entry is the no-change baseline.
pub const SCENARIO_PRESETS: [SplitPreset; 6] = [
    SplitPreset { label: "Current Plan", prepayment_percent: 0.0, investment_percent: 0.0, description: "No changes" },
    SplitPreset { label: "Full Prepayment", prepayment_percent: 100.0, investment_percent: 0.0, description: "All surplus to loan" },
    SplitPreset { label: "Full Investment", prepayment_percent: 0.0, investment_percent: 100.0, description: "All surplus invested" },
    SplitPreset { label: "Balanced 50-50", prepayment_percent: 50.0, investment_percent: 50.0, description: "Equal split" },
    SplitPreset { label: "Debt Focus 70-30", prepayment_percent: 70.0, investment_percent: 30.0, description: "Prioritize loan" },
    SplitPreset { label: "Wealth Focus 30-70", prepayment_percent: 30.0, investment_percent: 70.0, description: "Prioritize investment" },
];

/// Outcome of splitting the surplus between prepayment and investment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitScenarioResult {
    pub name: String,
    pub prepayment_percent: f64,
    pub investment_percent: f64,
    pub total_interest_paid: f64,
    pub loan_completion_month: u32,
    /// Post-tax investment value at loan completion (rounded)
    pub investment_returns: f64,
    /// Post-tax investment value minus total interest paid (rounded)
    pub net_worth: f64,
    pub liquidity: f64,
    pub risk_level: RiskLevel,
    pub converged: bool,
}

/// A labelled catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    pub description: String,
    pub result: SplitScenarioResult,
}

/// Results for the whole scenario catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    pub entries: Vec<CatalogEntry>,
    /// Index of the highest net worth (first wins ties)
    pub best_index: usize,
}

impl ScenarioCatalog {
    pub fn best(&self) -> Option<&CatalogEntry> {
        self.entries.get(self.best_index)
    }
}

/// Effect of one prepayment channel on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelImpact {
    pub channel: Channel,
    /// Total prepaid through this channel over the full plan's schedule
    pub total_prepaid: f64,
    /// Interest saved versus baseline with only this channel enabled
    pub interest_saved: f64,
    /// Value had the same payments been invested at the post-tax rate
    pub invested_value: f64,
    /// `invested_value - total_prepaid`
    pub investment_gain: f64,
}

impl ChannelImpact {
    /// Positive when prepaying through this channel beats investing
    pub fn net_benefit(&self) -> f64 {
        self.interest_saved - self.investment_gain
    }
}

/// The active plan compared against the no-prepayment baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanComparison {
    pub baseline_interest: f64,
    pub plan_interest: f64,
    pub interest_saved: f64,
    pub baseline_months: u32,
    pub plan_months: u32,
    pub months_saved: i64,
    /// One entry per enabled channel. Entries need not sum to `interest_saved`.
    pub channels: Vec<ChannelImpact>,
    pub total_prepayment: f64,
    pub investment_gain: f64,
    /// `interest_saved - investment_gain`
    pub net_benefit: f64,
    pub baseline_converged: bool,
    pub plan_converged: bool,
}

impl PlanComparison {
    /// Both schedules paid off; savings from a capped schedule are not meaningful
    pub fn is_reliable(&self) -> bool {
        self.baseline_converged && self.plan_converged
    }

    /// Prepaying beats investing the same cash flow
    pub fn prepayment_wins(&self) -> bool {
        self.net_benefit > 0.0
    }

    /// Interest saved per unit prepaid, in percent
    pub fn total_roi(&self) -> f64 {
        if self.total_prepayment > 0.0 {
            self.interest_saved / self.total_prepayment * 100.0
        } else {
            0.0
        }
    }

    /// Annualized return on prepayment over the plan's tenure, in percent
    pub fn annualized_roi(&self) -> f64 {
        let years = self.plan_months as f64 / 12.0;
        if self.total_prepayment > 0.0 && years > 0.0 {
            ((1.0 + self.interest_saved / self.total_prepayment).powf(1.0 / years) - 1.0) * 100.0
        } else {
            0.0
        }
    }
}

/// Pre-loaded comparator for a loan, investment option and start point
#[derive(Debug, Clone)]
pub struct ScenarioComparator {
    loan: LoanInfo,
    investment: InvestmentOption,
    start_date: NaiveDate,
    opening_balance: f64,
    engine: AmortizationEngine,
}

impl ScenarioComparator {
    pub fn new(
        loan: LoanInfo,
        investment: InvestmentOption,
        start_date: NaiveDate,
        opening_balance: f64,
    ) -> Self {
        Self::with_engine(loan, investment, start_date, opening_balance, AmortizationEngine::default())
    }

    pub fn with_engine(
        loan: LoanInfo,
        investment: InvestmentOption,
        start_date: NaiveDate,
        opening_balance: f64,
        engine: AmortizationEngine,
    ) -> Self {
        Self {
            loan,
            investment,
            start_date,
            opening_balance,
            engine,
        }
    }

    pub fn loan(&self) -> &LoanInfo {
        &self.loan
    }

    pub fn investment(&self) -> &InvestmentOption {
        &self.investment
    }

    pub fn opening_balance(&self) -> f64 {
        self.opening_balance
    }

    /// Run the engine for a plan
    pub fn run(&self, plan: &PrepaymentPlan) -> Schedule {
        self.engine.generate(&self.loan, plan, self.start_date, self.opening_balance)
    }

    /// Schedule with every channel disabled
    pub fn baseline(&self) -> Schedule {
        self.run(&PrepaymentPlan::none())
    }

    /// Split `surplus` between a monthly prepayment and a monthly investment
    pub fn split_scenario(
        &self,
        prepayment_percent: f64,
        investment_percent: f64,
        surplus: f64,
    ) -> SplitScenarioResult {
        let prepayment_amount = surplus * prepayment_percent / 100.0;
        let investment_amount = surplus * investment_percent / 100.0;

        let plan = PrepaymentPlan {
            enable_monthly: prepayment_percent > 0.0,
            monthly_extra: prepayment_amount,
            ..PrepaymentPlan::none()
        };
        let schedule = self.run(&plan);
        let total_interest_paid = schedule.total_interest();
        let loan_completion_month = schedule.months();

        let gross = future_value(
            investment_amount,
            self.investment.expected_return,
            loan_completion_month,
            &[],
        );
        let contributed = investment_amount * loan_completion_month as f64;
        let post_tax = self.investment.post_tax_value(gross, contributed);
        let net_worth = post_tax - total_interest_paid;

        SplitScenarioResult {
            name: format!("{}-{} Split", prepayment_percent, investment_percent),
            prepayment_percent,
            investment_percent,
            total_interest_paid,
            loan_completion_month,
            investment_returns: round_currency(post_tax),
            net_worth: round_currency(net_worth),
            liquidity: round_currency(post_tax),
            risk_level: self.investment.risk_level,
            converged: schedule.converged,
        }
    }

    /// Evaluate every preset. The baseline preset ignores the surplus.
    pub fn scenario_catalog(&self, surplus: f64) -> ScenarioCatalog {
        let entries: Vec<CatalogEntry> = SCENARIO_PRESETS
            .iter()
            .map(|preset| {
                let is_baseline = preset.prepayment_percent == 0.0 && preset.investment_percent == 0.0;
                let amount = if is_baseline { 0.0 } else { surplus };
                CatalogEntry {
                    label: preset.label.to_string(),
                    description: preset.description.to_string(),
                    result: self.split_scenario(preset.prepayment_percent, preset.investment_percent, amount),
                }
            })
            .collect();

        let mut best_index = 0;
        for (idx, entry) in entries.iter().enumerate() {
            if entry.result.net_worth > entries[best_index].result.net_worth {
                best_index = idx;
            }
        }

        ScenarioCatalog { entries, best_index }
    }

    /// Compare `plan` with the baseline, attributing savings per channel
    pub fn compare_plan(&self, plan: &PrepaymentPlan) -> PlanComparison {
        let baseline = self.baseline();
        let schedule = self.run(plan);

        let baseline_interest = baseline.total_interest();
        let plan_interest = schedule.total_interest();
        let plan_months = schedule.months();
        let post_tax_rate = self.investment.post_tax_return();

        let channels: Vec<ChannelImpact> = plan
            .active_channels()
            .into_iter()
            .map(|channel| {
                let single = self.run(&plan.only(channel));
                let invested_value = match channel {
                    Channel::Monthly => future_value(plan.monthly_extra, post_tax_rate, plan_months, &[]),
                    Channel::Yearly => future_value(
                        0.0,
                        post_tax_rate,
                        plan_months,
                        &yearly_injections(plan.yearly_amount, plan_months),
                    ),
                    Channel::Lumpsum => {
                        let injections: Vec<Injection> = plan
                            .applied_lumpsums(plan_months)
                            .map(|l| Injection::new(l.month, l.amount))
                            .collect();
                        future_value(0.0, post_tax_rate, plan_months, &injections)
                    }
                };
                let total_prepaid = plan.committed_by(channel, plan_months);
                ChannelImpact {
                    channel,
                    total_prepaid,
                    interest_saved: baseline_interest - single.total_interest(),
                    invested_value,
                    investment_gain: invested_value - total_prepaid,
                }
            })
            .collect();

        let total_prepayment = plan.committed_total(plan_months);
        let investment_gain: f64 = channels.iter().map(|c| c.investment_gain).sum();
        let interest_saved = baseline_interest - plan_interest;

        if !baseline.converged || !schedule.converged {
            log::warn!(
                "plan comparison built from a schedule that did not pay off (baseline {} months, plan {} months)",
                baseline.months(),
                plan_months
            );
        }

        PlanComparison {
            baseline_interest,
            plan_interest,
            interest_saved,
            baseline_months: baseline.months(),
            plan_months,
            months_saved: baseline.months() as i64 - plan_months as i64,
            channels,
            total_prepayment,
            investment_gain,
            net_benefit: interest_saved - investment_gain,
            baseline_converged: baseline.converged,
            plan_converged: schedule.converged,
        }
    }
}
