//! Loan and prepayment plan data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::error::{AdvisorError, Result};
use super::math;

/// A fixed-EMI amortizing home loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInfo {
    /// First month of the loan (stored as day 1 of that month)
    #[serde(with = "dates::year_month")]
    pub start_date: NaiveDate,

    /// Original principal
    pub original_amount: f64,

    /// Original tenure in months
    pub original_tenure: u32,

    /// Current equated monthly installment
    pub current_emi: f64,

    /// Annual interest rate in percent (7.5 = 7.5%)
    pub interest_rate: f64,

    /// Prepayment penalty in percent
    #[serde(default)]
    pub prepayment_penalty: f64,

    /// User-supplied outstanding principal, overriding the roll-forward estimate
    #[serde(default)]
    pub custom_outstanding_principal: Option<f64>,
}

impl LoanInfo {
    pub fn new(
        start_date: NaiveDate,
        original_amount: f64,
        original_tenure: u32,
        current_emi: f64,
        interest_rate: f64,
    ) -> Self {
        Self {
            start_date,
            original_amount,
            original_tenure,
            current_emi,
            interest_rate,
            prepayment_penalty: 0.0,
            custom_outstanding_principal: None,
        }
    }

    /// Calendar months elapsed since the start month
    pub fn months_elapsed(&self, as_of: NaiveDate) -> i32 {
        dates::months_elapsed(self.start_date, as_of)
    }

    /// Months left on the original tenure
    pub fn remaining_tenure(&self, as_of: NaiveDate) -> u32 {
        dates::remaining_tenure(self.original_tenure, self.start_date, as_of)
    }

    /// Outstanding principal at `as_of`: the user override if set, otherwise
    /// the month-by-month roll-forward from the original amount
    pub fn outstanding_principal(&self, as_of: NaiveDate) -> f64 {
        match self.custom_outstanding_principal {
            Some(amount) => amount,
            None => math::outstanding_principal(
                self.original_amount,
                self.current_emi,
                self.interest_rate,
                self.months_elapsed(as_of),
            ),
        }
    }

    /// First month's interest on `balance`
    pub fn first_month_interest(&self, balance: f64) -> f64 {
        balance * math::monthly_rate(self.interest_rate)
    }

    /// Whether the EMI retires any principal at all on `balance`.
    /// When false, a schedule without prepayments runs to the month cap.
    pub fn amortizes(&self, balance: f64) -> bool {
        self.current_emi > self.first_month_interest(balance)
    }

    pub fn validate(&self) -> Result<()> {
        if self.original_tenure == 0 {
            return Err(AdvisorError::invalid("loan.original_tenure", "must be greater than 0"));
        }
        if !(self.original_amount > 0.0) {
            return Err(AdvisorError::invalid("loan.original_amount", "must be positive"));
        }
        if !(self.current_emi > 0.0) {
            return Err(AdvisorError::invalid("loan.current_emi", "must be positive"));
        }
        if !(self.interest_rate >= 0.0) {
            return Err(AdvisorError::invalid("loan.interest_rate", "must not be negative"));
        }
        if let Some(amount) = self.custom_outstanding_principal {
            if !(amount >= 0.0) {
                return Err(AdvisorError::invalid(
                    "loan.custom_outstanding_principal",
                    "must not be negative",
                ));
            }
        }
        Ok(())
    }
}

/// A one-off prepayment at a schedule-relative month (1 = first simulated month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lumpsum {
    pub month: u32,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl Lumpsum {
    pub fn new(month: u32, amount: f64, description: impl Into<String>) -> Self {
        Self {
            month,
            amount,
            description: description.into(),
        }
    }
}

/// Prepayment channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Monthly,
    Yearly,
    Lumpsum,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Monthly, Channel::Yearly, Channel::Lumpsum];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Monthly => "monthly",
            Channel::Yearly => "yearly",
            Channel::Lumpsum => "lumpsum",
        }
    }
}

/// Prepayment plan with three independently toggled channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentPlan {
    #[serde(default)]
    pub enable_monthly: bool,
    #[serde(default)]
    pub monthly_extra: f64,

    #[serde(default)]
    pub enable_yearly: bool,
    #[serde(default)]
    pub yearly_amount: f64,
    /// Month of each schedule year (1-12) in which the yearly amount is paid
    #[serde(default = "default_yearly_month")]
    pub yearly_month: u32,

    #[serde(default)]
    pub enable_lumpsum: bool,
    #[serde(default)]
    pub lumpsums: Vec<Lumpsum>,
}

fn default_yearly_month() -> u32 {
    1
}

impl Default for PrepaymentPlan {
    fn default() -> Self {
        Self::none()
    }
}

impl PrepaymentPlan {
    /// Baseline plan: every channel disabled
    pub fn none() -> Self {
        Self {
            enable_monthly: false,
            monthly_extra: 0.0,
            enable_yearly: false,
            yearly_amount: 0.0,
            yearly_month: 1,
            enable_lumpsum: false,
            lumpsums: Vec::new(),
        }
    }

    /// Monthly-only plan, enabled iff the amount is positive
    pub fn monthly(amount: f64) -> Self {
        Self {
            enable_monthly: amount > 0.0,
            monthly_extra: amount,
            ..Self::none()
        }
    }

    /// Copy of this plan with only `channel` left enabled (if it was enabled).
    /// Amounts are kept as in the full plan.
    pub fn only(&self, channel: Channel) -> Self {
        Self {
            enable_monthly: channel == Channel::Monthly && self.enable_monthly,
            enable_yearly: channel == Channel::Yearly && self.enable_yearly,
            enable_lumpsum: channel == Channel::Lumpsum && self.enable_lumpsum,
            ..self.clone()
        }
    }

    pub fn is_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Monthly => self.enable_monthly,
            Channel::Yearly => self.enable_yearly,
            Channel::Lumpsum => self.enable_lumpsum,
        }
    }

    pub fn active_channels(&self) -> Vec<Channel> {
        Channel::ALL.into_iter().filter(|c| self.is_enabled(*c)).collect()
    }

    pub fn has_active_channel(&self) -> bool {
        Channel::ALL.iter().any(|c| self.is_enabled(*c))
    }

    /// Extra payment applied every month
    pub fn monthly_payment(&self) -> f64 {
        if self.enable_monthly {
            self.monthly_extra
        } else {
            0.0
        }
    }

    /// Yearly plus one-off prepayment falling in schedule month `month`.
    /// Both apply when they coincide.
    pub fn lumpsum_for(&self, month: u32) -> f64 {
        if month == 0 {
            return 0.0;
        }
        let mut amount = 0.0;
        if self.enable_yearly && (month - 1) % 12 + 1 == self.yearly_month {
            amount += self.yearly_amount;
        }
        if self.enable_lumpsum {
            if let Some(lumpsum) = self.lumpsums.iter().find(|l| l.month == month) {
                amount += lumpsum.amount;
            }
        }
        amount
    }

    /// Lumpsum entries actually paid within `months` months: the first
    /// entry for each month, matching `lumpsum_for`
    pub fn applied_lumpsums(&self, months: u32) -> impl Iterator<Item = &Lumpsum> + '_ {
        self.lumpsums
            .iter()
            .enumerate()
            .filter(move |(index, lumpsum)| {
                lumpsum.month <= months
                    && self.lumpsums.iter().position(|l| l.month == lumpsum.month) == Some(*index)
            })
            .map(|(_, lumpsum)| lumpsum)
    }

    /// Amount a channel commits over a schedule of `months` months
    pub fn committed_by(&self, channel: Channel, months: u32) -> f64 {
        if !self.is_enabled(channel) {
            return 0.0;
        }
        match channel {
            Channel::Monthly => self.monthly_extra * months as f64,
            Channel::Yearly => self.yearly_amount * (months / 12) as f64,
            Channel::Lumpsum => self.applied_lumpsums(months).map(|l| l.amount).sum(),
        }
    }

    /// Total prepayment committed over a schedule of `months` months
    pub fn committed_total(&self, months: u32) -> f64 {
        Channel::ALL.iter().map(|c| self.committed_by(*c, months)).sum()
    }

    /// Recurring prepayment per year (monthly and yearly channels)
    pub fn annual_commitment(&self) -> f64 {
        let monthly = if self.enable_monthly { self.monthly_extra * 12.0 } else { 0.0 };
        let yearly = if self.enable_yearly { self.yearly_amount } else { 0.0 };
        monthly + yearly
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.yearly_month) {
            return Err(AdvisorError::invalid("prepayment.yearly_month", "must be between 1 and 12"));
        }
        if self.monthly_extra < 0.0 || self.yearly_amount < 0.0 {
            return Err(AdvisorError::invalid("prepayment", "amounts must not be negative"));
        }
        for lumpsum in &self.lumpsums {
            if lumpsum.month == 0 {
                return Err(AdvisorError::invalid("prepayment.lumpsums.month", "months start at 1"));
            }
            if lumpsum.amount < 0.0 {
                return Err(AdvisorError::invalid("prepayment.lumpsums.amount", "must not be negative"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_plan() -> PrepaymentPlan {
        PrepaymentPlan {
            enable_monthly: true,
            monthly_extra: 10_000.0,
            enable_yearly: true,
            yearly_amount: 100_000.0,
            yearly_month: 3,
            enable_lumpsum: true,
            lumpsums: vec![Lumpsum::new(3, 50_000.0, "bonus"), Lumpsum::new(3, 999.0, "dup")],
        }
    }

    #[test]
    fn test_yearly_and_lumpsum_are_additive() {
        let plan = full_plan();
        // Month 3: yearly + first matching lumpsum
        assert_eq!(plan.lumpsum_for(3), 150_000.0);
        // Month 15 is the 3rd month of schedule year 2
        assert_eq!(plan.lumpsum_for(15), 100_000.0);
        assert_eq!(plan.lumpsum_for(4), 0.0);
        assert_eq!(plan.monthly_payment(), 10_000.0);
    }

    #[test]
    fn test_only_keeps_amounts() {
        let plan = full_plan();
        let yearly = plan.only(Channel::Yearly);
        assert!(!yearly.enable_monthly);
        assert!(yearly.enable_yearly);
        assert!(!yearly.enable_lumpsum);
        assert_eq!(yearly.monthly_extra, 10_000.0);
        assert_eq!(yearly.active_channels(), vec![Channel::Yearly]);

        let disabled = PrepaymentPlan::none().only(Channel::Monthly);
        assert!(!disabled.has_active_channel());
    }

    #[test]
    fn test_committed_total() {
        let plan = full_plan();
        // 30 months: 30 monthly payments, 2 full years, first lumpsum in month 3
        let expected = 10_000.0 * 30.0 + 100_000.0 * 2.0 + 50_000.0;
        assert_eq!(plan.committed_total(30), expected);
        // Schedule ends before the lumpsum month
        assert_eq!(plan.committed_by(Channel::Lumpsum, 2), 0.0);
        assert_eq!(plan.annual_commitment(), 220_000.0);
        assert_eq!(PrepaymentPlan::none().committed_total(120), 0.0);
    }

    #[test]
    fn test_applied_lumpsums_skip_duplicates_and_late_entries() {
        let mut plan = full_plan();
        plan.lumpsums.push(Lumpsum::new(48, 75_000.0, "late"));

        let applied: Vec<&str> = plan.applied_lumpsums(36).map(|l| l.description.as_str()).collect();
        assert_eq!(applied, vec!["bonus"]);

        let applied: Vec<&str> = plan.applied_lumpsums(48).map(|l| l.description.as_str()).collect();
        assert_eq!(applied, vec!["bonus", "late"]);
    }

    #[test]
    fn test_validate() {
        assert!(full_plan().validate().is_ok());
        let mut bad = full_plan();
        bad.yearly_month = 13;
        assert!(bad.validate().is_err());

        let loan = LoanInfo::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            5_000_000.0,
            0,
            45_000.0,
            7.5,
        );
        assert!(loan.validate().is_err());
    }

    #[test]
    fn test_outstanding_override() {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let mut loan = LoanInfo::new(
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            5_000_000.0,
            240,
            45_000.0,
            7.5,
        );
        assert_eq!(loan.outstanding_principal(as_of), 5_000_000.0);
        loan.custom_outstanding_principal = Some(4_200_000.0);
        assert_eq!(loan.outstanding_principal(as_of), 4_200_000.0);
    }

    #[test]
    fn test_deserialize_start_month() {
        let json = r#"{
            "start_date": "2020-01",
            "original_amount": 5000000,
            "original_tenure": 240,
            "current_emi": 45000,
            "interest_rate": 7.5
        }"#;
        let loan: LoanInfo = serde_json::from_str(json).unwrap();
        assert_eq!(loan.start_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(loan.prepayment_penalty, 0.0);
        assert!(loan.custom_outstanding_principal.is_none());
    }
}
