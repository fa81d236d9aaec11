//! Compound-growth projection of recurring contributions

use serde::{Deserialize, Serialize};

use crate::loan::monthly_rate;

/// One-off amount added at a 1-indexed projection month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Injection {
    pub month: u32,
    pub amount: f64,
}

impl Injection {
    pub fn new(month: u32, amount: f64) -> Self {
        Self { month, amount }
    }
}

/// Future value of a monthly contribution plus one-off injections
///
/// Each month the contribution is added and the total compounds at the
/// monthly rate. An injection is added after that month's compounding, so it
/// earns nothing in its own month. Only the first injection for a month counts.
pub fn future_value(
    monthly_contribution: f64,
    annual_return_percent: f64,
    months: u32,
    injections: &[Injection],
) -> f64 {
    let rate = monthly_rate(annual_return_percent);
    let mut value = 0.0;

    for month in 1..=months {
        value = (value + monthly_contribution) * (1.0 + rate);

        if let Some(injection) = injections.iter().find(|i| i.month == month) {
            value += injection.amount;
        }
    }

    value
}

/// Injections of `amount` at months 12, 24, ... within `months`
pub fn yearly_injections(amount: f64, months: u32) -> Vec<Injection> {
    (1..=months / 12).map(|year| Injection::new(year * 12, amount)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_contribution_is_zero() {
        for months in [0, 1, 12, 600] {
            for rate in [0.0, 7.5, 12.0] {
                assert_eq!(future_value(0.0, rate, months, &[]), 0.0);
            }
        }
    }

    #[test]
    fn test_zero_rate_sums_contributions() {
        assert_relative_eq!(future_value(1_000.0, 0.0, 24, &[]), 24_000.0);
    }

    #[test]
    fn test_annuity_due_closed_form() {
        let r: f64 = 0.01;
        let n = 120;
        let expected = 5_000.0 * ((1.0 + r).powi(n) - 1.0) / r * (1.0 + r);
        assert_relative_eq!(future_value(5_000.0, 12.0, n as u32, &[]), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_injection_earns_nothing_in_its_month() {
        let injections = [Injection::new(1, 100_000.0)];
        assert_relative_eq!(future_value(0.0, 12.0, 1, &injections), 100_000.0);
        assert_relative_eq!(future_value(0.0, 12.0, 2, &injections), 101_000.0);
    }

    #[test]
    fn test_yearly_injections() {
        let injections = yearly_injections(50_000.0, 30);
        assert_eq!(injections, vec![Injection::new(12, 50_000.0), Injection::new(24, 50_000.0)]);
        assert!(yearly_injections(50_000.0, 11).is_empty());
    }
}
