//! Loan math primitives: rate conversion, EMI, principal roll-forward

/// Convert an annual percentage rate to a monthly decimal rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 12.0 / 100.0
}

/// Round a monetary amount to the nearest whole currency unit.
/// Halves round up (towards +inf), so -2.5 becomes -2.
pub fn round_currency(amount: f64) -> f64 {
    (amount + 0.5).floor()
}

/// Equated monthly installment for a fully amortizing loan
///
/// `P * r * (1+r)^n / ((1+r)^n - 1)`, falling back to straight-line
/// `principal / months` at a zero rate.
pub fn emi(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    let r = monthly_rate(annual_rate_percent);
    if r == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + r).powi(months as i32);
    principal * r * growth / (growth - 1.0)
}

/// Outstanding principal after `months_elapsed` EMI payments
///
/// Rolls the balance forward one month at a time, each payment retiring
/// `emi - interest`. Returns the original amount when no months have elapsed,
/// and 0 as soon as the balance is retired. The result is rounded to whole
/// currency units like every amount the schedule reports.
pub fn outstanding_principal(
    original_amount: f64,
    emi: f64,
    annual_rate_percent: f64,
    months_elapsed: i32,
) -> f64 {
    if months_elapsed <= 0 {
        return original_amount;
    }

    let rate = monthly_rate(annual_rate_percent);
    let mut balance = original_amount;

    for _ in 0..months_elapsed {
        let interest = balance * rate;
        balance -= emi - interest;
        if balance <= 0.0 {
            return 0.0;
        }
    }

    round_currency(balance.max(0.0))
}

/// Closed-form total interest over `months` level payments
pub fn total_interest(emi: f64, principal: f64, months: u32) -> f64 {
    emi * months as f64 - principal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monthly_rate() {
        assert_relative_eq!(monthly_rate(12.0), 0.01);
        assert_relative_eq!(monthly_rate(7.5), 0.00625);
    }

    #[test]
    fn test_emi_standard() {
        // 50L at 7.5% over 20 years
        let payment = emi(5_000_000.0, 7.5, 240);
        assert_relative_eq!(payment, 40_279.66, epsilon = 0.01);
    }

    #[test]
    fn test_emi_zero_rate_is_straight_line() {
        assert_relative_eq!(emi(120_000.0, 0.0, 12), 10_000.0);
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(2.5), 3.0);
        assert_eq!(round_currency(2.49), 2.0);
        assert_eq!(round_currency(-2.5), -2.0);
    }

    #[test]
    fn test_outstanding_principal_no_elapsed() {
        assert_eq!(outstanding_principal(5_000_000.0, 45_000.0, 7.5, 0), 5_000_000.0);
        assert_eq!(outstanding_principal(5_000_000.0, 45_000.0, 7.5, -4), 5_000_000.0);
    }

    #[test]
    fn test_outstanding_principal_one_month() {
        // Interest 31,250; principal retired 13,750
        assert_eq!(outstanding_principal(5_000_000.0, 45_000.0, 7.5, 1), 4_986_250.0);
    }

    #[test]
    fn test_outstanding_principal_closed_loan() {
        assert_eq!(outstanding_principal(100_000.0, 50_000.0, 10.0, 5), 0.0);
    }

    #[test]
    fn test_outstanding_matches_full_term_payoff() {
        let payment = emi(1_000_000.0, 9.0, 120);
        let remaining = outstanding_principal(1_000_000.0, payment, 9.0, 119);
        // One installment's worth of principal is left before the final payment
        assert!(remaining > 0.0 && remaining < payment);
    }
}
