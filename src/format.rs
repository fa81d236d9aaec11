//! Rupee formatting for display
//!
//! Pure presentation helpers; nothing in the calculation core depends on them.

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// Whole-rupee amount with Indian digit grouping, e.g. `₹50,00,000`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("₹{}", amount);
    }
    let rounded = amount.abs().round();
    let sign = if amount < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!("{}₹{}", sign, group_indian(&format!("{:.0}", rounded)))
}

/// Compact form: crores above 1e7, lakhs above 1e5, plain currency otherwise
pub fn format_large_number(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.2}Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.2}L", amount / LAKH)
    } else {
        format_currency(amount)
    }
}

/// `12345678` -> `1,23,45,678`
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1_000.0), "₹1,000");
        assert_eq!(format_currency(45_000.0), "₹45,000");
        assert_eq!(format_currency(5_000_000.0), "₹50,00,000");
        assert_eq!(format_currency(123_456_789.0), "₹12,34,56,789");
    }

    #[test]
    fn test_rounds_to_whole_rupees() {
        assert_eq!(format_currency(40_279.66), "₹40,280");
        assert_eq!(format_currency(1_234.4), "₹1,234");
        assert_eq!(format_currency(-5_000.0), "-₹5,000");
        assert_eq!(format_currency(-0.2), "₹0");
    }

    #[test]
    fn test_large_number_bands() {
        assert_eq!(format_large_number(25_000_000.0), "₹2.50Cr");
        assert_eq!(format_large_number(4_986_000.0), "₹49.86L");
        assert_eq!(format_large_number(100_000.0), "₹1.00L");
        assert_eq!(format_large_number(99_999.0), "₹99,999");
        assert_eq!(format_large_number(-2_500_000.0), "-₹25,00,000");
    }
}
