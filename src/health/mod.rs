//! Household financial health: profile, derived ratios and graded score

mod profile;
mod metrics;
mod score;

pub use profile::FinancialHealth;
pub use metrics::{FinancialMetrics, calculate_financial_metrics};
pub use score::{Grade, HealthScore, financial_health_score, detailed_insights};
