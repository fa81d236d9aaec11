//! Advisory rule sets: allocation recommendation, channel-level strategy and insight cards
//!
//! The recommendation table and the optimal-strategy ladder are independent
//! heuristics and may disagree on the same inputs.

mod recommendation;
mod optimal;
mod insights;

pub use recommendation::{
    generate_recommendation, EmergencyStatus, LoanAge, Priority, PriorityLevel, Recommendation,
};
pub use optimal::{
    optimal_prepayment_strategy, Confidence, OptimalPrepaymentStrategy, RiskProfile,
    EMERGENCY_FUND_MONTHS, LUMPSUM_CEILING,
};
pub use insights::{
    advisor_insights, AdvisorInsight, InsightCategory, InsightContext, InsightPriority,
    INTEREST_DEDUCTION_CAP, MARGINAL_TAX_RATE, PRINCIPAL_DEDUCTION_CAP,
};
