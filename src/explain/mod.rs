//! Human-readable explanations of scores. Nothing here feeds back into scoring.

pub mod deal;
pub mod details;
pub mod format;

pub use deal::{assess_deal, deal_note, DealAlignment, DealNote};
pub use details::{factor_details, fund_summary, profile_insights, FundSummary};
pub use format::{coverage_phrase, format_count_range, format_money, format_money_range};
