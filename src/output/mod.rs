pub mod formatter;
pub mod json;

pub use formatter::{
    format_breakdown, format_profile, format_score, format_scored_table, format_tsv,
    should_use_colors, ScoredRow,
};
pub use json::{save_json, to_json_pretty};
