use serde::{Deserialize, Serialize};

use super::lenient;
use super::range::ValueRange;

/// One private-equity buyer from the static dataset.
///
/// String sets (industries, regions, deal types) are compared case-insensitively by the
/// matcher; they are stored as written in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub industries: Vec<String>,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub regions: Vec<String>,

    #[serde(default, deserialize_with = "lenient::range_or_unbounded")]
    pub revenue_focus_usd: ValueRange,

    #[serde(default, deserialize_with = "lenient::range_or_unbounded")]
    pub employee_focus: ValueRange,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub deal_types: Vec<String>,
}

impl Fund {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
