use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::lenient;
use super::range::ValueRange;

/// Normalized description of the business being matched.
///
/// Produced by an extractor (LLM or heuristic) and treated as read-only by the matcher.
/// Every field tolerates being absent or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub company_name: String,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub industries: Vec<String>,

    /// Free-text locations in the order the extractor found them.
    #[serde(default, deserialize_with = "lenient::strings")]
    pub locations: Vec<String>,

    #[serde(default, deserialize_with = "lenient::optional_range")]
    pub employee_count_range: Option<ValueRange>,

    #[serde(default, deserialize_with = "lenient::optional_range")]
    pub revenue_range_usd: Option<ValueRange>,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub offerings: Vec<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub summary: String,

    #[serde(default, deserialize_with = "lenient::confidence")]
    pub confidence: f64,
}

impl CompanyProfile {
    /// Build a profile from arbitrary JSON. Accepts either a bare profile object or a
    /// saved report wrapping it under `company_profile`.
    pub fn from_json_value(value: Value) -> serde_json::Result<Self> {
        let value = match value {
            Value::Object(mut map) => match map.remove("company_profile") {
                Some(inner @ Value::Object(_)) => inner,
                Some(other) => {
                    map.insert("company_profile".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            },
            other => other,
        };
        serde_json::from_value(value)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    /// Load a profile (or a saved report) from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read company profile at {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse company profile in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_profile_parse() {
        let profile = CompanyProfile::from_json(
            r#"{
                "company_name": "Acme Robotics",
                "url": "https://acme.example",
                "industries": ["Industrial", "Software"],
                "locations": ["Austin, Texas, USA"],
                "employee_count_range": {"min": 50, "max": 200},
                "revenue_range_usd": {"min": 15000000, "max": 40000000},
                "offerings": ["Warehouse robots"],
                "summary": "Builds warehouse automation.",
                "confidence": 0.8
            }"#,
        )
        .unwrap();

        assert_eq!(profile.company_name, "Acme Robotics");
        assert_eq!(profile.industries.len(), 2);
        assert_eq!(profile.employee_count_range, Some(ValueRange::between(50, 200)));
        assert_eq!(
            profile.revenue_range_usd,
            Some(ValueRange::between(15_000_000, 40_000_000))
        );
        assert_eq!(profile.confidence, 0.8);
    }

    #[test]
    fn test_empty_object_is_default_profile() {
        let profile = CompanyProfile::from_json("{}").unwrap();
        assert_eq!(profile, CompanyProfile::default());
    }

    #[test]
    fn test_unwraps_saved_report() {
        let value = json!({
            "company_profile": { "company_name": "Wrapped", "industries": ["Consumer"] },
            "shortlist": []
        });
        let profile = CompanyProfile::from_json_value(value).unwrap();
        assert_eq!(profile.company_name, "Wrapped");
        assert_eq!(profile.industries, vec!["Consumer".to_string()]);
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(CompanyProfile::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_serialize_roundtrip_keeps_ranges() {
        let profile = CompanyProfile {
            company_name: "Roundtrip".to_string(),
            revenue_range_usd: Some(ValueRange::new(Some(1_000_000), None)),
            ..Default::default()
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(CompanyProfile::from_json(&json).unwrap(), profile);
    }
}
