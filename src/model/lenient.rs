//! Forgiving deserializers for extractor output and dataset records.
//!
//! Company profiles come from an LLM or a heuristic and datasets are hand-edited, so a
//! missing, `null` or oddly-typed optional field defaults instead of failing the whole load.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::range::ValueRange;

/// Treat an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a list of strings, a single string, or `null`. Non-string list items and blank
/// strings are dropped.
pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Accept integers, floats and numeric strings ("25,000,000", "$5000000").
/// Anything else is treated as an absent bound.
pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integer_from_value))
}

/// Confidence score, clamped to [0, 1]. Missing or unparseable values become 0.
pub fn confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|f| f.is_finite())
        .map(|f| f.clamp(0.0, 1.0))
        .unwrap_or(0.0))
}

/// Optional `{min, max}` range. A bare number becomes a single-point range; anything
/// that is not an object or number is absent.
pub fn optional_range<'de, D>(deserializer: D) -> Result<Option<ValueRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(range_from_value))
}

/// Like [`optional_range`], but an absent range is unbounded on both sides.
pub fn range_or_unbounded<'de, D>(deserializer: D) -> Result<ValueRange, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_range(deserializer)?.unwrap_or_default())
}

fn range_from_value(value: Value) -> Option<ValueRange> {
    match value {
        Value::Object(map) => Some(ValueRange::new(
            map.get("min").and_then(integer_from_value),
            map.get("max").and_then(integer_from_value),
        )),
        Value::Number(_) | Value::String(_) => {
            integer_from_value(&value).map(|v| ValueRange::new(Some(v), Some(v)))
        }
        _ => None,
    }
}

fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| float_to_integer(n.as_f64()?)),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | '$' | ' '))
                .collect();
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| float_to_integer(cleaned.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn float_to_integer(f: f64) -> Option<i64> {
    if f.is_finite() {
        Some(f.round() as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "strings")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "integer")]
        amount: Option<i64>,
        #[serde(default, deserialize_with = "confidence")]
        confidence: f64,
        #[serde(default, deserialize_with = "optional_range")]
        range: Option<ValueRange>,
        #[serde(default, deserialize_with = "null_as_default")]
        label: String,
    }

    fn probe(value: serde_json::Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_default() {
        let p = probe(json!({}));
        assert!(p.tags.is_empty());
        assert_eq!(p.amount, None);
        assert_eq!(p.confidence, 0.0);
        assert!(p.range.is_none());
        assert_eq!(p.label, "");
    }

    #[test]
    fn test_nulls_default() {
        let p = probe(json!({
            "tags": null, "amount": null, "confidence": null, "range": null, "label": null
        }));
        assert!(p.tags.is_empty());
        assert_eq!(p.amount, None);
        assert!(p.range.is_none());
        assert_eq!(p.label, "");
    }

    #[test]
    fn test_single_string_becomes_list() {
        let p = probe(json!({ "tags": "Software" }));
        assert_eq!(p.tags, vec!["Software".to_string()]);
    }

    #[test]
    fn test_list_drops_non_strings_and_blanks() {
        let p = probe(json!({ "tags": ["Software", 3, "  ", " Healthcare "] }));
        assert_eq!(p.tags, vec!["Software".to_string(), "Healthcare".to_string()]);
    }

    #[test]
    fn test_integer_accepts_floats_and_strings() {
        assert_eq!(probe(json!({ "amount": 2.5e7 })).amount, Some(25_000_000));
        assert_eq!(probe(json!({ "amount": "25,000,000" })).amount, Some(25_000_000));
        assert_eq!(probe(json!({ "amount": "$5000000" })).amount, Some(5_000_000));
        assert_eq!(probe(json!({ "amount": "about five" })).amount, None);
        assert_eq!(probe(json!({ "amount": true })).amount, None);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(probe(json!({ "confidence": 1.7 })).confidence, 1.0);
        assert_eq!(probe(json!({ "confidence": -0.2 })).confidence, 0.0);
        assert_eq!(probe(json!({ "confidence": "0.6" })).confidence, 0.6);
    }

    #[test]
    fn test_range_shapes() {
        let p = probe(json!({ "range": { "min": 10, "max": "50" } }));
        assert_eq!(p.range, Some(ValueRange::new(Some(10), Some(50))));

        let p = probe(json!({ "range": { "min": 10 } }));
        assert_eq!(p.range, Some(ValueRange::new(Some(10), None)));

        let p = probe(json!({ "range": 120 }));
        assert_eq!(p.range, Some(ValueRange::new(Some(120), Some(120))));

        let p = probe(json!({ "range": ["a"] }));
        assert!(p.range.is_none());
    }
}
