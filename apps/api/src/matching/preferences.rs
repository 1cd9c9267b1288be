//! Job-seeker preferences as stored in `users.preferences` (JSONB).
//!
//! Parsing is lenient field by field: anything malformed widens to "no
//! preference" instead of failing, so the scorer always has something to
//! work with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub preferred_work_mode: Vec<String>,
    #[serde(default)]
    pub preferred_job_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<f64>,
}

impl Preferences {
    /// Reads preferences from stored JSON. Returns `None` for null or
    /// non-object values.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Preferences {
            preferred_locations: string_list(obj.get("preferredLocations")),
            preferred_work_mode: string_list(obj.get("preferredWorkMode")),
            preferred_job_types: string_list(obj.get("preferredJobTypes")),
            min_salary: obj.get("minSalary").and_then(number_like),
        })
    }

    /// Same as [`Preferences::from_json`] for a nullable column.
    pub fn from_column(value: Option<&Value>) -> Option<Self> {
        value.and_then(Self::from_json)
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn number_like(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_object_parses() {
        let prefs = Preferences::from_json(&json!({
            "preferredLocations": ["Remote", "New York"],
            "preferredWorkMode": ["REMOTE", "HYBRID"],
            "preferredJobTypes": ["FULL_TIME"],
            "minSalary": 80000
        }))
        .unwrap();

        assert_eq!(prefs.preferred_locations, vec!["Remote", "New York"]);
        assert_eq!(prefs.preferred_work_mode, vec!["REMOTE", "HYBRID"]);
        assert_eq!(prefs.preferred_job_types, vec!["FULL_TIME"]);
        assert_eq!(prefs.min_salary, Some(80000.0));
    }

    #[test]
    fn test_null_and_scalars_mean_no_preferences() {
        assert!(Preferences::from_json(&Value::Null).is_none());
        assert!(Preferences::from_json(&json!("remote please")).is_none());
        assert!(Preferences::from_column(None).is_none());
    }

    #[test]
    fn test_malformed_fields_widen_to_defaults() {
        let prefs = Preferences::from_json(&json!({
            "preferredLocations": "Remote",
            "preferredWorkMode": ["REMOTE", 7, null],
            "minSalary": {"amount": 5}
        }))
        .unwrap();

        assert!(prefs.preferred_locations.is_empty());
        assert_eq!(prefs.preferred_work_mode, vec!["REMOTE"]);
        assert!(prefs.preferred_job_types.is_empty());
        assert_eq!(prefs.min_salary, None);
    }

    #[test]
    fn test_numeric_string_salary_accepted() {
        let prefs = Preferences::from_json(&json!({ "minSalary": " 95000 " })).unwrap();
        assert_eq!(prefs.min_salary, Some(95000.0));
    }

    #[test]
    fn test_serializes_back_to_camel_case() {
        let prefs = Preferences {
            preferred_locations: vec!["Berlin".into()],
            min_salary: Some(50000.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value["preferredLocations"], json!(["Berlin"]));
        assert_eq!(value["minSalary"], json!(50000.0));
        assert_eq!(Preferences::from_json(&value), Some(prefs));
    }
}
