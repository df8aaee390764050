//! Raw announcement rows as delivered by an event source.
//!
//! Upstream feeds are loose about types: dates come as `DD/MM/YYYY` or ISO,
//! values come as strings, numbers or null. Decoding normalizes all of that
//! so the rest of the pipeline works with plain options.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One scheduled economic announcement, exactly as the source reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    /// Wall-clock time in the source timezone, or a "no time" sentinel
    /// such as `All Day` or `Tentative`.
    #[serde(default, alias = "time")]
    pub local_time: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub currency: String,

    #[serde(default, alias = "event", deserialize_with = "deserialize_text")]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_value")]
    pub forecast: Option<String>,

    #[serde(default, deserialize_with = "deserialize_value")]
    pub previous: Option<String>,

    #[serde(default, deserialize_with = "deserialize_value")]
    pub actual: Option<String>,

    /// Holiday rows often carry no tier at all.
    #[serde(default, deserialize_with = "deserialize_value")]
    pub importance: Option<String>,
}

/// Date formats accepted from upstream, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse an upstream date string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid date '{s}', expected YYYY-MM-DD or DD/MM/YYYY"
        ))
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_value(deserializer)?.unwrap_or_default())
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_upstream_native_row() {
        let json = r#"{
            "date": "10/03/2024",
            "time": "14:30",
            "currency": "USD",
            "event": "CPI m/m",
            "forecast": "0.4%",
            "previous": 0.3,
            "actual": null,
            "importance": "High"
        }"#;

        let event: RawEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(event.local_time.as_deref(), Some("14:30"));
        assert_eq!(event.name, "CPI m/m");
        assert_eq!(event.forecast.as_deref(), Some("0.4%"));
        assert_eq!(event.previous.as_deref(), Some("0.3"));
        assert_eq!(event.actual, None);
        assert_eq!(event.importance.as_deref(), Some("High"));
    }

    #[test]
    fn test_blank_values_and_missing_fields_decode_as_absent() {
        let json = r#"{
            "date": "2024-03-10",
            "currency": "EUR",
            "name": "ECB Press Conference",
            "forecast": "   ",
            "importance": "high"
        }"#;

        let event: RawEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.local_time, None);
        assert_eq!(event.forecast, None);
        assert_eq!(event.previous, None);
        assert_eq!(event.actual, None);
    }

    #[test]
    fn test_holiday_row_with_null_fields_decodes() {
        let json = r#"{
            "date": "10/03/2024",
            "time": "All Day",
            "currency": null,
            "event": "Bank Holiday",
            "importance": null
        }"#;

        let event: RawEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.currency, "");
        assert_eq!(event.name, "Bank Holiday");
        assert_eq!(event.importance, None);
    }

    #[test]
    fn test_rejects_unknown_date_format() {
        let json = r#"{"date": "March 10", "currency": "USD", "name": "x", "importance": "high"}"#;
        let err = serde_json::from_str::<RawEvent>(json).unwrap_err();
        assert!(err.to_string().contains("invalid date"), "got: {err}");
    }
}
