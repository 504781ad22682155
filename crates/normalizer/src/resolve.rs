use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Returns the first value present and non-null among `keys`, in order.
/// JSON `null` and absence are equivalent; any other value wins, so a
/// falsy-but-present value such as `0` or `""` resolves.
pub fn first_non_null<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| match record.get(*key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    })
}

/// Alternate-key lookup rendered to a string. Non-string scalars (numeric
/// ids, numeric category codes) are rendered in their JSON form.
pub fn resolve_string(record: &Value, keys: &[&str]) -> Option<String> {
    first_non_null(record, keys).map(|value| match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

/// Lenient timestamp decoding. Unparsable values become `None`; the caller
/// keeps the row.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text),
        Value::Number(num) => {
            let secs = num.as_i64().or_else(|| num.as_f64().map(|s| s as i64))?;
            Utc.timestamp_opt(secs, 0).single()
        }
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Naive datetimes are taken as UTC.
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_non_null_walks_alternates_in_order() {
        let record = json!({"id": null, "ticket_id": 7, "_id": 9});
        let value = first_non_null(&record, &["id", "ticket_id", "_id"]).unwrap();
        assert_eq!(value, &json!(7));
    }

    #[test]
    fn zero_id_is_present() {
        let record = json!({"id": 0});
        assert_eq!(resolve_string(&record, &["id", "ticket_id"]), Some("0".into()));
    }

    #[test]
    fn missing_everywhere_is_none() {
        let record = json!({"other": 1});
        assert_eq!(first_non_null(&record, &["id", "_id"]), None);
    }

    #[test]
    fn rfc3339_with_offset_converts_to_utc() {
        let ts = parse_timestamp(&json!("2024-01-01T03:00:00+03:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn naive_and_date_only_forms_parse() {
        assert!(parse_timestamp(&json!("2024-01-01 12:30:00")).is_some());
        assert!(parse_timestamp(&json!("2024-01-01")).is_some());
    }

    #[test]
    fn unix_seconds_parse() {
        let ts = parse_timestamp(&json!(1704067200)).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_timestamp(&json!("not a date")), None);
        assert_eq!(parse_timestamp(&json!(["2024"])), None);
        assert_eq!(parse_timestamp(&json!("")), None);
    }
}
