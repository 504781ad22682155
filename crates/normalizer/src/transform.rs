use chrono::{Datelike, Timelike, Weekday};
use serde_json::Value;
use tracing::warn;

use crate::models::{EnrichedTicket, NormalizedTicket};
use crate::resolve::{first_non_null, parse_timestamp, resolve_string};

const ID_KEYS: &[&str] = &["id", "ticket_id", "_id"];
const CREATED_KEYS: &[&str] = &["created_at", "created"];
const CLOSED_KEYS: &[&str] = &["closed_at", "closed"];
const CATEGORY_KEYS: &[&str] = &["category", "category_name", "cat"];
// Detail payloads carry the category only under its two canonical names.
const DETAIL_CATEGORY_KEYS: &[&str] = &["category", "category_name"];
const PRIORITY_KEYS: &[&str] = &["priority"];
const STATUS_KEYS: &[&str] = &["status"];

/// Resolves one raw list record into a normalized row. Missing or
/// unparsable fields become `None`; the row is always produced.
pub fn normalize_ticket(raw: &Value) -> NormalizedTicket {
    NormalizedTicket {
        ticket_id: resolve_string(raw, ID_KEYS),
        created_at: first_non_null(raw, CREATED_KEYS).and_then(parse_timestamp),
        closed_at: first_non_null(raw, CLOSED_KEYS).and_then(parse_timestamp),
        category: resolve_string(raw, CATEGORY_KEYS),
        priority: resolve_string(raw, PRIORITY_KEYS),
        status: resolve_string(raw, STATUS_KEYS),
        raw: raw.clone(),
    }
}

/// Applies a detail payload to a partially resolved ticket, filling only
/// fields that are still missing. A value resolved from the list payload is
/// kept even when the detail payload disagrees.
pub fn fill_from_detail(ticket: &mut NormalizedTicket, detail: &Value) {
    if ticket.created_at.is_none() {
        ticket.created_at = first_non_null(detail, CREATED_KEYS).and_then(parse_timestamp);
    }
    if ticket.closed_at.is_none() {
        ticket.closed_at = first_non_null(detail, CLOSED_KEYS).and_then(parse_timestamp);
    }
    if ticket.category.is_none() {
        ticket.category = resolve_string(detail, DETAIL_CATEGORY_KEYS);
    }
    if ticket.priority.is_none() {
        ticket.priority = resolve_string(detail, PRIORITY_KEYS);
    }
    if ticket.status.is_none() {
        ticket.status = resolve_string(detail, STATUS_KEYS);
    }
}

/// Derives the calendar buckets and resolution duration. Pure and total:
/// every normalized row yields exactly one enriched row.
pub fn enrich(ticket: NormalizedTicket) -> EnrichedTicket {
    let created = ticket.created_at;
    let resolution_hours = match (ticket.created_at, ticket.closed_at) {
        (Some(created), Some(closed)) => {
            let hours = (closed - created).num_seconds() as f64 / 3600.0;
            if hours < 0.0 {
                // Kept as-is; see DESIGN.md on negative durations.
                warn!(
                    ticket_id = ticket.ticket_id.as_deref().unwrap_or("?"),
                    hours, "ticket closed before it was created"
                );
            }
            Some(hours)
        }
        _ => None,
    };

    EnrichedTicket {
        created_date: created.map(|ts| ts.date_naive()),
        created_day: created.map(|ts| ts.day()),
        created_hour: created.map(|ts| ts.hour()),
        created_weekday: created.map(|ts| ts.weekday().num_days_from_monday()),
        created_weekday_name: created.map(|ts| weekday_name(ts.weekday()).to_string()),
        resolution_hours,
        ticket_id: ticket.ticket_id,
        created_at: ticket.created_at,
        closed_at: ticket.closed_at,
        category: ticket.category,
        priority: ticket.priority,
        status: ticket.status,
        raw: ticket.raw,
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alternate_id_key_resolves() {
        let ticket = normalize_ticket(&json!({"ticket_id": 7}));
        assert_eq!(ticket.ticket_id, Some("7".into()));
    }

    #[test]
    fn primary_key_wins_over_alternates() {
        let ticket = normalize_ticket(&json!({"id": 1, "ticket_id": 2, "_id": 3}));
        assert_eq!(ticket.ticket_id, Some("1".into()));
    }

    #[test]
    fn unparsable_timestamp_keeps_row() {
        let ticket = normalize_ticket(&json!({
            "id": 5,
            "created_at": "soon",
            "status": "open"
        }));
        assert_eq!(ticket.created_at, None);
        assert_eq!(ticket.status, Some("open".into()));
    }

    #[test]
    fn detail_fill_never_overwrites() {
        let mut ticket = normalize_ticket(&json!({"id": 1, "category": "billing"}));
        fill_from_detail(
            &mut ticket,
            &json!({"category": "network", "closed_at": "2024-01-02T00:00:00Z"}),
        );
        assert_eq!(ticket.category, Some("billing".into()));
        assert!(ticket.closed_at.is_some());
    }

    #[test]
    fn detail_fill_ignores_cat_shorthand() {
        let mut ticket = normalize_ticket(&json!({"id": 1}));
        fill_from_detail(&mut ticket, &json!({"cat": "billing"}));
        assert_eq!(ticket.category, None);
    }

    #[test]
    fn wants_detail_requires_an_id() {
        let with_id = normalize_ticket(&json!({"id": 1}));
        let without_id = normalize_ticket(&json!({"status": "open"}));
        assert!(with_id.wants_detail());
        assert!(!without_id.wants_detail());
    }

    #[test]
    fn wants_detail_false_when_complete() {
        let ticket = normalize_ticket(&json!({
            "id": 1,
            "category": "billing",
            "closed_at": "2024-01-02T00:00:00Z"
        }));
        assert!(!ticket.wants_detail());
    }

    #[test]
    fn resolution_hours_from_both_endpoints() {
        let enriched = enrich(normalize_ticket(&json!({
            "id": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "closed_at": "2024-01-01T02:30:00Z"
        })));
        assert_eq!(enriched.resolution_hours, Some(2.5));
    }

    #[test]
    fn resolution_hours_none_when_either_endpoint_missing() {
        let open = enrich(normalize_ticket(&json!({
            "id": 1,
            "created_at": "2024-01-01T00:00:00Z"
        })));
        let orphan = enrich(normalize_ticket(&json!({
            "id": 2,
            "closed_at": "2024-01-01T00:00:00Z"
        })));
        assert_eq!(open.resolution_hours, None);
        assert_eq!(orphan.resolution_hours, None);
    }

    #[test]
    fn negative_resolution_passes_through() {
        let enriched = enrich(normalize_ticket(&json!({
            "id": 1,
            "created_at": "2024-01-02T00:00:00Z",
            "closed_at": "2024-01-01T00:00:00Z"
        })));
        assert_eq!(enriched.resolution_hours, Some(-24.0));
    }

    #[test]
    fn derived_fields_follow_created_at() {
        // 2024-01-01 is a Monday.
        let enriched = enrich(normalize_ticket(&json!({
            "id": 1,
            "created_at": "2024-01-01T09:15:00Z"
        })));
        assert_eq!(enriched.created_day, Some(1));
        assert_eq!(enriched.created_hour, Some(9));
        assert_eq!(enriched.created_weekday, Some(0));
        assert_eq!(enriched.created_weekday_name.as_deref(), Some("Monday"));

        let bare = enrich(normalize_ticket(&json!({"id": 2})));
        assert_eq!(bare.created_date, None);
        assert_eq!(bare.created_weekday_name, None);
    }
}
