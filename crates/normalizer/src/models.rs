use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One ticket after alternate-key resolution. Every field except `raw` is
/// best effort; a record missing everything but an id still becomes a row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedTicket {
    pub ticket_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub raw: serde_json::Value,
}

impl NormalizedTicket {
    /// True when a detail fetch could still contribute missing fields.
    /// Requires an id to address the detail endpoint.
    pub fn wants_detail(&self) -> bool {
        self.ticket_id.is_some() && (self.category.is_none() || self.closed_at.is_none())
    }
}

/// A normalized ticket plus the derived calendar buckets and resolution
/// duration. Derived fields are `None` whenever `created_at` is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedTicket {
    pub ticket_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub created_date: Option<NaiveDate>,
    pub created_day: Option<u32>,
    /// Hour of day, 0-23.
    pub created_hour: Option<u32>,
    /// 0 = Monday .. 6 = Sunday.
    pub created_weekday: Option<u32>,
    pub created_weekday_name: Option<String>,
    /// Hours between creation and closure; `None` unless both are known.
    pub resolution_hours: Option<f64>,
    pub raw: serde_json::Value,
}
