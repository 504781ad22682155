use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use normalizer::EnrichedTicket;

/// Bucket label for rows without a resolved category.
pub const UNKNOWN_CATEGORY: &str = "(unknown)";

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Per-day counts over a contiguous window ending today. Always exactly
/// `days` entries; days without tickets count zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTrend {
    pub days: Vec<(NaiveDate, u64)>,
    /// Row count of the record set the trend was built from, carried for
    /// the chart caption.
    pub total: usize,
}

pub fn daily_trend(records: &[EnrichedTicket], days: u32, today: NaiveDate) -> DailyTrend {
    let start = today - Duration::days(i64::from(days) - 1);
    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for record in records {
        if let Some(date) = record.created_date {
            if date >= start && date <= today {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
    }
    let series = (0..days)
        .map(|offset| {
            let date = start + Duration::days(i64::from(offset));
            (date, counts.get(&date).copied().unwrap_or(0))
        })
        .collect();
    DailyTrend {
        days: series,
        total: records.len(),
    }
}

/// Counts per hour of day. All 24 buckets are always present.
pub fn hourly_distribution(records: &[EnrichedTicket]) -> [u64; 24] {
    let mut buckets = [0u64; 24];
    for record in records {
        if let Some(hour) = record.created_hour {
            if let Some(bucket) = buckets.get_mut(hour as usize) {
                *bucket += 1;
            }
        }
    }
    buckets
}

/// 7x24 matrix of counts, row 0 = Monday. All 168 cells are always
/// present, zero-filled.
pub fn weekday_hour_matrix(records: &[EnrichedTicket]) -> [[u64; 24]; 7] {
    let mut matrix = [[0u64; 24]; 7];
    for record in records {
        if let (Some(weekday), Some(hour)) = (record.created_weekday, record.created_hour) {
            if let Some(cell) = matrix
                .get_mut(weekday as usize)
                .and_then(|row| row.get_mut(hour as usize))
            {
                *cell += 1;
            }
        }
    }
    matrix
}

/// Category counts, descending. Rows without a category land in the
/// `(unknown)` bucket, so the counts always sum to the row count. Ties
/// keep first-seen order (stable sort).
pub fn category_counts(records: &[EnrichedTicket]) -> Vec<(String, u64)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in records {
        let label = record
            .category
            .clone()
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
        if !counts.contains_key(&label) {
            order.push(label.clone());
        }
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut result: Vec<(String, u64)> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            (label, count)
        })
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

pub fn top_categories(records: &[EnrichedTicket], n: usize) -> Vec<(String, u64)> {
    let mut counts = category_counts(records);
    counts.truncate(n);
    counts
}

/// Mean resolution hours per category over rows with a known resolution,
/// ascending. Rows without a category are excluded here (unlike the count
/// breakdowns): an unknown-category mean is not actionable.
pub fn avg_resolution_by_category(records: &[EnrichedTicket]) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, u64)> = HashMap::new();
    for record in records {
        let (Some(hours), Some(category)) = (record.resolution_hours, record.category.as_ref())
        else {
            continue;
        };
        if !sums.contains_key(category) {
            order.push(category.clone());
        }
        let entry = sums.entry(category.clone()).or_insert((0.0, 0));
        entry.0 += hours;
        entry.1 += 1;
    }
    let mut result: Vec<(String, f64)> = order
        .into_iter()
        .map(|label| {
            let (sum, count) = sums[&label];
            (label, sum / count as f64)
        })
        .collect();
    result.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use normalizer::{enrich, normalize_ticket};
    use serde_json::json;

    fn record(value: serde_json::Value) -> EnrichedTicket {
        enrich(normalize_ticket(&value))
    }

    fn day(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    #[test]
    fn daily_trend_zero_fills_the_full_window() {
        let records = [
            record(json!({"id": 1, "created_at": "2024-03-10T08:00:00Z"})),
            record(json!({"id": 2, "created_at": "2024-03-10T19:00:00Z"})),
            record(json!({"id": 3, "created_at": "2024-03-12T00:30:00Z"})),
        ];
        let trend = daily_trend(&records, 7, day("2024-03-14"));

        assert_eq!(trend.days.len(), 7);
        assert_eq!(trend.days[0].0, day("2024-03-08"));
        assert_eq!(trend.days[6].0, day("2024-03-14"));
        assert_eq!(trend.days[2], (day("2024-03-10"), 2));
        assert_eq!(trend.days[4], (day("2024-03-12"), 1));
        assert_eq!(trend.days.iter().map(|(_, c)| c).sum::<u64>(), 3);
        assert_eq!(trend.total, 3);
    }

    #[test]
    fn daily_trend_of_empty_input_is_all_zeros() {
        let trend = daily_trend(&[], 30, day("2024-03-14"));
        assert_eq!(trend.days.len(), 30);
        assert!(trend.days.iter().all(|(_, count)| *count == 0));
        assert_eq!(trend.total, 0);
    }

    #[test]
    fn daily_trend_ignores_dates_outside_the_window() {
        let records = [record(json!({"id": 1, "created_at": "2020-01-01T00:00:00Z"}))];
        let trend = daily_trend(&records, 7, day("2024-03-14"));
        assert!(trend.days.iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn hourly_distribution_always_has_24_buckets() {
        let records = [
            record(json!({"id": 1, "created_at": "2024-03-10T08:10:00Z"})),
            record(json!({"id": 2, "created_at": "2024-03-11T08:45:00Z"})),
            record(json!({"id": 3})),
        ];
        let buckets = hourly_distribution(&records);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[8], 2);
        assert_eq!(buckets.iter().sum::<u64>(), 2);
    }

    #[test]
    fn weekday_hour_matrix_has_all_cells() {
        // 2024-03-11 is a Monday.
        let records = [record(json!({"id": 1, "created_at": "2024-03-11T23:00:00Z"}))];
        let matrix = weekday_hour_matrix(&records);
        assert_eq!(matrix.len() * matrix[0].len(), 168);
        assert_eq!(matrix[0][23], 1);
        assert_eq!(matrix.iter().flatten().sum::<u64>(), 1);
    }

    #[test]
    fn category_counts_bucket_missing_as_unknown() {
        let records = [
            record(json!({"id": 1, "category": "billing"})),
            record(json!({"id": 2})),
            record(json!({"id": 3, "category": null})),
            record(json!({"id": 4, "category": "billing"})),
        ];
        let counts = category_counts(&records);
        assert_eq!(
            counts,
            vec![("billing".to_string(), 2), (UNKNOWN_CATEGORY.to_string(), 2)]
        );
        assert_eq!(
            counts.iter().map(|(_, c)| c).sum::<u64>() as usize,
            records.len()
        );
    }

    #[test]
    fn top_categories_orders_descending_with_first_seen_ties() {
        let mut records = Vec::new();
        for (category, count) in [("A", 10), ("B", 8), ("C", 8), ("D", 3), ("E", 2), ("F", 1)] {
            for _ in 0..count {
                records.push(record(json!({"id": 1, "category": category})));
            }
        }
        let top = top_categories(&records, 5);
        let labels: Vec<&str> = top.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C", "D", "E"]);
        assert_eq!(top[0].1, 10);
    }

    #[test]
    fn category_counts_are_deterministic() {
        let records = [
            record(json!({"id": 1, "category": "a"})),
            record(json!({"id": 2, "category": "b"})),
            record(json!({"id": 3, "category": "c"})),
        ];
        assert_eq!(category_counts(&records), category_counts(&records));
    }

    #[test]
    fn avg_resolution_sorts_ascending_and_skips_open_rows() {
        let records = [
            record(json!({
                "id": 1, "category": "slow",
                "created_at": "2024-01-01T00:00:00Z", "closed_at": "2024-01-02T00:00:00Z"
            })),
            record(json!({
                "id": 2, "category": "fast",
                "created_at": "2024-01-01T00:00:00Z", "closed_at": "2024-01-01T01:00:00Z"
            })),
            record(json!({"id": 3, "category": "slow"})),
        ];
        let avg = avg_resolution_by_category(&records);
        assert_eq!(avg.len(), 2);
        assert_eq!(avg[0].0, "fast");
        assert_eq!(avg[0].1, 1.0);
        assert_eq!(avg[1].0, "slow");
        assert_eq!(avg[1].1, 24.0);
    }

    #[test]
    fn avg_resolution_empty_when_nothing_closed() {
        let records = [record(json!({"id": 1, "category": "billing"}))];
        assert!(avg_resolution_by_category(&records).is_empty());
    }
}
