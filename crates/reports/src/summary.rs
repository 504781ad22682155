use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use normalizer::EnrichedTicket;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total: usize,
    pub first_created: Option<DateTime<Utc>>,
    pub last_created: Option<DateTime<Utc>>,
    /// Distinct resolved categories; the unknown bucket does not count.
    pub distinct_categories: usize,
    /// Status counts, descending, ties in first-seen order.
    pub status_counts: Vec<(String, u64)>,
    /// Rows with a known close time.
    pub closed_count: usize,
    /// Mean resolution over closed rows with a computable duration.
    pub avg_resolution_hours: Option<f64>,
}

pub fn summarize(records: &[EnrichedTicket]) -> SummaryStats {
    let first_created = records.iter().filter_map(|r| r.created_at).min();
    let last_created = records.iter().filter_map(|r| r.created_at).max();

    let distinct_categories = records
        .iter()
        .filter_map(|r| r.category.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in records {
        if let Some(status) = &record.status {
            if !counts.contains_key(status) {
                order.push(status.clone());
            }
            *counts.entry(status.clone()).or_insert(0) += 1;
        }
    }
    let mut status_counts: Vec<(String, u64)> = order
        .into_iter()
        .map(|status| {
            let count = counts[&status];
            (status, count)
        })
        .collect();
    status_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let closed_count = records.iter().filter(|r| r.closed_at.is_some()).count();
    let resolutions: Vec<f64> = records
        .iter()
        .filter(|r| r.closed_at.is_some())
        .filter_map(|r| r.resolution_hours)
        .collect();
    let avg_resolution_hours = if resolutions.is_empty() {
        None
    } else {
        Some(resolutions.iter().sum::<f64>() / resolutions.len() as f64)
    };

    SummaryStats {
        total: records.len(),
        first_created,
        last_created,
        distinct_categories,
        status_counts,
        closed_count,
        avg_resolution_hours,
    }
}

/// Writes the statistics block to stdout. This is a report artifact, not a
/// log line, so it bypasses tracing.
pub fn print_stats(stats: &SummaryStats) {
    println!("\n{}", "=".repeat(60));
    println!("DETAILED STATISTICS");
    println!("{}", "=".repeat(60));
    println!("Total tickets: {}", stats.total);
    if let (Some(first), Some(last)) = (stats.first_created, stats.last_created) {
        println!(
            "Data period: from {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }
    println!("Unique categories: {}", stats.distinct_categories);
    if !stats.status_counts.is_empty() {
        println!("\nStatus distribution:");
        for (status, count) in &stats.status_counts {
            println!("  - {status}: {count}");
        }
    }
    if let Some(avg) = stats.avg_resolution_hours {
        println!("Average resolution time: {avg:.1} hours");
        println!("Closed tickets: {}", stats.closed_count);
    }
}
