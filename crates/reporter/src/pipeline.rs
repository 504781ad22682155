use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use collector::{Collector, TicketApi};
use common::AppConfig;
use normalizer::EnrichedTicket;
use reports::{charts, export, series, summary};
use tracing::info;

/// Runs the whole pipeline once: fetch, normalize, enrich, report. Every
/// expected upstream failure has already degraded to "less data" by the
/// time records arrive here; an empty combined set stops the run before
/// any artifact is produced.
pub async fn run<C: TicketApi + 'static>(config: &AppConfig, client: Arc<C>) -> Result<()> {
    run_as_of(config, client, Utc::now().date_naive()).await
}

/// Same as [`run`] with an explicit "today", which anchors the trend
/// window.
pub async fn run_as_of<C: TicketApi + 'static>(
    config: &AppConfig,
    client: Arc<C>,
    today: NaiveDate,
) -> Result<()> {
    let collector = Collector::new(config, client);

    info!(login = %config.accounts.analyst.login, "fetching categories");
    let categories = collector.fetch_categories().await;
    info!(count = categories.len(), "categories received");

    let raw_tickets = collector.collect().await;
    if raw_tickets.is_empty() {
        println!("No tickets available to analyze.");
        info!("no tickets available, skipping report generation");
        return Ok(());
    }

    let records = collector.build_records(&raw_tickets).await;
    info!(rows = records.len(), "built record set");

    let output_dir = &config.report.output_dir;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let days = config.report.trend_days;
    let windowed = window_since(&records, today, days);

    let trend = series::daily_trend(&windowed, days, today);
    let path = output_dir.join("line_daily_tickets.png");
    charts::render_daily_trend(&trend, days, &path)?;
    info!(path = %path.display(), "saved daily trend");

    let hourly = series::hourly_distribution(&records);
    let path = output_dir.join("bar_hourly_distribution.png");
    charts::render_hourly_distribution(&hourly, &path)?;
    info!(path = %path.display(), "saved hourly distribution");

    let matrix = series::weekday_hour_matrix(&records);
    let path = output_dir.join("heatmap_weekday_hour.png");
    charts::render_weekday_hour_heatmap(&matrix, &path)?;
    info!(path = %path.display(), "saved weekday/hour heatmap");

    let breakdown = series::category_counts(&records);
    let path = output_dir.join("pie_by_category.png");
    charts::render_category_pie(&breakdown, &path)?;
    info!(path = %path.display(), "saved category breakdown");

    let averages = series::avg_resolution_by_category(&records);
    let path = output_dir.join("avg_resolution_by_category.png");
    charts::render_avg_resolution(&averages, &path)?;
    info!(path = %path.display(), "saved resolution averages");

    let top = series::top_categories(&records, config.report.top_categories);
    let path = output_dir.join("top5_categories.csv");
    export::write_category_counts(&top, &path)?;
    info!(path = %path.display(), "saved top categories");

    println!(
        "\nTop-{} categories by ticket count:",
        config.report.top_categories
    );
    for (category, count) in &top {
        println!("  {category}: {count}");
    }

    let stats = summary::summarize(&records);
    summary::print_stats(&stats);

    println!("\nAll charts saved to folder: {}", output_dir.display());
    Ok(())
}

/// Rows created at or after midnight UTC of the window start. Rows with
/// no creation time fall outside any window.
fn window_since(records: &[EnrichedTicket], today: NaiveDate, days: u32) -> Vec<EnrichedTicket> {
    let start = today - Duration::days(i64::from(days) - 1);
    let cutoff = Utc.from_utc_datetime(
        &start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time"),
    );
    records
        .iter()
        .filter(|record| record.created_at.map(|ts| ts >= cutoff).unwrap_or(false))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use normalizer::{enrich, normalize_ticket};
    use serde_json::json;

    #[test]
    fn window_keeps_only_recent_rows_with_timestamps() {
        let records = [
            enrich(normalize_ticket(
                &json!({"id": 1, "created_at": "2024-03-10T12:00:00Z"}),
            )),
            enrich(normalize_ticket(
                &json!({"id": 2, "created_at": "2024-01-01T12:00:00Z"}),
            )),
            enrich(normalize_ticket(&json!({"id": 3}))),
        ];
        let windowed = window_since(&records, "2024-03-14".parse().unwrap(), 30);
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].ticket_id.as_deref(), Some("1"));
    }
}
