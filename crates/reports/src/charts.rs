use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use plotters::element::Pie;
use plotters::prelude::*;

use common::text::truncate_label;

use crate::series::{DailyTrend, WEEKDAY_LABELS};

const LINE_COLOR: RGBColor = RGBColor(0x2e, 0x86, 0xab);
const BAR_COLOR: RGBColor = RGBColor(0xa2, 0x3b, 0x72);
const HBAR_COLOR: RGBColor = RGBColor(0xf1, 0x8f, 0x01);

const PIE_COLORS: [RGBColor; 12] = [
    RGBColor(141, 211, 199),
    RGBColor(255, 255, 179),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
    RGBColor(252, 205, 229),
    RGBColor(217, 217, 217),
    RGBColor(188, 128, 189),
    RGBColor(204, 235, 197),
    RGBColor(255, 237, 111),
];

/// Display width limit for category labels on charts.
const LABEL_MAX_CHARS: usize = 20;

/// Line chart of tickets per day over the trend window.
pub fn render_daily_trend(trend: &DailyTrend, days: u32, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let start = trend.days.first().map(|(date, _)| *date).unwrap_or_default();
    let end = trend.days.last().map(|(date, _)| *date).unwrap_or_default();
    let max = trend.days.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let caption = format!(
        "Ticket Creation Trend by Day (Last {days} Days), Total Tickets: {}",
        trend.total
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(start..end, 0u64..max + 1)?;
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Number of Tickets")
        .x_label_formatter(&|date: &NaiveDate| date.format("%m-%d").to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(
        trend.days.iter().map(|(date, count)| (*date, *count)),
        LINE_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        trend
            .days
            .iter()
            .map(|(date, count)| Circle::new((*date, *count), 4, LINE_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Bar chart of tickets per hour of day, counts annotated above bars.
pub fn render_hourly_distribution(buckets: &[u64; 24], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max = buckets.iter().copied().max().unwrap_or(0).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption("Ticket Distribution by Hour of Day", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(0i32..24i32, 0u64..max + max / 5 + 1)?;
    chart
        .configure_mesh()
        .x_desc("Hour of Day")
        .y_desc("Number of Tickets")
        .x_labels(12)
        .draw()?;

    chart.draw_series(buckets.iter().enumerate().map(|(hour, count)| {
        let hour = hour as i32;
        Rectangle::new([(hour, 0), (hour + 1, *count)], BAR_COLOR.mix(0.7).filled())
    }))?;
    chart.draw_series(
        buckets
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(hour, count)| {
                Text::new(
                    count.to_string(),
                    (hour as i32, *count),
                    ("sans-serif", 14).into_font(),
                )
            }),
    )?;

    root.present()?;
    Ok(())
}

/// Weekday-by-hour heatmap; every one of the 168 cells is drawn, counts
/// annotated in non-empty cells.
pub fn render_weekday_hour_heatmap(matrix: &[[u64; 24]; 7], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max = matrix.iter().flatten().copied().max().unwrap_or(0).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption("Activity by Weekday and Hour", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..24f64, 0f64..7f64)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Hour of Day")
        .y_desc("Day of Week")
        .x_labels(24)
        .y_labels(7)
        .x_label_formatter(&|hour: &f64| format!("{}", *hour as i32))
        .y_label_formatter(&|weekday: &f64| {
            WEEKDAY_LABELS
                .get(*weekday as usize)
                .map(|label| label.to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(matrix.iter().enumerate().flat_map(|(weekday, row)| {
        row.iter().enumerate().map(move |(hour, count)| {
            let (x, y) = (hour as f64, weekday as f64);
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], heat_color(*count, max).filled())
        })
    }))?;
    chart.draw_series(matrix.iter().enumerate().flat_map(|(weekday, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(move |(hour, count)| {
                Text::new(
                    count.to_string(),
                    (hour as f64 + 0.4, weekday as f64 + 0.4),
                    ("sans-serif", 12).into_font(),
                )
            })
    }))?;

    root.present()?;
    Ok(())
}

/// Pie chart of the category breakdown with percentage labels. Labels are
/// shortened for display only.
pub fn render_category_pie(counts: &[(String, u64)], path: &Path) -> Result<()> {
    if counts.is_empty() {
        return render_placeholder(
            path,
            "Ticket Distribution by Problem Category",
            "No ticket categories to plot",
        );
    }

    let root = BitMapBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled("Ticket Distribution by Problem Category", ("sans-serif", 24))?;

    let sizes: Vec<f64> = counts.iter().map(|(_, count)| *count as f64).collect();
    let labels: Vec<String> = counts
        .iter()
        .map(|(label, _)| truncate_label(label, LABEL_MAX_CHARS))
        .collect();
    let colors: Vec<RGBColor> = (0..counts.len())
        .map(|i| PIE_COLORS[i % PIE_COLORS.len()])
        .collect();

    let center = (500, 410);
    let radius = 290.0;
    let label_style = TextStyle::from(("sans-serif", 18).into_font());
    let percentage_style = TextStyle::from(("sans-serif", 16).into_font()).color(&BLACK);
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(label_style);
    pie.percentages(percentage_style);
    inner.draw(&pie)?;

    root.present()?;
    Ok(())
}

/// Horizontal bars of mean resolution hours per category, ascending. An
/// empty input yields the no-data placeholder instead of failing.
pub fn render_avg_resolution(averages: &[(String, f64)], path: &Path) -> Result<()> {
    if averages.is_empty() {
        return render_placeholder(
            path,
            "Average Ticket Resolution Time by Category",
            "No data on closed tickets for resolution time analysis",
        );
    }

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max = averages.iter().map(|(_, hours)| *hours).fold(0.0, f64::max);
    let rows = averages.len() as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Average Ticket Resolution Time by Category",
            ("sans-serif", 24),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..max.max(1.0) * 1.15, 0i32..rows)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Average Resolution Time (hours)")
        .y_labels(averages.len())
        .y_label_formatter(&|row: &i32| {
            usize::try_from(*row)
                .ok()
                .and_then(|idx| averages.get(idx))
                .map(|(label, _)| truncate_label(label, 30))
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(averages.iter().enumerate().map(|(row, (_, hours))| {
        let row = row as i32;
        Rectangle::new([(0.0, row), (*hours, row + 1)], HBAR_COLOR.mix(0.7).filled())
    }))?;
    chart.draw_series(averages.iter().enumerate().map(|(row, (_, hours))| {
        Text::new(
            format!("{hours:.1} h"),
            (*hours, row as i32),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn render_placeholder(path: &Path, title: &str, message: &str) -> Result<()> {
    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 24))?;

    let (width, height) = inner.dim_in_pixel();
    inner.draw(&Text::new(
        message.to_string(),
        (width as i32 / 2 - 220, height as i32 / 2),
        ("sans-serif", 20).into_font(),
    ))?;

    root.present()?;
    Ok(())
}

fn heat_color(count: u64, max: u64) -> RGBColor {
    let t = count as f64 / max as f64;
    let lerp = |from: u8, to: u8| {
        (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
    };
    // White-ish through to deep red.
    RGBColor(lerp(255, 189), lerp(255, 0), lerp(224, 38))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_color_spans_the_ramp() {
        assert_eq!(heat_color(0, 10), RGBColor(255, 255, 224));
        assert_eq!(heat_color(10, 10), RGBColor(189, 0, 38));
    }
}
