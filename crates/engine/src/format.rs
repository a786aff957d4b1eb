//! Markdown rendering of a resolved query.

use orderdesk_core::report::{BreakdownRow, MetricSet, QueryResult};

/// Render the report sections requested by `metric`, Backlog first.
pub fn format_report(result: &QueryResult, metric: MetricSet) -> String {
    let mut sections = Vec::with_capacity(2);

    if metric.includes_backlog() {
        sections.push(section(result, "Backlog", result.total_backlog, |row| row.backlog));
    }
    if metric.includes_mtd() {
        sections.push(section(result, "MTD", result.total_mtd, |row| row.mtd));
    }

    sections.join("\n\n")
}

fn section(
    result: &QueryResult,
    label: &str,
    total: f64,
    value: impl Fn(&BreakdownRow) -> f64,
) -> String {
    let mut lines = vec![
        format!("## {} - {label} Summary", result.customer_id),
        format!("**Total {label}:** {}", format_quantity(total)),
        String::new(),
        format!("### {label} by City, Type and Incoterm"),
    ];
    lines.extend(result.breakdown.iter().map(|row| {
        format!(
            "- {} | {} | {} → {}",
            row.city,
            row.order_type,
            row.incoterm,
            format_quantity(value(row))
        )
    }));
    lines.join("\n")
}

/// Two decimals with comma thousands separators: `1234567.891` → `1,234,567.89`.
pub fn format_quantity(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
