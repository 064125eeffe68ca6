//! Rendering of result pages

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;

use super::OutputFormat;
use crate::api::{ListSnapshot, Record, ResultPage};

/// Widest a table cell may get before it is cut
const MAX_CELL_WIDTH: usize = 40;

pub fn render_page(page: &ResultPage, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(page).context("Failed to format JSON output")
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(page).context("Failed to format JSON output")
        }
        OutputFormat::Csv => records_to_csv(&page.items),
        OutputFormat::Table => Ok(records_to_table(page)),
    }
}

/// One-line status describing where the data came from
pub fn describe(snapshot: &ListSnapshot) -> Option<String> {
    let error = snapshot.error.as_ref()?;
    if snapshot.is_fallback() {
        Some(format!(
            "{} backend unavailable ({}), showing bundled data",
            "warning:".yellow().bold(),
            error
        ))
    } else {
        Some(format!("{} {}", "error:".red().bold(), error))
    }
}

/// Column order: first record's keys, then keys only later records carry
fn columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn records_to_csv(records: &[Record]) -> Result<String> {
    let columns = columns(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }
    for record in records {
        writer.write_record(columns.iter().map(|c| cell(record.get(c))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{}…", cut)
}

fn records_to_table(page: &ResultPage) -> String {
    let footer = format!(
        "page {} of {} ({} records)",
        page.page, page.total_pages, page.total_records
    );
    if page.items.is_empty() {
        return format!("No records\n{}", footer.dimmed());
    }

    let columns = columns(&page.items);
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|record| columns.iter().map(|c| truncate(&cell(record.get(c)))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{:<width$}", name, width = *width))
        .collect();
    out.push_str(&header.join("  ").bold().to_string());
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out.push_str(&footer.dimmed().to_string());
    out
}
