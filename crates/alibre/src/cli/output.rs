//! Output formatting utilities for CLI commands
//!
//! Provides consistent formatting for:
//! - Tables with column alignment
//! - Timestamps (relative and absolute)
//! - Colors for format labels

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a last-opened timestamp (Unix millis, 0 = never)
pub fn format_opened(millis: i64) -> String {
    if millis <= 0 {
        return "never".to_string();
    }
    format_time(UNIX_EPOCH + Duration::from_millis(millis as u64))
}

/// Format a system time as a human-readable relative time
///
/// Examples:
/// - "2 seconds ago"
/// - "5 minutes ago"
/// - "3 hours ago"
/// - "2024-12-15 14:30" (if older than a week)
pub fn format_time(time: SystemTime) -> String {
    match SystemTime::now().duration_since(time) {
        Ok(duration) => format_duration_ago(duration),
        Err(_) => "just now".to_string(),
    }
}

/// Format a duration as "X time ago"
fn format_duration_ago(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{} second{} ago", secs, if secs == 1 { "" } else { "s" })
    } else if secs < 3600 {
        let mins = secs / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if secs < 86400 {
        let hours = secs / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if secs < 604800 {
        let days = secs / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_absolute_time(duration)
    }
}

fn format_absolute_time(duration_ago: Duration) -> String {
    use chrono::Local;

    let time = Local::now() - chrono::Duration::seconds(duration_ago.as_secs() as i64);
    time.format("%Y-%m-%d %H:%M").to_string()
}

/// Shorten text to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = new_table(headers);
    for row in rows {
        table.add_row(row);
    }
    println!("{}", table);
}

/// Print a table with custom column colors
pub fn print_table_colored(headers: &[&str], rows: Vec<Vec<(String, Option<Color>)>>) {
    let mut table = new_table(headers);
    for row in rows {
        let cells: Vec<Cell> = row
            .into_iter()
            .map(|(text, color)| match color {
                Some(c) => Cell::new(text).fg(c),
                None => Cell::new(text),
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);
    table
}

/// Color for a book format label
pub fn color_for_format(format: &str) -> Color {
    match format.to_lowercase().as_str() {
        "pdf" => Color::Red,
        "epub" => Color::Green,
        "txt" | "rtf" => Color::White,
        "html" | "htm" | "fb2" => Color::Yellow,
        "mobi" | "azw" | "azw3" => Color::Magenta,
        _ => Color::Grey,
    }
}
