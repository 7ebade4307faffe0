use crate::core::coverage::CoverageRow;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

/// Spinner shown while a step runs
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Create an ASCII histogram
pub fn ascii_histogram(data: &[(String, usize)], width: usize, use_color: bool) -> String {
    let mut output = String::new();

    if data.is_empty() {
        return output;
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    let max_label_len = data.iter().map(|(s, _)| s.len()).max().unwrap_or(0);

    for (label, value) in data {
        let percentage = (*value as f64 / max_value as f64) * 100.0;
        let bar_width = ((percentage / 100.0) * width as f64) as usize;

        let bar = if use_color {
            match percentage as u32 {
                0..=25 => "█".repeat(bar_width).red().to_string(),
                26..=50 => "█".repeat(bar_width).yellow().to_string(),
                51..=75 => "█".repeat(bar_width).blue().to_string(),
                _ => "█".repeat(bar_width).green().to_string(),
            }
        } else {
            "█".repeat(bar_width)
        };

        let empty = "░".repeat(width.saturating_sub(bar_width));

        output.push_str(&format!(
            "{:>width$} {}{} {:>6}\n",
            label,
            bar,
            empty,
            value,
            width = max_label_len
        ));
    }

    output
}

/// Rows per consensus vote count
pub fn vote_histogram(distribution: &BTreeMap<usize, usize>, use_color: bool) -> String {
    let data: Vec<(String, usize)> = distribution
        .iter()
        .map(|(votes, rows)| (format!("{} votes", votes), *rows))
        .collect();
    ascii_histogram(&data, 40, use_color)
}

/// Create a progress bar
pub fn progress_bar(value: f64, max: f64, width: usize, label: &str, label_width: usize, use_color: bool) -> String {
    let percentage = if max > 0.0 {
        (value / max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((percentage / 100.0) * width as f64) as usize;
    let empty = width.saturating_sub(filled);

    let bar = if use_color {
        let filled_str = "█".repeat(filled);
        let color_bar = match percentage as u32 {
            0..=25 => filled_str.red(),
            26..=50 => filled_str.yellow(),
            51..=75 => filled_str.blue(),
            _ => filled_str.green(),
        };
        format!("{}{}", color_bar, "░".repeat(empty))
    } else {
        format!("{}{}", "█".repeat(filled), "░".repeat(empty))
    };

    format!("{:<label_width$} {} {:5.1}%", label, bar, percentage)
}

/// One bar per tool showing the share of genes it annotated
pub fn coverage_bars(rows: &[CoverageRow], use_color: bool) -> String {
    let label_width = rows.iter().map(|r| r.tool.len()).max().unwrap_or(0);
    rows.iter()
        .map(|row| progress_bar(row.percentage, 100.0, 30, &row.tool, label_width, use_color) + "\n")
        .collect()
}
