//! Plain-text rendering for the one-shot commands.

use std::fmt::Write;

use fakernet_engine::{CPU_WARNING_PERCENT, DISK_WARNING_PERCENT, GaugeStyle, MEMORY_WARNING_PERCENT, classify};
use fakernet_types::{Catalogue, ParamSpec, RosterRow, SystemMetricsSnapshot};
use fakernet_util::{format_percent, format_usage};
use unicode_width::UnicodeWidthStr;

const ROSTER_HEADERS: [&str; 5] = ["MODULE", "ID", "IP", "DESCRIPTION", "STATUS"];

/// Left-aligned columns separated by two spaces; `No results` without rows.
pub fn render_table<S: AsRef<str>>(columns: &[S], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "No results\n".to_string();
    }
    let mut widths: Vec<usize> = columns.iter().map(|column| column.as_ref().width()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            match widths.get_mut(index) {
                Some(width) => *width = (*width).max(cell.width()),
                None => widths.push(cell.width()),
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, columns.iter().map(AsRef::as_ref), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.width());
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 2));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// One block per module, functions indented beneath with their parameters.
pub fn render_catalogue(catalogue: &Catalogue) -> String {
    let mut out = String::new();
    for module in catalogue.module_names() {
        let _ = writeln!(out, "{module}");
        for function in catalogue.function_names(module) {
            let Some(spec) = catalogue.function(module, function) else {
                continue;
            };
            match spec.description() {
                Some(description) => {
                    let _ = writeln!(out, "  {function}: {description}");
                }
                None => {
                    let _ = writeln!(out, "  {function}");
                }
            }
            for (name, param) in spec.params() {
                let _ = writeln!(out, "    {name} ({})", describe_param(param));
            }
        }
    }
    out
}

fn describe_param(param: &ParamSpec) -> String {
    match param {
        ParamSpec::Enumerated(choices) => format!("one of: {}", choices.join(", ")),
        other => other.hint().to_string(),
    }
}

fn metric_line(label: &str, percent: f64, threshold: f64, details: Option<String>) -> String {
    let marker = match classify(percent, threshold) {
        GaugeStyle::Normal => "",
        GaugeStyle::Warning => "  [warning]",
    };
    match details {
        Some(details) => format!("{label:<8}{}%  {details}{marker}\n", format_percent(percent)),
        None => format!("{label:<8}{}%{marker}\n", format_percent(percent)),
    }
}

pub fn render_metrics(snapshot: &SystemMetricsSnapshot) -> String {
    let mut out = format!("System  {}\n", snapshot.system);
    out.push_str(&metric_line("CPU", snapshot.cpu_percent, CPU_WARNING_PERCENT, None));
    out.push_str(&metric_line(
        "Memory",
        snapshot.memory_percent_rounded(),
        MEMORY_WARNING_PERCENT,
        Some(format_usage(snapshot.memory_used, snapshot.memory_total)),
    ));
    out.push_str(&metric_line(
        "Disk",
        snapshot.disk_percent_rounded(),
        DISK_WARNING_PERCENT,
        Some(format_usage(snapshot.disk_used, snapshot.disk_total)),
    ));
    out
}

pub fn render_roster(rows: &[RosterRow]) -> String {
    let rows: Vec<Vec<String>> = rows.iter().map(|row| row.cells().to_vec()).collect();
    render_table(&ROSTER_HEADERS, &rows)
}
