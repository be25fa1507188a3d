//! Plain-text rendering of the screen.

use std::fmt::Write;

use screener::{CompanySummary, ResultsPanel, StatementPivot};

/// Lays out a left-aligned grid with a dashed rule under the header.
pub(crate) fn grid<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.as_ref().chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().map(AsRef::as_ref), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Renders the results area.
pub(crate) fn results(panel: &ResultsPanel) -> String {
    match panel {
        ResultsPanel::Loading => "Loading...\n".to_string(),
        ResultsPanel::Empty(text) => format!("{text}\n"),
        ResultsPanel::Table(table) => {
            format!("{}\n\n{}", table.summary(), grid(&table.headers(), &table.cells))
        }
    }
}

/// Renders the company header block.
pub(crate) fn summary(summary: &CompanySummary) -> String {
    let mut out = format!("{}\n{}\n\n", summary.title, summary.subtitle);
    let width = summary
        .facts
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    for (label, value) in &summary.facts {
        let _ = writeln!(out, "{label:<width$}  {value}");
    }
    out
}

/// Renders one statement as a metric-by-year grid.
pub(crate) fn pivot(pivot: &StatementPivot) -> String {
    let mut headers = vec!["Metric".to_string()];
    headers.extend(pivot.years.iter().map(i32::to_string));
    let rows: Vec<Vec<String>> = pivot
        .rows
        .iter()
        .map(|row| {
            let mut line = Vec::with_capacity(row.cells.len() + 1);
            line.push(row.metric.clone());
            line.extend(row.cells.iter().cloned());
            line
        })
        .collect();
    format!("{}\n{}", pivot.label, grid(&headers, &rows))
}
