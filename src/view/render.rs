use super::state::ViewState;
use crate::papers::PaperRecord;
use std::fmt::Write;

pub const EMPTY_PLACEHOLDER: &str = "No papers to display. Use search to load papers.";
pub const LOADING_PLACEHOLDER: &str = "Loading...";

const HEADERS: [&str; 7] = ["Title", "Branch", "Subject", "Year", "Sem", "Type", "File"];

/// Render the results section as plain text.
pub fn render_results(state: &ViewState) -> String {
    let papers = state.papers();
    let mut out = format!("Results ({})\n", papers.len());

    if state.is_searching() {
        out.push_str(LOADING_PLACEHOLDER);
    } else if papers.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
    } else {
        out.push_str(&render_table(papers));
    }
    out
}

fn render_table(papers: &[PaperRecord]) -> String {
    let rows: Vec<[String; 7]> = papers.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for r in &rows {
        push_line(&mut out, r, &widths);
    }
    // drop the final newline
    out.pop();
    out
}

fn row(p: &PaperRecord) -> [String; 7] {
    [
        p.title.clone(),
        p.branch.clone(),
        p.subject.clone(),
        p.year.clone(),
        p.semester.clone(),
        p.exam_type.clone(),
        p.file_url.clone(),
    ]
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len() - 1;
    for (i, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            let _ = write!(out, "{cell}");
        } else {
            let _ = write!(out, "{cell:<w$}  ");
        }
    }
    out.push('\n');
}
