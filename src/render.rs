use std::fmt::Write;

use crate::analysis::{CorrelationMatrix, CrossTab, FieldSummary, GroupCount, ValueCount};
use crate::dashboard::DashboardReport;
use crate::data::filter::FilterCriteria;
use crate::data::model::Dataset;

const BAR_WIDTH: usize = 30;
const NO_DATA: &str = "  (no data)\n";

// ---------------------------------------------------------------------------
// Whole dashboard
// ---------------------------------------------------------------------------

/// Plain-text rendering of a dashboard report for the terminal.
pub fn render_report(report: &DashboardReport, criteria: &FilterCriteria) -> String {
    let mut out = String::new();
    let o = &report.overview;

    heading(&mut out, "Welcome survey");
    if criteria.is_unconstrained() {
        let _ = writeln!(out, "  filters: none");
    } else {
        let active: Vec<String> = criteria.active().map(|(f, v)| format!("{f}={v}")).collect();
        let _ = writeln!(out, "  filters: {}", active.join(", "));
    }
    let _ = writeln!(out, "  respondents:         {} of {}", o.respondents, o.total_respondents);
    let _ = writeln!(out, "  most common age:     {}", o.modal_age.as_deref().unwrap_or("no data"));
    let _ = writeln!(out, "  most common edu:     {}", o.modal_edu_level.as_deref().unwrap_or("no data"));
    let _ = writeln!(out, "  prefer sweet:        {:.1}%", o.sweet_share);

    if report.is_empty() {
        let _ = writeln!(out, "\nNo responses match the selected filters. Try relaxing them.");
        return out;
    }

    heading(&mut out, "Age brackets");
    summary_section(&mut out, report.age.as_ref());

    heading(&mut out, "Gender");
    match &report.gender {
        Some(dist) if !dist.is_empty() => {
            let max = dist.iter().map(|g| g.count).max().unwrap_or(0);
            for g in dist {
                bar_line(&mut out, g.gender.label(), g.count, max);
            }
        }
        _ => out.push_str(NO_DATA),
    }

    heading(&mut out, "Education");
    summary_section(&mut out, report.edu_level.as_ref());

    heading(&mut out, "Sweet or salty");
    summary_section(&mut out, report.sweet_or_salty.as_ref());

    heading(&mut out, "Hobbies");
    group_section(&mut out, &report.hobbies);

    heading(&mut out, "Learning preferences");
    group_section(&mut out, &report.learning_preferences);

    heading(&mut out, "Motivation");
    group_section(&mut out, &report.motivations);

    heading(&mut out, "Age vs years of experience");
    match &report.age_vs_experience {
        Some(t) => out.push_str(&render_crosstab(t)),
        None => out.push_str(NO_DATA),
    }

    heading(&mut out, "Top industries");
    match &report.top_industries {
        Some(top) => value_bars(&mut out, top),
        None => out.push_str(NO_DATA),
    }

    heading(&mut out, "Indicator correlations");
    out.push_str(&render_correlation(&report.correlation));

    if let Some(d) = &report.describe {
        heading(&mut out, &format!("Value counts for '{}'", d.field));
        out.push_str(&render_frequency_table(d));
    }

    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.chars().count()));
}

fn bar_line(out: &mut String, label: &str, count: usize, max: usize) {
    let len = if max == 0 { 0 } else { count * BAR_WIDTH / max };
    let _ = writeln!(out, "  {label:<24} {count:>5} {}", "#".repeat(len));
}

fn value_bars(out: &mut String, values: &[ValueCount]) {
    if values.is_empty() {
        out.push_str(NO_DATA);
        return;
    }
    let max = values.iter().map(|v| v.count).max().unwrap_or(0);
    for v in values {
        bar_line(out, &v.label, v.count, max);
    }
}

fn summary_section(out: &mut String, summary: Option<&FieldSummary>) {
    match summary {
        Some(s) => value_bars(out, &s.value_counts),
        None => out.push_str(NO_DATA),
    }
}

fn group_section(out: &mut String, counts: &[GroupCount]) {
    if counts.is_empty() {
        out.push_str(NO_DATA);
        return;
    }
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    for c in counts {
        bar_line(out, &c.label, c.count, max);
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub fn render_crosstab(table: &CrossTab) -> String {
    if table.is_empty() {
        return NO_DATA.to_string();
    }
    let width = table
        .col_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    let mut out = String::new();
    let _ = write!(out, "  {:<12}", table.row_field);
    for label in &table.col_labels {
        let _ = write!(out, " {label:>width$}");
    }
    out.push('\n');
    for (label, row) in table.row_labels.iter().zip(&table.counts) {
        let _ = write!(out, "  {label:<12}");
        for count in row {
            let _ = write!(out, " {count:>width$}");
        }
        out.push('\n');
    }
    out
}

pub fn render_correlation(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::new();
    let _ = write!(out, "  {:<24}", "");
    for i in 0..matrix.len() {
        let _ = write!(out, " {:>5}", format!("c{i}"));
    }
    out.push('\n');
    for (i, label) in matrix.labels.iter().enumerate() {
        let _ = write!(out, "  {:<24}", format!("c{i} {label}"));
        for j in 0..matrix.len() {
            match matrix.get(i, j) {
                Some(r) => {
                    let _ = write!(out, " {r:>5.2}");
                }
                None => {
                    let _ = write!(out, " {:>5}", "-");
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_frequency_table(summary: &FieldSummary) -> String {
    if summary.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = String::new();
    for vc in summary.ranked() {
        let _ = writeln!(out, "  {:<24} {:>5}", vc.label, vc.count);
    }
    out
}

/// The first `limit` responses as an aligned table, one column per schema
/// field. Missing cells are left blank and gender codes show their label.
pub fn render_rows(dataset: &Dataset, limit: usize) -> String {
    if dataset.is_empty() || dataset.schema().is_empty() {
        return NO_DATA.to_string();
    }
    let schema = dataset.schema();
    let names: Vec<&str> = schema.column_names().collect();
    let rows: Vec<Vec<String>> = dataset
        .records()
        .iter()
        .take(limit)
        .map(|record| {
            names
                .iter()
                .zip(record.values())
                .map(|(field, v)| {
                    if v.is_missing() {
                        String::new()
                    } else {
                        schema.display_label(field, v)
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    table_line(&mut out, &names, &widths);
    for row in &rows {
        table_line(&mut out, row, &widths);
    }
    if dataset.len() > limit {
        let _ = writeln!(out, "  ... {} more", dataset.len() - limit);
    }
    out
}

fn table_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    out.push(' ');
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(out, " {:<width$}", cell.as_ref());
    }
    let end = out.trim_end_matches(' ').len();
    out.truncate(end);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardOptions;
    use crate::data::filter::apply;
    use crate::data::fixtures::{SAMPLE, dataset_from_csv};

    #[test]
    fn report_mentions_every_section() {
        let ds = dataset_from_csv(SAMPLE);
        let report = DashboardReport::compute(&ds, ds.len(), &DashboardOptions::default()).unwrap();
        let text = render_report(&report, &FilterCriteria::new());
        for title in ["Age brackets", "Hobbies", "Top industries", "Indicator correlations"] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(text.contains("respondents:         5 of 5"));
        assert!(text.contains("Online Courses"));
    }

    #[test]
    fn empty_selection_shows_placeholder() {
        let ds = dataset_from_csv(SAMPLE);
        let criteria = FilterCriteria::new().with("industry", "Mining");
        let none = apply(&ds, &criteria).unwrap();
        let report = DashboardReport::compute(&none, ds.len(), &DashboardOptions::default()).unwrap();
        let text = render_report(&report, &criteria);
        assert!(text.contains("industry=Mining"));
        assert!(text.contains("No responses match"));
        assert!(!text.contains("Hobbies"));
    }

    #[test]
    fn detail_rows_show_chosen_columns() {
        let ds = dataset_from_csv(SAMPLE);
        let narrow = ds.project(&["gender", "industry"]).unwrap();
        let text = render_rows(&narrow, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["  gender industry", "  woman  IT", "  man", "  ... 3 more"]);
    }

    #[test]
    fn crosstab_layout() {
        let ds = dataset_from_csv(SAMPLE);
        let t = crate::analysis::cross_tab(&ds, "age", "years_of_experience").unwrap();
        let text = render_crosstab(&t);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("  25-34"));
    }
}
