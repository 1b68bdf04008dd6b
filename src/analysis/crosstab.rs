use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Dataset, FieldValue};
use crate::error::Result;

/// Contingency table of two categorical fields.
///
/// Rows and columns hold every value observed with both fields present, in
/// ascending order. Unobserved combinations are explicit zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_field: String,
    pub col_field: String,
    pub rows: Vec<FieldValue>,
    pub cols: Vec<FieldValue>,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &FieldValue, col: &FieldValue) -> Option<usize> {
        let r = self.rows.iter().position(|v| v == row)?;
        let c = self.cols.iter().position(|v| v == col)?;
        Some(self.counts[r][c])
    }

    /// Sum of all cells.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        (0..self.cols.len())
            .map(|c| self.counts.iter().map(|row| row[c]).sum())
            .collect()
    }
}

/// Count joint occurrences of `row_field` and `col_field`.
/// Responses missing either value are left out entirely.
pub fn cross_tab(dataset: &Dataset, row_field: &str, col_field: &str) -> Result<CrossTab> {
    let schema = dataset.schema();
    let rpos = schema.require(row_field)?;
    let cpos = schema.require(col_field)?;

    let mut joint: BTreeMap<(&FieldValue, &FieldValue), usize> = BTreeMap::new();
    for rec in dataset.records() {
        let (r, c) = (rec.get(rpos), rec.get(cpos));
        if r.is_missing() || c.is_missing() {
            continue;
        }
        *joint.entry((r, c)).or_default() += 1;
    }

    let mut rows: Vec<&FieldValue> = joint.keys().map(|(r, _)| *r).collect();
    rows.dedup();
    let mut cols: Vec<&FieldValue> = joint.keys().map(|(_, c)| *c).collect();
    cols.sort();
    cols.dedup();

    let counts: Vec<Vec<usize>> = rows
        .iter()
        .map(|r| {
            cols.iter()
                .map(|c| joint.get(&(*r, *c)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(CrossTab {
        row_field: row_field.to_string(),
        col_field: col_field.to_string(),
        row_labels: rows.iter().map(|v| schema.display_label(row_field, v)).collect(),
        col_labels: cols.iter().map(|v| schema.display_label(col_field, v)).collect(),
        rows: rows.into_iter().cloned().collect(),
        cols: cols.into_iter().cloned().collect(),
        counts,
    })
}
