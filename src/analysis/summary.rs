use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Dataset, FieldValue, GENDER, Gender};
use crate::error::Result;

/// Occurrences of one distinct value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: FieldValue,
    pub label: String,
    pub count: usize,
}

/// Count, mode and frequency table of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub field: String,
    /// Number of non-missing values.
    pub count: usize,
    /// Most frequent value; ties go to the smallest label.
    pub mode: Option<FieldValue>,
    pub mode_label: Option<String>,
    /// One entry per distinct non-missing value; [`summarize`] lists them in
    /// value order.
    pub value_counts: Vec<ValueCount>,
}

impl FieldSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn count_of(&self, value: &FieldValue) -> usize {
        self.value_counts
            .iter()
            .find(|vc| &vc.value == value)
            .map_or(0, |vc| vc.count)
    }

    pub fn value_count_map(&self) -> BTreeMap<FieldValue, usize> {
        self.value_counts
            .iter()
            .map(|vc| (vc.value.clone(), vc.count))
            .collect()
    }

    /// Frequency table sorted by count descending, then label.
    pub fn ranked(&self) -> Vec<ValueCount> {
        let mut out = self.value_counts.clone();
        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        out
    }

    /// The `n` most frequent values.
    pub fn top(&self, n: usize) -> Vec<ValueCount> {
        let mut out = self.ranked();
        out.truncate(n);
        out
    }
}

pub fn summarize(dataset: &Dataset, field: &str) -> Result<FieldSummary> {
    let schema = dataset.schema();
    let mut counts: BTreeMap<&FieldValue, usize> = BTreeMap::new();
    for value in dataset.column(field)?.filter(|v| !v.is_missing()) {
        *counts.entry(value).or_default() += 1;
    }

    let value_counts: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.clone(),
            label: schema.display_label(field, value),
            count,
        })
        .collect();

    let mode = value_counts.iter().fold(None::<&ValueCount>, |best, vc| match best {
        Some(b) if b.count > vc.count || (b.count == vc.count && b.label <= vc.label) => Some(b),
        _ => Some(vc),
    });

    Ok(FieldSummary {
        field: field.to_string(),
        count: value_counts.iter().map(|vc| vc.count).sum(),
        mode: mode.map(|vc| vc.value.clone()),
        mode_label: mode.map(|vc| vc.label.clone()),
        value_counts,
    })
}

/// Percentage of non-missing `field` values equal to `target`; `0.0` when
/// the field has no values at all.
pub fn share_percentage(dataset: &Dataset, field: &str, target: &FieldValue) -> Result<f64> {
    let mut present = 0usize;
    let mut hits = 0usize;
    for value in dataset.column(field)?.filter(|v| !v.is_missing()) {
        present += 1;
        if value == target {
            hits += 1;
        }
    }
    if present == 0 {
        return Ok(0.0);
    }
    Ok(100.0 * hits as f64 / present as f64)
}

/// Respondents per gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCount {
    pub gender: Gender,
    pub count: usize,
}

/// Counts of the fixed gender codes, largest first. Missing codes are skipped.
pub fn gender_distribution(dataset: &Dataset) -> Result<Vec<GenderCount>> {
    let mut counts: BTreeMap<Gender, usize> = BTreeMap::new();
    for g in dataset.column(GENDER)?.filter_map(Gender::from_value) {
        *counts.entry(g).or_default() += 1;
    }
    let mut out: Vec<GenderCount> = counts
        .into_iter()
        .map(|(gender, count)| GenderCount { gender, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.gender.label().cmp(b.gender.label())));
    Ok(out)
}
