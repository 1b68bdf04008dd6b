use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::{ColumnKind, Dataset, FieldValue, Gender, Schema};
use crate::error::{Result, SurveyError};

/// User-facing value meaning "no constraint on this field".
pub const UNCONSTRAINED: &str = "All";

// ---------------------------------------------------------------------------
// Filter predicate: which exact value is required per field
// ---------------------------------------------------------------------------

/// Per-field exact-match constraints.
/// A field that is absent, or mapped to `None`, is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    constraints: BTreeMap<String, Option<FieldValue>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub fn set(&mut self, field: &str, value: Option<FieldValue>) {
        self.constraints.insert(field.to_string(), value);
    }

    pub fn clear(&mut self, field: &str) {
        self.constraints.remove(field);
    }

    /// Only the entries that actually restrict something.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.constraints
            .iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (field.as_str(), v)))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active().next().is_none()
    }

    /// Conjunction of two criteria. Entries of `other` win on shared fields.
    pub fn merge(&self, other: &FilterCriteria) -> FilterCriteria {
        let mut constraints = self.constraints.clone();
        for (field, value) in &other.constraints {
            constraints.insert(field.clone(), value.clone());
        }
        FilterCriteria { constraints }
    }

    /// Convert raw user input for `field` into a criterion value.
    ///
    /// [`UNCONSTRAINED`] and blank input give `None`. The gender field takes
    /// its label (`woman`/`man`) or code; anything else is matched as text.
    pub fn parse_value(schema: &Schema, field: &str, raw: &str) -> Result<Option<FieldValue>> {
        let pos = schema.require(field)?;
        let raw = raw.trim();
        if raw.is_empty() || raw == UNCONSTRAINED {
            return Ok(None);
        }
        let value = match schema.columns()[pos].kind {
            ColumnKind::Indicator => return Err(SurveyError::IndicatorCriterion(field.to_string())),
            ColumnKind::GenderCode => match Gender::parse(raw) {
                Some(g) => FieldValue::Number(g.code()),
                None => FieldValue::Text(raw.to_string()),
            },
            ColumnKind::Categorical => FieldValue::Text(raw.to_string()),
        };
        Ok(Some(value))
    }

    /// Resolve active constraints to schema positions, rejecting unknown and
    /// indicator fields.
    fn resolve<'a>(&'a self, schema: &Schema) -> Result<Vec<(usize, &'a FieldValue)>> {
        self.active()
            .map(|(field, value)| {
                let pos = schema.require(field)?;
                if schema.columns()[pos].kind == ColumnKind::Indicator {
                    return Err(SurveyError::IndicatorCriterion(field.to_string()));
                }
                Ok((pos, value))
            })
            .collect()
    }
}

/// Return indices of responses that pass all active constraints.
///
/// A response passes when, for every constrained field, its value equals the
/// criterion exactly. A missing value never equals a present criterion.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Result<Vec<usize>> {
    let resolved = criteria.resolve(dataset.schema())?;
    Ok(dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| resolved.iter().all(|(pos, want)| rec.get(*pos) == *want))
        .map(|(i, _)| i)
        .collect())
}

/// The subset of `dataset` matching `criteria`, in original order.
/// An empty result is not an error.
pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Result<Dataset> {
    let indices = filtered_indices(dataset, criteria)?;
    log::debug!(
        "filter kept {} of {} responses ({} active constraints)",
        indices.len(),
        dataset.len(),
        criteria.active().count()
    );
    Ok(dataset.subset(&indices))
}

/// Sorted distinct non-missing values of `field`, for populating selectors.
pub fn filter_options(dataset: &Dataset, field: &str) -> Result<Vec<FieldValue>> {
    let values: BTreeSet<&FieldValue> = dataset.column(field)?.filter(|v| !v.is_missing()).collect();
    Ok(values.into_iter().cloned().collect())
}
