use std::sync::Arc;

use crate::dashboard::{DashboardOptions, DashboardReport};
use crate::data::filter::{FilterCriteria, UNCONSTRAINED, filter_options, filtered_indices};
use crate::data::model::Dataset;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Explorer state
// ---------------------------------------------------------------------------

/// Session state, independent of any front end.
///
/// The visible indices are a cache of `criteria` applied to `dataset` and are
/// only rewritten through [`ExplorerState::refilter`] and friends.
pub struct ExplorerState {
    /// Base snapshot shared with the repository.
    dataset: Arc<Dataset>,

    /// Current per-field selections.
    criteria: FilterCriteria,

    /// Indices of responses passing the current criteria (cached).
    visible_indices: Vec<usize>,
}

impl ExplorerState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let visible_indices = (0..dataset.len()).collect();
        Self {
            dataset,
            criteria: FilterCriteria::default(),
            visible_indices,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Indices into [`ExplorerState::dataset`] of the visible responses.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    /// Swap in a freshly (re)loaded dataset, keeping the selections.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) -> Result<()> {
        self.dataset = dataset;
        self.refilter()
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) -> Result<()> {
        self.visible_indices = filtered_indices(&self.dataset, &self.criteria)?;
        Ok(())
    }

    /// Set one selector from raw input; [`UNCONSTRAINED`] clears it.
    /// Nothing changes when the input is rejected.
    pub fn set_filter(&mut self, field: &str, raw: &str) -> Result<()> {
        let value = FilterCriteria::parse_value(self.dataset.schema(), field, raw)?;
        self.criteria.set(field, value);
        self.refilter()
    }

    /// Drop the constraint on a single field.
    pub fn clear_filter(&mut self, field: &str) -> Result<()> {
        self.criteria.clear(field);
        self.refilter()
    }

    /// Drop every constraint.
    pub fn clear_all(&mut self) {
        self.criteria = FilterCriteria::default();
        self.visible_indices = (0..self.dataset.len()).collect();
    }

    /// The responses currently visible, as their own dataset.
    pub fn filtered(&self) -> Dataset {
        self.dataset.subset(&self.visible_indices)
    }

    /// Selector entries for `field`: the sentinel followed by every observed
    /// value, labelled for display.
    pub fn options_for(&self, field: &str) -> Result<Vec<String>> {
        let schema = self.dataset.schema();
        let mut out = vec![UNCONSTRAINED.to_string()];
        out.extend(
            filter_options(&self.dataset, field)?
                .iter()
                .map(|v| schema.display_label(field, v)),
        );
        Ok(out)
    }

    /// Full recomputation of every dashboard section for the current state.
    pub fn report(&self, options: &DashboardOptions) -> Result<DashboardReport> {
        DashboardReport::compute(&self.filtered(), self.dataset.len(), options)
    }
}
