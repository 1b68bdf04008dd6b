use serde::Serialize;

use crate::analysis::{
    CorrelationMatrix, CrossTab, FieldSummary, GenderCount, GroupCount, RankOrder, ValueCount,
    aggregate, correlate, cross_tab, gender_distribution, share_percentage, summarize,
};
use crate::data::groups::{HOBBY, LEARNING_PREF, MOTIVATION};
use crate::data::model::{
    AGE, ColumnKind, Dataset, EDU_LEVEL, FieldValue, GENDER, INDUSTRY, SWEET_OR_SALTY,
    YEARS_OF_EXPERIENCE,
};
use crate::error::{Result, SurveyError};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for one dashboard computation.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Field shown in the descriptive statistics section. The section is
    /// left out when the file has no such column.
    pub describe_field: Option<String>,
    /// How many industries the professional section lists.
    pub top_industries: usize,
    /// Value of `sweet_or_salty` whose share is reported.
    pub share_target: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            describe_field: Some(AGE.to_string()),
            top_industries: 10,
            share_target: "sweet".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub respondents: usize,
    pub total_respondents: usize,
    pub modal_age: Option<String>,
    pub modal_edu_level: Option<String>,
    /// Percentage preferring [`DashboardOptions::share_target`].
    pub sweet_share: f64,
}

/// Everything shown for one filter state. Sections whose field is absent
/// from the file are `None`; sections with no data are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub overview: Overview,
    pub age: Option<FieldSummary>,
    pub gender: Option<Vec<GenderCount>>,
    pub edu_level: Option<FieldSummary>,
    pub sweet_or_salty: Option<FieldSummary>,
    pub hobbies: Vec<GroupCount>,
    pub learning_preferences: Vec<GroupCount>,
    pub motivations: Vec<GroupCount>,
    pub age_vs_experience: Option<CrossTab>,
    pub top_industries: Option<Vec<ValueCount>>,
    pub correlation: CorrelationMatrix,
    pub describe: Option<FieldSummary>,
}

impl DashboardReport {
    /// Recompute every section from the filtered snapshot.
    pub fn compute(
        filtered: &Dataset,
        total_respondents: usize,
        options: &DashboardOptions,
    ) -> Result<Self> {
        let schema = filtered.schema();
        let has = |field: &str| schema.position(field).is_some();
        let summary_of = |field: &str| -> Result<Option<FieldSummary>> {
            if has(field) {
                summarize(filtered, field).map(Some)
            } else {
                Ok(None)
            }
        };
        let group = |name: &str, order: RankOrder| -> Result<Vec<GroupCount>> {
            if schema.groups().get(name).is_some() {
                aggregate(filtered, name, order)
            } else {
                Ok(Vec::new())
            }
        };

        let age = summary_of(AGE)?;
        let edu_level = summary_of(EDU_LEVEL)?.map(by_count);
        let sweet_share = if has(SWEET_OR_SALTY) {
            let target = FieldValue::Text(options.share_target.clone());
            share_percentage(filtered, SWEET_OR_SALTY, &target)?
        } else {
            0.0
        };

        let overview = Overview {
            respondents: filtered.len(),
            total_respondents,
            modal_age: age.as_ref().and_then(|s| s.mode_label.clone()),
            modal_edu_level: edu_level.as_ref().and_then(|s| s.mode_label.clone()),
            sweet_share,
        };

        let gender = if schema.kind(GENDER) == Some(ColumnKind::GenderCode) {
            Some(gender_distribution(filtered)?)
        } else {
            None
        };

        let age_vs_experience = if has(AGE) && has(YEARS_OF_EXPERIENCE) {
            Some(cross_tab(filtered, AGE, YEARS_OF_EXPERIENCE)?)
        } else {
            None
        };

        let top_industries = summary_of(INDUSTRY)?.map(|s| s.top(options.top_industries));

        let group_names: Vec<&str> = schema.groups().groups().iter().map(|g| g.name.as_str()).collect();
        let correlation = correlate(filtered, &group_names)?;

        let describe = match options.describe_field.as_deref() {
            Some(field) if schema.kind(field) == Some(ColumnKind::Indicator) => {
                return Err(SurveyError::NotCategorical(field.to_string()));
            }
            Some(field) => summary_of(field)?,
            None => None,
        };

        log::debug!("dashboard computed over {} responses", filtered.len());

        Ok(DashboardReport {
            overview,
            age,
            gender,
            edu_level,
            sweet_or_salty: summary_of(SWEET_OR_SALTY)?.map(by_count),
            hobbies: group(HOBBY, RankOrder::Ascending)?,
            learning_preferences: group(LEARNING_PREF, RankOrder::Descending)?,
            motivations: group(MOTIVATION, RankOrder::Schema)?,
            age_vs_experience,
            top_industries,
            correlation,
            describe,
        })
    }

    /// Whether the filters left nothing to show.
    pub fn is_empty(&self) -> bool {
        self.overview.respondents == 0
    }
}

/// Share sections list the largest slice first; the age section keeps
/// bracket order.
fn by_count(mut summary: FieldSummary) -> FieldSummary {
    summary.value_counts = summary.ranked();
    summary
}
