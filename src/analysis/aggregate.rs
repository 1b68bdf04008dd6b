use serde::{Deserialize, Serialize};

use crate::data::model::Dataset;
use crate::error::{Result, SurveyError};

/// How aggregated group counts are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Smallest count first; ties keep schema order.
    Ascending,
    /// Largest count first; ties keep schema order.
    Descending,
    /// Schema order, counts untouched.
    Schema,
}

/// Number of respondents flagging one indicator column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub field: String,
    pub label: String,
    pub count: usize,
}

/// Sum every indicator column of `group` over the dataset.
///
/// Columns with a total of zero are dropped, so an empty `Vec` means the
/// group has no members or nobody flagged any of them.
pub fn aggregate(dataset: &Dataset, group: &str, order: RankOrder) -> Result<Vec<GroupCount>> {
    let schema = dataset.schema();
    let group_def = schema
        .groups()
        .get(group)
        .ok_or_else(|| SurveyError::UnknownGroup(group.to_string()))?;

    let mut counts = Vec::with_capacity(group_def.members.len());
    for field in &group_def.members {
        let pos = schema.require(field)?;
        let count = dataset
            .records()
            .iter()
            .filter(|r| r.get(pos).as_f64() == Some(1.0))
            .count();
        if count > 0 {
            counts.push(GroupCount {
                field: field.clone(),
                label: group_def.label_for(field),
                count,
            });
        }
    }

    match order {
        RankOrder::Ascending => counts.sort_by_key(|c| c.count),
        RankOrder::Descending => counts.sort_by(|a, b| b.count.cmp(&a.count)),
        RankOrder::Schema => {}
    }
    Ok(counts)
}
