use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::{Result, SurveyError};

/// Pairwise Pearson correlations between indicator columns.
///
/// `values[i][j]` is `None` when the coefficient is undefined: fewer than two
/// responses, or either column constant over the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    /// Look up a cell by field names.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.fields.iter().position(|f| f == a)?;
        let j = self.fields.iter().position(|f| f == b)?;
        self.get(i, j)
    }
}

/// Correlate every member column of `groups` against every other.
///
/// Columns appear in the order the groups are given, members in schema
/// order; a group listed twice contributes once.
pub fn correlate<S: AsRef<str>>(dataset: &Dataset, groups: &[S]) -> Result<CorrelationMatrix> {
    let registry = dataset.schema().groups();

    let mut fields = Vec::new();
    let mut labels = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for name in groups {
        let name = name.as_ref();
        let group = registry
            .get(name)
            .ok_or_else(|| SurveyError::UnknownGroup(name.to_string()))?;
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        for field in &group.members {
            fields.push(field.clone());
            labels.push(group.label_for(field));
        }
    }

    let series: Vec<Vec<f64>> = fields
        .iter()
        .map(|f| dataset.indicator_series(f))
        .collect::<Result<_>>()?;
    let stats: Vec<Option<Moments>> = series.iter().map(|s| Moments::of(s)).collect();

    let n = fields.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = match (&stats[i], &stats[j]) {
                (Some(_), Some(_)) if i == j => Some(1.0),
                (Some(a), Some(b)) => Some(pearson(&series[i], a, &series[j], b)),
                _ => None,
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    log::debug!("correlated {n} indicator columns over {} responses", dataset.len());
    Ok(CorrelationMatrix {
        fields,
        labels,
        values,
    })
}

/// Mean and (population) standard deviation of a non-degenerate series.
struct Moments {
    mean: f64,
    std: f64,
}

impl Moments {
    /// `None` for fewer than two points or zero variance.
    fn of(xs: &[f64]) -> Option<Self> {
        if xs.len() < 2 {
            return None;
        }
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        if var <= f64::EPSILON {
            return None;
        }
        Some(Moments {
            mean,
            std: var.sqrt(),
        })
    }
}

fn pearson(xs: &[f64], mx: &Moments, ys: &[f64], my: &Moments) -> f64 {
    let n = xs.len() as f64;
    let cov = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx.mean) * (y - my.mean))
        .sum::<f64>()
        / n;
    (cov / (mx.std * my.std)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterCriteria, apply};
    use crate::data::fixtures::{SAMPLE, dataset_from_csv};
    use crate::data::groups::{HOBBY, LEARNING_PREF, MOTIVATION};

    const ALL: [&str; 3] = [HOBBY, MOTIVATION, LEARNING_PREF];

    #[test]
    fn spans_union_of_groups() {
        let ds = dataset_from_csv(SAMPLE);
        let m = correlate(&ds, &ALL).unwrap();
        assert_eq!(m.len(), 7);
        assert_eq!(m.fields[0], "hobby_art");
        assert_eq!(m.labels[6], "Online Courses");

        let only = correlate(&ds, &[MOTIVATION, MOTIVATION]).unwrap();
        assert_eq!(only.len(), 2);
    }

    #[test]
    fn symmetric_with_unit_diagonal() {
        let ds = dataset_from_csv(SAMPLE);
        let m = correlate(&ds, &ALL).unwrap();
        for i in 0..m.len() {
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.between("hobby_art", "hobby_art"), Some(1.0));
        assert_eq!(m.between("motivation_career", "motivation_career"), Some(1.0));
    }

    #[test]
    fn constant_columns_are_undefined() {
        let ds = dataset_from_csv(SAMPLE);
        let m = correlate(&ds, &ALL).unwrap();
        // hobby_sport is always 0, learning_pref_online_courses always 1.
        assert_eq!(m.between("hobby_sport", "hobby_sport"), None);
        assert_eq!(m.between("hobby_sport", "hobby_art"), None);
        assert_eq!(
            m.between("learning_pref_online_courses", "hobby_reading"),
            None
        );
    }

    #[test]
    fn perfect_relationships() {
        let text = "hobby_a;hobby_b;hobby_c\n1;1;0\n0;0;1\n1;1;0\n0;0;1\n";
        let ds = dataset_from_csv(text);
        let m = correlate(&ds, &[HOBBY]).unwrap();
        assert!((m.between("hobby_a", "hobby_b").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.between("hobby_a", "hobby_c").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_coefficient() {
        let ds = dataset_from_csv(SAMPLE);
        let m = correlate(&ds, &[HOBBY]).unwrap();
        // art = [1,0,1,0,1], reading = [1,1,0,0,1]: cov = 0.04, var = 0.24 each.
        let r = m.between("hobby_art", "hobby_reading").unwrap();
        assert!((r - 1.0 / 6.0).abs() < 1e-12, "{r}");
    }

    #[test]
    fn degenerate_datasets_do_not_fail() {
        let full = dataset_from_csv(SAMPLE);

        let empty = apply(&full, &FilterCriteria::new().with("age", "65+")).unwrap();
        let m = correlate(&empty, &ALL).unwrap();
        assert_eq!(m.len(), 7);
        assert!(m.values.iter().flatten().all(Option::is_none));

        let single = apply(&full, &FilterCriteria::new().with("age", "18-24")).unwrap();
        assert_eq!(single.len(), 1);
        let m = correlate(&single, &ALL).unwrap();
        assert!(m.values.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn no_groups_gives_empty_matrix() {
        let ds = dataset_from_csv(SAMPLE);
        let m = correlate::<&str>(&ds, &[]).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn unknown_group_is_an_error() {
        let ds = dataset_from_csv(SAMPLE);
        assert_eq!(
            correlate(&ds, &["pets"]),
            Err(SurveyError::UnknownGroup("pets".into()))
        );
    }
}
