use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::groups::{ColumnGroupRegistry, GroupRule};
use crate::error::{Result, SurveyError};

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a response
// ---------------------------------------------------------------------------

/// A normalised survey cell.
/// Using `BTreeMap` / `BTreeSet` downstream so `FieldValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Indicator cell (0/1).
    Flag(bool),
    /// Empty or whitespace-only in the source file.
    Missing,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeMap --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Missing => 0,
                Flag(_) => 1,
                Number(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Flag(a), Flag(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Text(s) => s.hash(state),
            FieldValue::Number(f) => f.to_bits().hash(state),
            FieldValue::Flag(b) => b.hash(state),
            FieldValue::Missing => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Flag(b) => write!(f, "{}", u8::from(*b)),
            FieldValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(v) => serializer.serialize_f64(*v),
            FieldValue::Flag(b) => serializer.serialize_u8(u8::from(*b)),
            FieldValue::Missing => serializer.serialize_none(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Numeric view used by the correlation analyzer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text written to an exported cell; missing values become empty.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gender – fixed binary code
// ---------------------------------------------------------------------------

/// Gender is stored as a numeric code with a fixed mapping. Any other code
/// is treated as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Woman,
    Man,
}

impl Gender {
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 0.0 {
            Some(Gender::Woman)
        } else if code == 1.0 {
            Some(Gender::Man)
        } else {
            None
        }
    }

    pub fn code(self) -> f64 {
        match self {
            Gender::Woman => 0.0,
            Gender::Man => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Woman => "woman",
            Gender::Man => "man",
        }
    }

    /// Accepts the label (any case) or the numeric code.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("woman") {
            return Some(Gender::Woman);
        }
        if s.eq_ignore_ascii_case("man") {
            return Some(Gender::Man);
        }
        s.parse::<f64>().ok().and_then(Gender::from_code)
    }

    pub fn from_value(value: &FieldValue) -> Option<Self> {
        value.as_f64().and_then(Gender::from_code)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Schema – ordered columns plus the indicator group registry
// ---------------------------------------------------------------------------

pub const AGE: &str = "age";
pub const EDU_LEVEL: &str = "edu_level";
pub const GENDER: &str = "gender";
pub const INDUSTRY: &str = "industry";
pub const SWEET_OR_SALTY: &str = "sweet_or_salty";
pub const YEARS_OF_EXPERIENCE: &str = "years_of_experience";
pub const FAV_ANIMALS: &str = "fav_animals";
pub const FAV_PLACE: &str = "fav_place";

/// The fixed, non-indicator fields of the survey.
pub const FIXED_FIELDS: [&str; 8] = [
    AGE,
    EDU_LEVEL,
    GENDER,
    INDUSTRY,
    SWEET_OR_SALTY,
    YEARS_OF_EXPERIENCE,
    FAV_ANIMALS,
    FAV_PLACE,
];

/// Columns shown in the detailed-responses table unless others are chosen.
pub const DETAIL_FIELDS: [&str; 6] = [
    AGE,
    EDU_LEVEL,
    FAV_ANIMALS,
    INDUSTRY,
    SWEET_OR_SALTY,
    YEARS_OF_EXPERIENCE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Categorical,
    GenderCode,
    Indicator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
}

/// Column layout of a dataset, fixed at load time and shared between a base
/// dataset and every subset filtered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    index: HashMap<String, usize>,
    groups: ColumnGroupRegistry,
}

impl Schema {
    /// Classify header columns and discover indicator groups.
    pub fn new(column_names: Vec<String>, rules: &[GroupRule]) -> Self {
        let groups = ColumnGroupRegistry::discover(&column_names, rules);
        let columns: Vec<ColumnDef> = column_names
            .into_iter()
            .map(|name| {
                let kind = if groups.is_indicator(&name) {
                    ColumnKind::Indicator
                } else if name == GENDER {
                    ColumnKind::GenderCode
                } else {
                    ColumnKind::Categorical
                };
                ColumnDef { name, kind }
            })
            .collect();
        Self::from_parts(columns, groups)
    }

    fn from_parts(columns: Vec<ColumnDef>, groups: ColumnGroupRegistry) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Schema {
            columns,
            index,
            groups,
        }
    }

    /// Schema of the columns at `positions`, in that order. Column kinds are
    /// kept and groups shrink to the surviving members.
    fn restricted_to(&self, positions: &[usize]) -> Self {
        let columns: Vec<ColumnDef> = positions.iter().map(|&p| self.columns[p].clone()).collect();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let groups = self.groups.restricted_to(&names);
        Self::from_parts(columns, groups)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.index.get(field).copied()
    }

    pub fn kind(&self, field: &str) -> Option<ColumnKind> {
        self.position(field).map(|i| self.columns[i].kind)
    }

    /// Position of `field`, or `UnknownField`.
    pub fn require(&self, field: &str) -> Result<usize> {
        self.position(field)
            .ok_or_else(|| SurveyError::UnknownField(field.to_string()))
    }

    pub fn groups(&self) -> &ColumnGroupRegistry {
        &self.groups
    }

    /// Text shown for `value` in `field`: gender codes become their label.
    pub fn display_label(&self, field: &str, value: &FieldValue) -> String {
        match (self.kind(field), Gender::from_value(value)) {
            (Some(ColumnKind::GenderCode), Some(g)) => g.label().to_string(),
            _ => value.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseRecord – one row of the survey
// ---------------------------------------------------------------------------

/// One survey response; values are aligned with the schema columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    values: Vec<FieldValue>,
}

impl ResponseRecord {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, position: usize) -> &FieldValue {
        self.values.get(position).unwrap_or(&FieldValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete, immutable snapshot
// ---------------------------------------------------------------------------

/// Ordered responses plus their schema. Never mutated after construction;
/// filtering produces a new `Dataset` sharing the same schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Vec<ResponseRecord>,
}

impl Dataset {
    pub fn new(schema: Arc<Schema>, records: Vec<ResponseRecord>) -> Self {
        debug_assert!(records.iter().all(|r| r.values.len() == schema.len()));
        Dataset { schema, records }
    }

    /// Number of responses.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    /// Values of one field in record order.
    pub fn column(&self, field: &str) -> Result<impl Iterator<Item = &FieldValue> + '_> {
        let pos = self.schema.require(field)?;
        Ok(self.records.iter().map(move |r| r.get(pos)))
    }

    /// 0/1 series of an indicator field.
    pub fn indicator_series(&self, field: &str) -> Result<Vec<f64>> {
        let pos = self.schema.require(field)?;
        if self.schema.columns[pos].kind != ColumnKind::Indicator {
            return Err(SurveyError::NotAnIndicator(field.to_string()));
        }
        Ok(self
            .records
            .iter()
            .map(|r| r.get(pos).as_f64().unwrap_or(0.0))
            .collect())
    }

    /// Dataset limited to `fields`, in the given order. A field listed twice
    /// is kept once.
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> Result<Dataset> {
        let mut positions: Vec<usize> = Vec::with_capacity(fields.len());
        for field in fields {
            let pos = self.schema.require(field.as_ref())?;
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }
        let schema = Arc::new(self.schema.restricted_to(&positions));
        let records = self
            .records
            .iter()
            .map(|r| ResponseRecord::new(positions.iter().map(|&p| r.get(p).clone()).collect()))
            .collect();
        Ok(Dataset { schema, records })
    }

    /// New dataset holding the records at `indices`, in the given order.
    pub(crate) fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            schema: Arc::clone(&self.schema),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::groups::default_rules;

    #[test]
    fn values_order_missing_first_then_natural_order() {
        let set: BTreeSet<FieldValue> = [
            FieldValue::from("b"),
            FieldValue::Missing,
            FieldValue::Number(1.0),
            FieldValue::from("a"),
            FieldValue::Number(0.0),
        ]
        .into_iter()
        .collect();
        let ordered: Vec<String> = set.iter().map(|v| v.to_string()).collect();
        assert_eq!(ordered, ["<missing>", "0", "1", "a", "b"]);
    }

    #[test]
    fn gender_mapping_is_fixed() {
        assert_eq!(Gender::from_code(0.0), Some(Gender::Woman));
        assert_eq!(Gender::from_code(1.0), Some(Gender::Man));
        assert_eq!(Gender::from_code(2.0), None);
        assert_eq!(Gender::parse("Woman"), Some(Gender::Woman));
        assert_eq!(Gender::parse("1.0"), Some(Gender::Man));
        assert_eq!(Gender::parse("other"), None);
    }

    #[test]
    fn schema_classifies_columns() {
        let schema = Schema::new(
            vec!["age".into(), "gender".into(), "hobby_art".into()],
            &default_rules(),
        );
        assert_eq!(schema.kind("age"), Some(ColumnKind::Categorical));
        assert_eq!(schema.kind("gender"), Some(ColumnKind::GenderCode));
        assert_eq!(schema.kind("hobby_art"), Some(ColumnKind::Indicator));
        assert_eq!(
            schema.require("nope"),
            Err(SurveyError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn indicator_series_rejects_categorical_fields() {
        let schema = Arc::new(Schema::new(
            vec!["age".into(), "hobby_art".into()],
            &default_rules(),
        ));
        let ds = Dataset::new(
            schema,
            vec![ResponseRecord::new(vec![
                FieldValue::from("18-24"),
                FieldValue::Flag(true),
            ])],
        );
        assert_eq!(ds.indicator_series("hobby_art").unwrap(), vec![1.0]);
        assert_eq!(
            ds.indicator_series("age"),
            Err(SurveyError::NotAnIndicator("age".into()))
        );
    }

    #[test]
    fn projection_reorders_and_keeps_kinds() {
        let schema = Arc::new(Schema::new(
            vec!["age".into(), "gender".into(), "hobby_art".into(), "hobby_sport".into()],
            &default_rules(),
        ));
        let ds = Dataset::new(
            schema,
            vec![ResponseRecord::new(vec![
                FieldValue::from("18-24"),
                FieldValue::Number(0.0),
                FieldValue::Flag(true),
                FieldValue::Flag(false),
            ])],
        );
        let narrow = ds.project(&["hobby_sport", "gender", "hobby_sport"]).unwrap();
        let names: Vec<&str> = narrow.schema().column_names().collect();
        assert_eq!(names, ["hobby_sport", "gender"]);
        assert_eq!(narrow.schema().kind("gender"), Some(ColumnKind::GenderCode));
        assert_eq!(narrow.schema().groups().members("hobby").unwrap(), &["hobby_sport".to_string()]);
        assert_eq!(
            narrow.records()[0].values(),
            &[FieldValue::Flag(false), FieldValue::Number(0.0)]
        );
        assert_eq!(
            ds.project(&["height"]).unwrap_err(),
            SurveyError::UnknownField("height".into())
        );
    }
}
