use serde::Serialize;

// ---------------------------------------------------------------------------
// Group rules – the single declared discovery rule for indicator columns
// ---------------------------------------------------------------------------

/// Declares one indicator group: every column whose name starts with
/// `prefix` belongs to the group called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRule {
    pub name: String,
    pub prefix: String,
    /// Human readable name shown in headings.
    pub display_name: String,
}

impl GroupRule {
    pub fn new(name: &str, prefix: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn matches(&self, column: &str) -> bool {
        column.len() > self.prefix.len() && column.starts_with(&self.prefix)
    }
}

pub const HOBBY: &str = "hobby";
pub const MOTIVATION: &str = "motivation";
pub const LEARNING_PREF: &str = "learning_pref";

/// The three indicator groups of the welcome survey.
pub fn default_rules() -> Vec<GroupRule> {
    vec![
        GroupRule::new(HOBBY, "hobby_", "hobby"),
        GroupRule::new(MOTIVATION, "motivation_", "motivation"),
        GroupRule::new(LEARNING_PREF, "learning_pref_", "learning preference"),
    ]
}

// ---------------------------------------------------------------------------
// ColumnGroupRegistry
// ---------------------------------------------------------------------------

/// A discovered group and its member columns in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    pub name: String,
    pub prefix: String,
    pub display_name: String,
    pub members: Vec<String>,
}

impl ColumnGroup {
    /// Display label of a member column: prefix stripped, `_` turned into
    /// spaces, title cased.
    pub fn label_for(&self, field: &str) -> String {
        let stem = field.strip_prefix(&self.prefix).unwrap_or(field);
        title_case(&stem.replace('_', " "))
    }
}

/// Group name → ordered member fields, built once when the schema is
/// created and immutable afterwards.
///
/// Every rule produces an entry, even when no column matched, so that a known
/// but empty group can be told apart from a name nobody declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnGroupRegistry {
    groups: Vec<ColumnGroup>,
}

impl ColumnGroupRegistry {
    /// Assign every column to the first rule it matches.
    pub fn discover<S: AsRef<str>>(columns: &[S], rules: &[GroupRule]) -> Self {
        let mut groups: Vec<ColumnGroup> = rules
            .iter()
            .map(|rule| ColumnGroup {
                name: rule.name.clone(),
                prefix: rule.prefix.clone(),
                display_name: rule.display_name.clone(),
                members: Vec::new(),
            })
            .collect();

        for column in columns {
            let column = column.as_ref();
            if let Some(idx) = rules.iter().position(|r| r.matches(column)) {
                groups[idx].members.push(column.to_string());
            }
        }

        Self { groups }
    }

    /// All groups in rule order.
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn get(&self, name: &str) -> Option<&ColumnGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(|g| g.members.as_slice())
    }

    /// The group a field belongs to, if it is an indicator column.
    pub fn group_of(&self, field: &str) -> Option<&ColumnGroup> {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| m == field))
    }

    pub fn is_indicator(&self, field: &str) -> bool {
        self.group_of(field).is_some()
    }

    /// Same groups, keeping only the members listed in `columns`.
    pub fn restricted_to<S: AsRef<str>>(&self, columns: &[S]) -> Self {
        let groups = self
            .groups
            .iter()
            .map(|g| ColumnGroup {
                members: g
                    .members
                    .iter()
                    .filter(|m| columns.iter().any(|c| c.as_ref() == m.as_str()))
                    .cloned()
                    .collect(),
                ..g.clone()
            })
            .collect();
        Self { groups }
    }

    /// Total number of indicator columns across all groups.
    pub fn indicator_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest (`"online_courses"` with `_` replaced gives `"Online Courses"`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
