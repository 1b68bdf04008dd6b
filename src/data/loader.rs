use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use super::groups::{GroupRule, default_rules};
use super::model::{ColumnKind, Dataset, FieldValue, Gender, ResponseRecord, Schema};

// ---------------------------------------------------------------------------
// Loader configuration
// ---------------------------------------------------------------------------

/// How the survey file is read and which indicator groups are discovered.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Field separator (default `;`).
    pub delimiter: u8,
    /// Prefix rules for indicator groups, in priority order.
    pub group_rules: Vec<GroupRule>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            group_rules: default_rules(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a survey file from disk.
pub fn load_file(path: &Path, options: &LoaderOptions) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening survey file {}", path.display()))?;
    let dataset = load_reader(file, options)
        .with_context(|| format!("reading survey file {}", path.display()))?;
    log::info!(
        "Loaded {} responses with {} columns ({} indicator columns) from {}",
        dataset.len(),
        dataset.schema().len(),
        dataset.schema().groups().indicator_count(),
        path.display()
    );
    Ok(dataset)
}

/// Parse survey text already held in memory.
pub fn parse_str(text: &str, options: &LoaderOptions) -> Result<Dataset> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    load_reader(text.as_bytes(), options)
}

/// Layout: header row naming every column, `delimiter`-separated cells.
/// Empty and whitespace-only cells are normalised to [`FieldValue::Missing`].
pub fn load_reader<R: Read>(reader: R, options: &LoaderOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        bail!("header row is empty");
    }
    if let Some(dup) = duplicate(&headers) {
        bail!("column '{dup}' appears more than once in the header");
    }

    let schema = Arc::new(Schema::new(headers, &options.group_rules));

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let line = row_no + 2;
        let record = result.with_context(|| format!("line {line}"))?;

        let values = schema
            .columns()
            .iter()
            .zip(record.iter())
            .map(|(col, cell)| {
                parse_cell(col.kind, cell)
                    .with_context(|| format!("line {line}, column '{}'", col.name))
            })
            .collect::<Result<Vec<_>>>()?;

        records.push(ResponseRecord::new(values));
    }

    Ok(Dataset::new(schema, records))
}

// ---------------------------------------------------------------------------
// Cell normalisation
// ---------------------------------------------------------------------------

fn parse_cell(kind: ColumnKind, raw: &str) -> Result<FieldValue> {
    let blank = raw.trim().is_empty();
    match kind {
        ColumnKind::Categorical if blank => Ok(FieldValue::Missing),
        ColumnKind::Categorical => Ok(FieldValue::Text(raw.to_string())),
        ColumnKind::GenderCode if blank => Ok(FieldValue::Missing),
        ColumnKind::GenderCode => Ok(parse_gender(raw)),
        ColumnKind::Indicator => parse_flag(raw),
    }
}

fn parse_gender(raw: &str) -> FieldValue {
    match raw.trim().parse::<f64>().ok().and_then(Gender::from_code) {
        Some(g) => FieldValue::Number(g.code()),
        None => {
            log::warn!("gender code '{raw}' is outside the fixed mapping, treating as missing");
            FieldValue::Missing
        }
    }
}

fn parse_flag(raw: &str) -> Result<FieldValue> {
    match raw.trim() {
        "1" | "1.0" | "true" | "True" => Ok(FieldValue::Flag(true)),
        "0" | "0.0" | "false" | "False" => Ok(FieldValue::Flag(false)),
        "" => bail!("indicator value is missing, expected 0 or 1"),
        other => bail!("'{other}' is not a valid indicator value, expected 0 or 1"),
    }
}

fn duplicate(headers: &[String]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    headers
        .iter()
        .find(|h| !seen.insert(h.as_str()))
        .map(|h| h.as_str())
}
