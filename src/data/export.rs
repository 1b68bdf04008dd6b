use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Dataset;

/// Write `dataset` in the input layout: `;`-separated, schema column order,
/// missing values as empty cells.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    write_csv_with(dataset, writer, b';')
}

pub fn write_csv_with<W: Write>(dataset: &Dataset, writer: W, delimiter: u8) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(dataset.schema().column_names())
        .context("writing header row")?;
    for (row_no, record) in dataset.records().iter().enumerate() {
        out.write_record(record.values().iter().map(|v| v.to_cell()))
            .with_context(|| format!("writing row {row_no}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Render the dataset to a string, e.g. for a download payload.
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    String::from_utf8(buf).context("exported CSV is not valid UTF-8")
}

/// Export to a file on disk.
pub fn export_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, std::io::BufWriter::new(file))?;
    log::info!("Exported {} responses to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterCriteria, apply};
    use crate::data::fixtures::{SAMPLE, dataset_from_csv};

    #[test]
    fn header_keeps_schema_order() {
        let ds = dataset_from_csv(SAMPLE);
        let text = to_csv_string(&ds).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, SAMPLE.lines().next().unwrap());
    }

    #[test]
    fn filtered_subset_round_trips() {
        let ds = dataset_from_csv(SAMPLE);
        let subset = apply(&ds, &FilterCriteria::new().with("fav_place", "By the sea")).unwrap();
        let text = to_csv_string(&subset).unwrap();
        assert_eq!(dataset_from_csv(&text), subset);
    }

    #[test]
    fn missing_cells_are_written_empty() {
        let ds = dataset_from_csv(SAMPLE);
        let text = to_csv_string(&ds).unwrap();
        let second = text.lines().nth(2).unwrap();
        assert!(second.starts_with("25-34;Secondary;1;;salty"), "{second}");
    }

    #[test]
    fn delimiter_inside_values_is_quoted() {
        let ds = dataset_from_csv("age;fav_place\n18-24;\"sea; sand\"\n");
        let text = to_csv_string(&ds).unwrap();
        assert_eq!(dataset_from_csv(&text), ds);
    }

    #[test]
    fn empty_subset_exports_header_only() {
        let ds = dataset_from_csv(SAMPLE);
        let empty = apply(&ds, &FilterCriteria::new().with("age", "65+")).unwrap();
        let text = to_csv_string(&empty).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
