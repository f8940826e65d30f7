use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};

use crate::models::{FlaggedTable, RawTable, DERIVED_COLUMNS, REQUIRED_COLUMNS};
use crate::reporting::Dashboard;

/// Reads a headed CSV into string cells. Ragged rows are accepted; cells are
/// decoded lossily so a stray Latin-1 byte does not fail the whole file.
pub fn read_applications_csv(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open CSV {:?}", path))?;
    let headers = reader
        .byte_headers()
        .context("failed to read CSV header")?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV record {}", idx + 1))?;
        rows.push(
            record
                .iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .collect(),
        );
    }
    Ok(RawTable { headers, rows })
}

pub fn write_cleaned_csv(path: &Path, table: &FlaggedTable) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create cleaned CSV {:?}", path))?;

    let header: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .chain(table.extra_columns.iter().map(String::as_str))
        .chain(DERIVED_COLUMNS.iter().copied())
        .collect();
    writer
        .write_record(&header)
        .context("failed to write cleaned CSV header")?;

    for flagged in &table.records {
        let row: Vec<String> = flagged
            .record
            .base_cells()
            .into_iter()
            .map(Option::unwrap_or_default)
            .chain(flagged.record.extras.iter().cloned())
            .chain(flagged.derived_cells())
            .collect();
        writer
            .write_record(&row)
            .context("failed to write cleaned CSV row")?;
    }
    writer.flush().context("failed to flush cleaned CSV writer")
}

pub fn write_summary_md(path: &Path, summary: &str) -> Result<()> {
    fs::write(path, summary).with_context(|| format!("failed to write summary file {:?}", path))
}

pub fn write_dashboard_json(path: &Path, dashboard: &Dashboard) -> Result<()> {
    let data = serde_json::to_vec_pretty(dashboard).context("failed to serialize dashboard")?;
    fs::write(path, data).with_context(|| format!("failed to write dashboard file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicationRecord, FlaggedRecord, RecordFlags, Status};

    #[test]
    fn reads_ragged_rows_and_strips_bom() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("apps.csv");
        fs::write(&path, "\u{feff}company, status\nAcme,applied,extra\nGlobex\n").expect("write");

        let raw = read_applications_csv(&path).expect("read");
        assert_eq!(raw.headers, vec!["company", "status"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0], vec!["Acme", "applied", "extra"]);
        assert_eq!(raw.rows[1], vec!["Globex"]);
    }

    #[test]
    fn cleaned_csv_puts_extras_between_base_and_derived() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cleaned.csv");
        let table = FlaggedTable {
            extra_columns: vec!["salary".into()],
            records: vec![FlaggedRecord {
                record: ApplicationRecord {
                    company: Some("Acme, Inc".into()),
                    status: Some(Status::Applied),
                    extras: vec!["120k".into()],
                    ..Default::default()
                },
                days_since_applied: Some(12),
                days_since_contact: None,
                flags: RecordFlags {
                    followup_due: true,
                    ..Default::default()
                },
            }],
        };
        write_cleaned_csv(&path, &table).expect("write");

        let raw = read_applications_csv(&path).expect("read back");
        assert_eq!(raw.headers.len(), 18);
        assert_eq!(raw.headers[10], "salary");
        assert_eq!(raw.headers[11], "days_since_applied");
        assert_eq!(raw.headers[17], "flag_stale");
        let row = &raw.rows[0];
        assert_eq!(row[0], "Acme, Inc");
        assert_eq!(row[1], "");
        assert_eq!(row[4], "Applied");
        assert_eq!(row[10], "120k");
        assert_eq!(row[11], "12");
        assert_eq!(row[12], "");
        assert_eq!(row[16], "true");
        assert_eq!(row[17], "false");
    }

    #[test]
    fn writing_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("summary.md");
        assert!(write_summary_md(&path, "# x").is_err());
    }
}
