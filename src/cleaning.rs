use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate};

use crate::{
    dates::parse_date_with_reference,
    models::{ApplicationRecord, ApplicationTable, RawTable, Status, REQUIRED_COLUMNS},
    value_utils::{clean_text, collapse_whitespace, is_missing_marker, title_case},
};

/// Required columns the input header does not provide. They are synthesized
/// as all-null during cleaning.
pub fn missing_columns(headers: &[String]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

/// Title-cases first, so spellings like `none` or `N/a` that only become
/// markers once cased are still nulled.
pub fn normalize_status(value: Option<&str>) -> Option<Status> {
    clean_text(value)
        .map(|text| title_case(&text))
        .filter(|text| !is_missing_marker(text))
        .map(|text| Status::from_title(&text))
}

fn normalize_name(value: Option<&str>) -> Option<String> {
    clean_text(value).map(|text| collapse_whitespace(&text))
}

fn normalize_date(value: Option<&str>, reference: NaiveDate) -> Option<NaiveDate> {
    clean_text(value).and_then(|text| parse_date_with_reference(&text, reference))
}

/// Builds one normalized record; `cell` looks up a base field's raw text.
pub fn normalize_record<'a>(
    cell: impl Fn(&str) -> Option<&'a str>,
    extras: Vec<String>,
    reference: NaiveDate,
) -> ApplicationRecord {
    ApplicationRecord {
        company: normalize_name(cell("company")),
        role: normalize_name(cell("role")),
        location: clean_text(cell("location")),
        applied_date: normalize_date(cell("applied_date"), reference),
        status: normalize_status(cell("status")),
        last_contact_date: normalize_date(cell("last_contact_date"), reference),
        contact_name: clean_text(cell("contact_name")),
        contact_email: clean_text(cell("contact_email")),
        job_posting_url: clean_text(cell("job_posting_url")),
        notes: clean_text(cell("notes")),
        extras,
    }
}

/// Standardizes the schema and normalizes every base field, using today's
/// date to complete partial dates.
pub fn clean_applications(raw: &RawTable) -> ApplicationTable {
    clean_applications_at(raw, Local::now().date_naive())
}

pub fn clean_applications_at(raw: &RawTable, reference: NaiveDate) -> ApplicationTable {
    // First occurrence of a header wins; any later duplicate is an extra.
    let mut base_index: HashMap<&str, usize> = HashMap::new();
    let mut extra_index: Vec<usize> = Vec::new();
    for (idx, header) in raw.headers.iter().enumerate() {
        let is_required = REQUIRED_COLUMNS.contains(&header.as_str());
        if is_required && !base_index.contains_key(header.as_str()) {
            base_index.insert(header.as_str(), idx);
        } else {
            extra_index.push(idx);
        }
    }

    let extra_columns = extra_column_names(&raw.headers, &extra_index);

    let records = raw
        .rows
        .iter()
        .map(|row| {
            let cell = |field: &str| {
                base_index
                    .get(field)
                    .and_then(|&idx| row.get(idx))
                    .map(String::as_str)
            };
            let extras = extra_index
                .iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or_default())
                .collect();
            normalize_record(cell, extras, reference)
        })
        .collect();

    ApplicationTable {
        extra_columns,
        records,
    }
}

/// Names for the extra columns. A repeated header gets a `.N` suffix
/// (`company`, `company.1`), skipping names already taken.
fn extra_column_names(headers: &[String], extra_index: &[usize]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if seen.insert(header.as_str()) {
            taken.insert(header.clone());
        } else {
            duplicates.push(idx);
        }
    }

    extra_index
        .iter()
        .map(|&idx| {
            let header = &headers[idx];
            if !duplicates.contains(&idx) {
                return header.clone();
            }
            let mut n = 1;
            let mut name = format!("{header}.{n}");
            while taken.contains(&name) {
                n += 1;
                name = format!("{header}.{n}");
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}
