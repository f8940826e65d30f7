use chrono::{Local, NaiveDate};

use crate::{
    config::Thresholds,
    models::{ApplicationRecord, ApplicationTable, FlaggedRecord, FlaggedTable, RecordFlags, Status},
    value_utils::is_blank,
};

pub fn is_active_status(status: Option<&Status>) -> bool {
    status.is_some_and(Status::is_active)
}

pub fn days_since(today: NaiveDate, date: Option<NaiveDate>) -> Option<i64> {
    date.map(|d| (today - d).num_days())
}

fn meets(days: Option<i64>, threshold: u32) -> bool {
    days.is_some_and(|d| d >= i64::from(threshold))
}

/// Contact recency wins over application recency whenever a contact exists.
/// Without an applied date there is nothing to reason about.
pub fn followup_due(
    status: Option<&Status>,
    days_since_applied: Option<i64>,
    days_since_contact: Option<i64>,
    followup_days: u32,
) -> bool {
    if !is_active_status(status) || days_since_applied.is_none() {
        return false;
    }
    match days_since_contact {
        Some(_) => meets(days_since_contact, followup_days),
        None => meets(days_since_applied, followup_days),
    }
}

/// Same precedence as [`followup_due`], but a missing applied date only falls
/// through to `false` on the no-contact path.
pub fn stale(
    status: Option<&Status>,
    days_since_applied: Option<i64>,
    days_since_contact: Option<i64>,
    stale_days: u32,
) -> bool {
    if !is_active_status(status) {
        return false;
    }
    match days_since_contact {
        Some(_) => meets(days_since_contact, stale_days),
        None => meets(days_since_applied, stale_days),
    }
}

pub fn flag_record_at(
    record: ApplicationRecord,
    thresholds: Thresholds,
    today: NaiveDate,
) -> FlaggedRecord {
    let days_since_applied = days_since(today, record.applied_date);
    let days_since_contact = days_since(today, record.last_contact_date);
    let status = record.status.as_ref();

    let flags = RecordFlags {
        missing_link: is_blank(record.job_posting_url.as_deref()),
        missing_status: status.map_or(true, |s| s.as_str().trim().is_empty()),
        missing_contact: is_blank(record.contact_email.as_deref()),
        followup_due: followup_due(
            status,
            days_since_applied,
            days_since_contact,
            thresholds.followup_days,
        ),
        stale: stale(
            status,
            days_since_applied,
            days_since_contact,
            thresholds.stale_days,
        ),
    };

    FlaggedRecord {
        record,
        days_since_applied,
        days_since_contact,
        flags,
    }
}

/// Adds day counts and flags to every record, measured from today's date.
pub fn add_flags(table: ApplicationTable, thresholds: Thresholds) -> FlaggedTable {
    add_flags_at(table, thresholds, Local::now().date_naive())
}

pub fn add_flags_at(table: ApplicationTable, thresholds: Thresholds, today: NaiveDate) -> FlaggedTable {
    FlaggedTable {
        extra_columns: table.extra_columns,
        records: table
            .records
            .into_iter()
            .map(|record| flag_record_at(record, thresholds, today))
            .collect(),
    }
}
