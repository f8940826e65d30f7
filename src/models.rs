use std::fmt;

use chrono::NaiveDate;

use crate::dates::canonical_date;

/// Base fields every cleaned record carries, in output order.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "company",
    "role",
    "location",
    "applied_date",
    "status",
    "last_contact_date",
    "contact_name",
    "contact_email",
    "job_posting_url",
    "notes",
];

/// Columns appended by the flag engine, in output order.
pub const DERIVED_COLUMNS: [&str; 7] = [
    "days_since_applied",
    "days_since_contact",
    "flag_missing_link",
    "flag_missing_status",
    "flag_missing_contact",
    "flag_followup_due",
    "flag_stale",
];

/// Table exactly as read from disk: header names plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
    /// Unrecognized value, kept title-cased.
    Other(String),
}

impl Status {
    /// Maps an already title-cased value onto the canonical set.
    pub fn from_title(value: &str) -> Self {
        match value {
            "Applied" => Status::Applied,
            "Interviewing" => Status::Interviewing,
            "Offer" => Status::Offer,
            "Rejected" => Status::Rejected,
            "Withdrawn" => Status::Withdrawn,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Applied => "Applied",
            Status::Interviewing => "Interviewing",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
            Status::Withdrawn => "Withdrawn",
            Status::Other(value) => value,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Status::Applied | Status::Interviewing | Status::Offer)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized row. `None` is the only representation of a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationRecord {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub applied_date: Option<NaiveDate>,
    pub status: Option<Status>,
    pub last_contact_date: Option<NaiveDate>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub job_posting_url: Option<String>,
    pub notes: Option<String>,
    /// Cells of non-schema input columns, verbatim and aligned with
    /// [`ApplicationTable::extra_columns`].
    pub extras: Vec<String>,
}

impl ApplicationRecord {
    /// Base field values rendered as cells, in [`REQUIRED_COLUMNS`] order.
    /// Dates use the canonical `YYYY-MM-DD` form.
    pub fn base_cells(&self) -> [Option<String>; 10] {
        [
            self.company.clone(),
            self.role.clone(),
            self.location.clone(),
            self.applied_date.map(canonical_date),
            self.status.as_ref().map(|s| s.to_string()),
            self.last_contact_date.map(canonical_date),
            self.contact_name.clone(),
            self.contact_email.clone(),
            self.job_posting_url.clone(),
            self.notes.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<ApplicationRecord>,
}

impl ApplicationTable {
    /// Renders the table back into raw form (base fields first, then extras),
    /// writing nulls as empty cells.
    pub fn to_raw(&self) -> RawTable {
        let headers = REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect();
        let rows = self
            .records
            .iter()
            .map(|record| {
                record
                    .base_cells()
                    .into_iter()
                    .map(Option::unwrap_or_default)
                    .chain(record.extras.iter().cloned())
                    .collect()
            })
            .collect();
        RawTable { headers, rows }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFlags {
    pub missing_link: bool,
    pub missing_status: bool,
    pub missing_contact: bool,
    pub followup_due: bool,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedRecord {
    pub record: ApplicationRecord,
    /// Signed: a future date yields a negative count.
    pub days_since_applied: Option<i64>,
    pub days_since_contact: Option<i64>,
    pub flags: RecordFlags,
}

impl FlaggedRecord {
    /// Derived values rendered as cells, in [`DERIVED_COLUMNS`] order.
    pub fn derived_cells(&self) -> [String; 7] {
        let count = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();
        [
            count(self.days_since_applied),
            count(self.days_since_contact),
            self.flags.missing_link.to_string(),
            self.flags.missing_status.to_string(),
            self.flags.missing_contact.to_string(),
            self.flags.followup_due.to_string(),
            self.flags.stale.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlaggedTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<FlaggedRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_canonical_names() {
        for name in ["Applied", "Interviewing", "Offer", "Rejected", "Withdrawn"] {
            assert_eq!(Status::from_title(name).as_str(), name);
        }
        assert_eq!(
            Status::from_title("Phone Screen"),
            Status::Other("Phone Screen".into())
        );
    }

    #[test]
    fn only_open_statuses_are_active() {
        assert!(Status::Applied.is_active());
        assert!(Status::Interviewing.is_active());
        assert!(Status::Offer.is_active());
        assert!(!Status::Rejected.is_active());
        assert!(!Status::Withdrawn.is_active());
        assert!(!Status::Other("Ghosted".into()).is_active());
    }

    #[test]
    fn to_raw_writes_nulls_as_empty_cells() {
        let table = ApplicationTable {
            extra_columns: vec!["salary".into()],
            records: vec![ApplicationRecord {
                company: Some("Acme".into()),
                applied_date: NaiveDate::from_ymd_opt(2024, 3, 14),
                status: Some(Status::Offer),
                extras: vec!["120k".into()],
                ..Default::default()
            }],
        };
        let raw = table.to_raw();
        assert_eq!(raw.headers.len(), 11);
        assert_eq!(raw.headers[10], "salary");
        assert_eq!(raw.rows[0][0], "Acme");
        assert_eq!(raw.rows[0][1], "");
        assert_eq!(raw.rows[0][3], "2024-03-14");
        assert_eq!(raw.rows[0][4], "Offer");
        assert_eq!(raw.rows[0][10], "120k");
    }
}
