use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    config::Thresholds,
    models::{FlaggedRecord, FlaggedTable},
};

const UNKNOWN_STATUS: &str = "Unknown";
const EMPTY_SECTION: &str = "- None 🎉";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub followup_due_count: usize,
    pub stale_count: usize,
    pub missing_link_count: usize,
    pub missing_contact_count: usize,
}

fn status_key(record: &FlaggedRecord) -> &str {
    record
        .record
        .status
        .as_ref()
        .map_or(UNKNOWN_STATUS, |s| s.as_str())
}

/// Count per status, most common first; ties sort by name.
pub fn status_breakdown(records: &[FlaggedRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(status_key(record)).or_default() += 1;
    }
    let mut breakdown: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(status, count)| (status.to_string(), count))
        .collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    breakdown
}

fn count_where(records: &[FlaggedRecord], predicate: impl Fn(&FlaggedRecord) -> bool) -> usize {
    records.iter().filter(|&r| predicate(r)).count()
}

pub fn build_dashboard(table: &FlaggedTable) -> Dashboard {
    let records = &table.records;
    Dashboard {
        total: records.len(),
        status_counts: status_breakdown(records).into_iter().collect(),
        followup_due_count: count_where(records, |r| r.flags.followup_due),
        stale_count: count_where(records, |r| r.flags.stale),
        missing_link_count: count_where(records, |r| r.flags.missing_link),
        missing_contact_count: count_where(records, |r| r.flags.missing_contact),
    }
}

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN_STATUS)
}

fn days(value: Option<i64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |d| d.to_string())
}

/// Renders the markdown summary. Both list sections always appear.
pub fn render_summary_md(table: &FlaggedTable, thresholds: Thresholds) -> String {
    let records = &table.records;
    let mut lines: Vec<String> = Vec::new();
    lines.push("# Job Application Tracker Summary\n".to_string());
    lines.push(format!("- Total applications: **{}**", records.len()));
    lines.push(format!(
        "- Follow-up threshold: **{} days**",
        thresholds.followup_days
    ));
    lines.push(format!(
        "- Stale threshold: **{} days**\n",
        thresholds.stale_days
    ));

    lines.push("## Status Breakdown".to_string());
    for (status, count) in status_breakdown(records) {
        lines.push(format!("- **{status}**: {count}"));
    }
    lines.push(String::new());

    lines.push("## Follow-up Due".to_string());
    let followups: Vec<&FlaggedRecord> = records.iter().filter(|r| r.flags.followup_due).collect();
    if followups.is_empty() {
        lines.push(EMPTY_SECTION.to_string());
    }
    for r in followups {
        lines.push(format!(
            "- {} — {} (days since applied: {}, days since contact: {})",
            or_unknown(r.record.company.as_deref()),
            or_unknown(r.record.role.as_deref()),
            days(r.days_since_applied),
            days(r.days_since_contact),
        ));
    }
    lines.push(String::new());

    lines.push("## Stale Applications".to_string());
    let stales: Vec<&FlaggedRecord> = records.iter().filter(|r| r.flags.stale).collect();
    if stales.is_empty() {
        lines.push(EMPTY_SECTION.to_string());
    }
    for r in stales {
        lines.push(format!(
            "- {} — {} (days since contact: {})",
            or_unknown(r.record.company.as_deref()),
            or_unknown(r.record.role.as_deref()),
            days(r.days_since_contact),
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
