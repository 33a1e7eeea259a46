//! Name search

use roster_core::Record;

/// Records whose `"firstname lastname"` contains `term`, ignoring case
///
/// A blank term keeps every record.
#[must_use]
pub fn filter_by_name(records: &[Record], term: &str) -> Vec<Record> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| full_name(record).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

fn full_name(record: &Record) -> String {
    format!(
        "{} {}",
        record.get_str("firstname").unwrap_or_default(),
        record.get_str("lastname").unwrap_or_default()
    )
}
