use std::cmp::Ordering;

use crate::record::Record;

/// A record paired with its position in the store at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexed<'a> {
    pub index: usize,
    pub record: &'a Record,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    ByTime,
    ByName,
}

impl SortMode {
    /// Anything other than `name` falls back to time order.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("name") => SortMode::ByName,
            _ => SortMode::ByTime,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::ByTime => "time",
            SortMode::ByName => "name",
        }
    }
}

pub fn indexed(records: &[Record]) -> Vec<Indexed<'_>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| Indexed { index, record })
        .collect()
}

/// Case-insensitive exact match on the trimmed name. A blank query matches nothing.
pub fn filter_by_name<'a>(records: &'a [Record], query: &str) -> Vec<Indexed<'a>> {
    let Some(needle) = name_needle(query) else {
        return Vec::new();
    };

    indexed(records)
        .into_iter()
        .filter(|entry| name_matches(entry.record, &needle))
        .collect()
}

/// Records whose `time` starts with `date_query`. A blank query matches nothing.
pub fn filter_by_date_prefix<'a>(records: &'a [Record], date_query: &str) -> Vec<Indexed<'a>> {
    let prefix = date_query.trim();
    if prefix.is_empty() {
        return Vec::new();
    }

    indexed(records)
        .into_iter()
        .filter(|entry| date_matches(entry.record, prefix))
        .collect()
}

/// Stable sort of a query result. Records without a timestamp come first in time order.
pub fn sort(entries: &mut [Indexed<'_>], mode: SortMode) {
    entries.sort_by(|a, b| compare(a.record, b.record, mode));
}

pub fn sorted(records: &[Record], mode: SortMode) -> Vec<Indexed<'_>> {
    let mut entries = indexed(records);
    sort(&mut entries, mode);
    entries
}

/// What an admin view asks for: optional name and date filters plus an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub name: Option<String>,
    pub date: Option<String>,
    pub sort: SortMode,
}

impl Selection {
    pub fn new(name: Option<&str>, date: Option<&str>, sort: SortMode) -> Self {
        Self {
            name: non_blank(name),
            date: non_blank(date),
            sort,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.name.is_some() || self.date.is_some()
    }

    /// No filters selects every record, both filters select the intersection.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<Indexed<'a>> {
        let mut entries = match &self.name {
            Some(name) => filter_by_name(records, name),
            None => indexed(records),
        };

        if let Some(date) = &self.date {
            entries.retain(|entry| date_matches(entry.record, date));
        }

        sort(&mut entries, self.sort);
        entries
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn name_needle(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| query.to_lowercase())
}

fn name_matches(record: &Record, needle: &str) -> bool {
    record.name.trim().to_lowercase() == needle
}

fn date_matches(record: &Record, prefix: &str) -> bool {
    record
        .time
        .as_deref()
        .is_some_and(|time| time.starts_with(prefix))
}

fn compare(a: &Record, b: &Record, mode: SortMode) -> Ordering {
    match mode {
        SortMode::ByTime => a.time.cmp(&b.time),
        SortMode::ByName => a.name.cmp(&b.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, time: Option<&str>) -> Record {
        Record::new(name, Vec::<String>::new(), time.map(str::to_string))
    }

    fn indices(entries: &[Indexed<'_>]) -> Vec<usize> {
        entries.iter().map(|entry| entry.index).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            record("Kim", Some("2024-05-02 08:00:00")),
            record("Lee", Some("2024-05-01 23:59:59")),
            record("kim ", Some("2024-05-01 07:30:00")),
            record("Park", None),
        ]
    }

    #[test]
    fn name_filter_is_case_insensitive_exact_match() {
        let records = sample();
        assert_eq!(indices(&filter_by_name(&records, "kim")), vec![0, 2]);
        assert_eq!(indices(&filter_by_name(&records, "  KIM ")), vec![0, 2]);
        assert!(filter_by_name(&records, "Ki").is_empty());
    }

    #[test]
    fn blank_queries_match_nothing() {
        let records = sample();
        assert!(filter_by_name(&records, "").is_empty());
        assert!(filter_by_name(&records, "   ").is_empty());
        assert!(filter_by_date_prefix(&records, "").is_empty());
        assert!(filter_by_date_prefix(&records, " \t").is_empty());
    }

    #[test]
    fn date_prefix_matches_whole_day() {
        let records = sample();
        assert_eq!(indices(&filter_by_date_prefix(&records, "2024-05-01")), vec![1, 2]);
        assert_eq!(indices(&filter_by_date_prefix(&records, "2024-05")), vec![0, 1, 2]);
        assert!(filter_by_date_prefix(&records, "2023").is_empty());
    }

    #[test]
    fn sorts_keep_original_indices() {
        let records = sample();
        assert_eq!(indices(&sorted(&records, SortMode::ByTime)), vec![3, 2, 1, 0]);
        assert_eq!(indices(&sorted(&records, SortMode::ByName)), vec![0, 1, 3, 2]);

        let entries = sorted(&records, SortMode::ByName);
        for entry in &entries {
            assert_eq!(entry.record, &records[entry.index]);
        }
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let records = vec![record("A", None), record("A", None), record("A", None)];
        assert_eq!(indices(&sorted(&records, SortMode::ByName)), vec![0, 1, 2]);
        assert_eq!(indices(&sorted(&records, SortMode::ByTime)), vec![0, 1, 2]);
    }

    #[test]
    fn selection_without_filters_selects_all() {
        let records = sample();
        let selection = Selection::new(Some(" "), None, SortMode::ByTime);
        assert!(!selection.is_filtered());
        assert_eq!(selection.apply(&records).len(), records.len());
    }

    #[test]
    fn selection_intersects_name_and_date() {
        let records = sample();
        let selection = Selection::new(Some("kim"), Some("2024-05-01"), SortMode::ByName);
        assert_eq!(indices(&selection.apply(&records)), vec![2]);
    }

    #[test]
    fn sort_param_falls_back_to_time() {
        assert_eq!(SortMode::from_param(Some("name")), SortMode::ByName);
        assert_eq!(SortMode::from_param(Some("Name")), SortMode::ByName);
        assert_eq!(SortMode::from_param(Some("time")), SortMode::ByTime);
        assert_eq!(SortMode::from_param(Some("bogus")), SortMode::ByTime);
        assert_eq!(SortMode::from_param(None), SortMode::ByTime);
    }
}
