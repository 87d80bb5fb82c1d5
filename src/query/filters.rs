//! Record Filters
//!
//! Composable predicates over result sets. Every filter keeps the original
//! document order; the two rewriting filters clone before they touch a
//! record so the stored originals are never modified.

use crate::framework::{Record, RecordSet};
use std::borrow::Cow;

fn keep<'a>(records: RecordSet<'a>, pred: impl Fn(&Record) -> bool) -> RecordSet<'a> {
    records.into_iter().filter(|r| pred(r)).collect()
}

/// Whether a server type matches the requested one, either exactly or on
/// its leading hyphen segments (`smt-sles` matches `smt`)
pub fn type_matches(actual: &str, requested: &str) -> bool {
    match actual.strip_prefix(requested) {
        Some(rest) => rest.is_empty() || rest.starts_with('-'),
        None => false,
    }
}

pub fn of_type<'a>(records: RecordSet<'a>, server_type: &str) -> RecordSet<'a> {
    keep(records, |r| {
        r.get("type")
            .is_some_and(|actual| type_matches(actual, server_type))
    })
}

pub fn in_state<'a>(records: RecordSet<'a>, state: &str) -> RecordSet<'a> {
    keep(records, |r| r.get("state") == Some(state))
}

pub fn in_region<'a>(records: RecordSet<'a>, region: &str) -> RecordSet<'a> {
    keep(records, |r| r.get("region") == Some(region))
}

pub fn in_environment<'a>(records: RecordSet<'a>, environment: &str) -> RecordSet<'a> {
    keep(records, |r| r.get("environment") == Some(environment))
}

pub fn named<'a>(records: RecordSet<'a>, name: &str) -> RecordSet<'a> {
    keep(records, |r| r.get("name") == Some(name))
}

/// Present environment-scoped records under the caller's region
pub fn set_region<'a>(records: RecordSet<'a>, region: &str) -> RecordSet<'a> {
    records
        .into_iter()
        .map(|record| {
            let mut record = record.into_owned();
            record.set("region", region);
            Cow::Owned(record)
        })
        .collect()
}

/// Drop the region attribute so a listing does not imply a single region
pub fn clear_region(records: RecordSet<'_>) -> RecordSet<'_> {
    records
        .into_iter()
        .map(|record| {
            if record.get("region").is_none() {
                return record;
            }
            let mut record = record.into_owned();
            record.remove("region");
            Cow::Owned(record)
        })
        .collect()
}
