//! Image Lifecycle
//!
//! Deprecated images are deleted a provider specific number of months after
//! their deprecation. These queries answer which images will be gone by a
//! given date and when a particular image is (or was) deleted.

use super::engine::{scope_to_region, Category};
use super::filters::{in_state, named};
use crate::framework::{borrow_all, Provider, Record, RecordSet};
use chrono::{Months, NaiveDate};

/// Date format used by framework documents and request paths
pub const DATE_FORMAT: &str = "%Y%m%d";

const DEPRECATED: &str = "deprecated";
const DELETED: &str = "deleted";

/// Parse a strict `YYYYMMDD` calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn record_date(record: &Record, key: &str) -> Option<NaiveDate> {
    record.get(key).and_then(parse_date)
}

/// Deprecated images that will have been deleted by `deleted_by`
pub fn deleted_by<'a>(
    provider: &'a Provider,
    deleted_by: NaiveDate,
    deletion_months: u32,
    region: Option<&str>,
) -> RecordSet<'a> {
    let Some(deprecated_by) = deleted_by.checked_sub_months(Months::new(deletion_months)) else {
        return Vec::new();
    };

    let records: RecordSet<'a> = in_state(borrow_all(provider.images()), DEPRECATED)
        .into_iter()
        .filter(|image| record_date(image, "deprecatedon").is_some_and(|d| d < deprecated_by))
        .collect();

    scope_to_region(provider, Category::Images, records, region)
}

/// Deletion date of an image, formatted as `YYYYMMDD`.
///
/// `None` when no image has that name (in that region). An empty string
/// when the image is neither deprecated nor deleted.
pub fn deletion_date(
    provider: &Provider,
    image: &str,
    deletion_months: u32,
    region: Option<&str>,
) -> Option<String> {
    let images = scope_to_region(
        provider,
        Category::Images,
        named(borrow_all(provider.images()), image),
        region,
    );

    if images.is_empty() {
        return None;
    }

    let retired: Vec<&Record> = images
        .iter()
        .map(|r| r.as_ref())
        .filter(|r| matches!(r.get("state"), Some(DEPRECATED) | Some(DELETED)))
        .collect();

    let earliest = |key: &str| retired.iter().filter_map(|r| record_date(r, key)).min();

    let date = if retired.iter().any(|r| r.get("state") == Some(DELETED)) {
        earliest("deletedon")
    } else {
        earliest("deprecatedon").and_then(|d| d.checked_add_months(Months::new(deletion_months)))
    };

    Some(
        date.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
    )
}
