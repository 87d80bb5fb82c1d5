//! Attributed Records
//!
//! The generic record model every other component works on: a tag name plus
//! an ordered attribute map, exactly as it appeared in the framework document.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// Ordered result set of a query.
///
/// Records stay borrowed from the store until a filter needs to rewrite an
/// attribute, at which point only that record is cloned.
pub type RecordSet<'a> = Vec<Cow<'a, Record>>;

/// A single framework record (`server`, `image`, `region`, `environment`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    tag: String,
    attributes: IndexMap<String, String>,
}

impl Record {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
        }
    }

    /// Build a record from attribute pairs, keeping their order
    pub fn with_attributes<I, K, V>(tag: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tag: tag.to_string(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Synthetic single-attribute record used by the metadata listings
    pub fn named(tag: &str, name: &str) -> Self {
        Self::with_attributes(tag, [("name", name)])
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Name attribute, empty when absent
    pub fn name(&self) -> &str {
        self.get("name").unwrap_or_default()
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Overwrite an attribute in place, appending it when new
    pub fn set(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    /// Remove an attribute, keeping the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }
}

/// Serializes as the bare attribute map, in stored order
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

/// Wrap a flat list of names into single-attribute records of `tag`
pub fn named_records<'a, I, S>(tag: &str, names: I) -> RecordSet<'a>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| Cow::Owned(Record::named(tag, name.as_ref())))
        .collect()
}

/// Borrow every record of a slice as a result set
pub fn borrow_all(records: &[Record]) -> RecordSet<'_> {
    records.iter().map(Cow::Borrowed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_order_is_kept() {
        let record = Record::with_attributes(
            "server",
            [("type", "smt"), ("name", "smt-1"), ("ip", "1.1.1.1")],
        );
        let keys: Vec<&str> = record.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["type", "name", "ip"]);
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut record = Record::with_attributes(
            "image",
            [("name", "a"), ("region", "r"), ("state", "active")],
        );
        assert_eq!(record.remove("region").as_deref(), Some("r"));
        let keys: Vec<&str> = record.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "state"]);
    }

    #[test]
    fn test_set_existing_keeps_position() {
        let mut record = Record::with_attributes("image", [("region", "a"), ("name", "n")]);
        record.set("region", "b");
        assert_eq!(record.attributes().get_index(0), Some((&"region".to_string(), &"b".to_string())));
    }

    #[test]
    fn test_named_records() {
        let set = named_records("provider", ["amazon", "google"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].tag(), "provider");
        assert_eq!(set[1].name(), "google");
    }
}
