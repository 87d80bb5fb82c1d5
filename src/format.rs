//! Response Formatting
//!
//! Renders a named record set as JSON or XML. Both renderings are produced
//! from the same records and carry the same attributes:
//!
//! ```text
//! {"servers":[{"type":"smt","name":"smt-1","region":"us-east-1"}]}
//!
//! <?xml version="1.0"?>
//! <servers>
//!   <server type="smt" name="smt-1" region="us-east-1"/>
//! </servers>
//! ```

use crate::framework::Record;
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Response body format, chosen by the request path extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml;charset=utf-8",
        }
    }
}

/// Render records under a collection name
pub fn format_records(format: Format, collection: &str, records: &[Cow<'_, Record>]) -> Result<Vec<u8>> {
    match format {
        Format::Json => {
            let body = BTreeMap::from([(collection, records)]);
            serde_json::to_vec(&body).context("Failed to serialize JSON response")
        }
        Format::Xml => records_to_xml(collection, records),
    }
}

/// Render a single key/value payload
pub fn format_value(format: Format, key: &str, value: &str) -> Result<Vec<u8>> {
    match format {
        Format::Json => {
            let body = BTreeMap::from([(key, value)]);
            serde_json::to_vec(&body).context("Failed to serialize JSON response")
        }
        Format::Xml => value_to_xml(key, value),
    }
}

fn xml_writer() -> Result<Writer<Vec<u8>>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .context("Failed to write XML declaration")?;
    Ok(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Vec<u8> {
    let mut body = writer.into_inner();
    body.push(b'\n');
    body
}

fn records_to_xml(collection: &str, records: &[Cow<'_, Record>]) -> Result<Vec<u8>> {
    let mut writer = xml_writer()?;

    if records.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(collection)))
            .context("Failed to write XML root")?;
        return Ok(finish(writer));
    }

    writer
        .write_event(Event::Start(BytesStart::new(collection)))
        .context("Failed to write XML root")?;

    for record in records {
        let mut element = BytesStart::new(record.tag());
        for (key, value) in record.attributes() {
            element.push_attribute((key.as_str(), value.as_str()));
        }
        writer
            .write_event(Event::Empty(element))
            .with_context(|| format!("Failed to write <{}> element", record.tag()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(collection)))
        .context("Failed to close XML root")?;

    Ok(finish(writer))
}

fn value_to_xml(key: &str, value: &str) -> Result<Vec<u8>> {
    let mut writer = xml_writer()?;

    if value.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(key)))
            .context("Failed to write XML value")?;
    } else {
        writer
            .create_element(key)
            .write_text_content(BytesText::new(value))
            .context("Failed to write XML value")?;
    }

    Ok(finish(writer))
}
