//! Framework Documents
//!
//! Parses framework XML into a tree of attributed nodes. Only elements and
//! attributes matter to the store; text, comments and processing
//! instructions are dropped.

use super::record::Record;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Element of a parsed framework document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// All descendants with the given tag, in document order
    pub fn descendants(&self, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_descendants(tag, &mut found);
        }
        found
    }

    fn collect_descendants<'a>(&'a self, tag: &str, found: &mut Vec<&'a Node>) {
        if self.tag == tag {
            found.push(self);
        }
        for child in &self.children {
            child.collect_descendants(tag, found);
        }
    }

    /// Copy of this element as a flat record (children are not carried over)
    pub fn to_record(&self) -> Record {
        Record::with_attributes(
            &self.tag,
            self.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }
}

/// Parse an XML document and return its root element
pub fn parse(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| anyhow!("Malformed XML at byte {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(start) => stack.push(element(&start)?),
            Event::Empty(start) => attach(&mut stack, &mut root, element(&start)?)?,
            Event::End(_) => {
                let node = stack.pop().context("Unexpected closing tag")?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        bail!("Unclosed element <{}>", open.tag);
    }

    root.context("Document has no root element")
}

fn element(start: &BytesStart<'_>) -> Result<Node> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = IndexMap::new();

    for attr in start.attributes() {
        let attr = attr.with_context(|| format!("Invalid attribute on <{}>", tag))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .with_context(|| format!("Invalid value for attribute '{}' on <{}>", key, tag))?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(Node {
        tag,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => bail!("Multiple root elements"),
        None => *root = Some(node),
    }
    Ok(())
}
