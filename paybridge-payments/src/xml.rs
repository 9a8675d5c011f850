//! Minimal XML tree for processor replies and request envelopes
//!
//! Replies are cleaned of newlines and indentation, then parsed into an
//! [`XmlNode`] tree keyed by local names (namespace prefixes are dropped), so
//! `soap:Envelope` and `Envelope` are looked up the same way. Request
//! envelopes are built as [`XmlElement`] trees and written with escaping.

use crate::error::{PaymentError, PaymentResult};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fmt;

fn xml_err(err: impl fmt::Display) -> PaymentError {
    PaymentError::Xml(err.to_string())
}

/// Drop newlines and any run of two or more whitespace characters.
pub fn clean_response(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut run = String::new();

    for ch in raw.chars().filter(|c| *c != '\n') {
        if ch.is_whitespace() {
            run.push(ch);
            continue;
        }
        if run.chars().count() == 1 {
            cleaned.push_str(&run);
        }
        run.clear();
        cleaned.push(ch);
    }
    if run.chars().count() == 1 {
        cleaned.push_str(&run);
    }
    cleaned
}

/// Parsed element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Clean and parse a reply body into its root element.
    pub fn parse(raw: &str) -> PaymentResult<Self> {
        let cleaned = clean_response(raw);
        let mut reader = Reader::from_str(&cleaned);
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Self::open(&e)?),
                Event::Empty(e) => {
                    let node = Self::open(&e)?;
                    Self::attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| PaymentError::Xml("unbalanced end tag".into()))?;
                    Self::attach(&mut stack, &mut root, node);
                }
                Event::Text(e) => {
                    if let Some(top) = stack.last_mut() {
                        let decoded = e.decode().map_err(xml_err)?;
                        top.text.push_str(&unescape(&decoded).map_err(xml_err)?);
                    }
                }
                Event::CData(e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::GeneralRef(e) => {
                    if let Some(top) = stack.last_mut() {
                        if let Some(ch) = e.resolve_char_ref().map_err(xml_err)? {
                            top.text.push(ch);
                        } else {
                            let entity = e.decode().map_err(xml_err)?;
                            let resolved = resolve_predefined_entity(&entity).ok_or_else(|| {
                                PaymentError::Xml(format!("unknown entity &{entity};"))
                            })?;
                            top.text.push_str(resolved);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(PaymentError::Xml("unexpected end of document".into()));
        }
        root.ok_or_else(|| PaymentError::Xml("document has no root element".into()))
    }

    fn open(start: &BytesStart<'_>) -> PaymentResult<Self> {
        let name = std::str::from_utf8(start.local_name().as_ref())
            .map_err(xml_err)?
            .to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_err)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            attributes.push((local, String::from_utf8_lossy(&attr.value).into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                if root.is_none() {
                    *root = Some(node);
                }
            }
        }
    }

    /// Local element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Attribute by local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follow a chain of child names
    pub fn descend(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Non-empty text at the end of a chain of child names
    pub fn text_at(&self, path: &[&str]) -> Option<String> {
        self.descend(path)
            .map(XmlNode::text)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Depth-first search for a descendant (or self) with the given name
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Empty,
    Text(String),
    Children(Vec<XmlElement>),
}

/// Element to be written into a request document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    content: Content,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Content::Empty,
        }
    }

    /// Create an element holding text
    pub fn text_node(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    /// Add an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Replace the content with text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    /// Append a child element
    pub fn child(mut self, child: XmlElement) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    /// Append a child element when present
    pub fn child_opt(self, child: Option<XmlElement>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    /// Append several children
    pub fn children(self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        children.into_iter().fold(self, XmlElement::child)
    }

    /// Serialize with a UTF-8 XML declaration
    pub fn to_document(&self) -> PaymentResult<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| PaymentError::Serialization(e.to_string()))?;
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| PaymentError::Serialization(e.to_string()))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> PaymentResult<()> {
        let ser = |e: std::io::Error| PaymentError::Serialization(e.to_string());
        let start = BytesStart::new(self.name.as_str()).with_attributes(
            self.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        match &self.content {
            Content::Empty => writer.write_event(Event::Empty(start)).map_err(ser)?,
            Content::Text(text) => {
                writer.write_event(Event::Start(start)).map_err(ser)?;
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(ser)?;
                writer
                    .write_event(Event::End(BytesEnd::new(self.name.as_str())))
                    .map_err(ser)?;
            }
            Content::Children(children) => {
                writer.write_event(Event::Start(start)).map_err(ser)?;
                for child in children {
                    child.write(writer)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new(self.name.as_str())))
                    .map_err(ser)?;
            }
        }
        Ok(())
    }
}
