//! Minimal owned XML tree over quick-xml events
//!
//! OOXML parts are small enough to hold in memory, and redaction needs to
//! edit nodes in place and write the part back without disturbing anything
//! it did not touch. Elements keep their qualified names (`w:p`, `a:rPr`)
//! and attribute order; comments, processing instructions and CDATA are kept
//! as raw events.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::{OfficeError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Comment, processing instruction or CDATA, written back verbatim
    Other(Event<'static>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    /// Child elements, skipping text and other nodes
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.is(name))
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all direct text content with `text`, keeping child elements
    pub fn set_text(&mut self, text: &str) {
        self.children.retain(|node| !matches!(node, Node::Text(_)));
        self.children.insert(0, Node::Text(text.to_string()));
    }

    /// Remove every direct child element named in `names`; returns how many went
    pub fn remove_children(&mut self, names: &[&str]) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            Node::Element(el) => !names.contains(&el.name.as_str()),
            _ => true,
        });
        before - self.children.len()
    }

    /// Return the child `name`, creating it at its schema position if missing.
    ///
    /// `order` lists the sibling sequence of the parent's content model. A new
    /// child goes before the first existing sibling ranked after it; siblings
    /// missing from `order` count as ranked after everything.
    pub fn ensure_child(&mut self, name: &str, order: &[&str]) -> &mut Element {
        let index = match self.child_index(name) {
            Some(index) => index,
            None => {
                let at = self.ordered_position(name, order);
                self.children.insert(at, Node::Element(Element::new(name)));
                at
            }
        };
        match &mut self.children[index] {
            Node::Element(el) => el,
            _ => unreachable!("child_index only yields element positions"),
        }
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.is(name)))
    }

    fn ordered_position(&self, name: &str, order: &[&str]) -> usize {
        let rank = |n: &str| order.iter().position(|o| *o == n).unwrap_or(usize::MAX);
        let own = rank(name);
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if rank(&el.name) > own))
            .unwrap_or(self.children.len())
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(write_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        for child in &self.children {
            match child {
                Node::Element(el) => el.write(writer)?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(write_error)?,
                Node::Other(event) => writer.write_event(event.clone()).map_err(write_error)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(write_error)?;
        Ok(())
    }
}

/// A parsed XML part: declaration and top-level misc around one root element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub prolog: Vec<Event<'static>>,
    pub root: Element,
    pub epilog: Vec<Event<'static>>,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(xml_error)?;
            match event {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let el = Element::from_start(&start)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| OfficeError::Xml("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(xml_error)?.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None if root.is_none() => {
                            prolog.push(Event::Text(BytesText::new(&text).into_owned()))
                        }
                        None => epilog.push(Event::Text(BytesText::new(&text).into_owned())),
                    }
                }
                Event::Eof => break,
                other => {
                    let other = other.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Other(other)),
                        None if root.is_none() => prolog.push(other),
                        None => epilog.push(other),
                    }
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(OfficeError::Xml(format!("unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| OfficeError::Xml("document has no root element".to_string()))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.prolog {
            writer.write_event(event.clone()).map_err(write_error)?;
        }
        self.root.write(&mut writer)?;
        for event in &self.epilog {
            writer.write_event(event.clone()).map_err(write_error)?;
        }
        Ok(writer.into_inner())
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => {
            return Err(OfficeError::Xml(format!(
                "second root element <{}>",
                el.name
            )));
        }
    }
    Ok(())
}

fn xml_error(err: impl std::fmt::Display) -> OfficeError {
    OfficeError::Xml(err.to_string())
}

fn write_error(err: impl std::fmt::Display) -> OfficeError {
    OfficeError::Io(std::io::Error::other(err.to_string()))
}
