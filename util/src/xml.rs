use std::{
    fmt,
    io::{BufRead, Cursor, Write},
    str::FromStr,
};

use quick_xml::{
    events::{BytesDecl, BytesStart, BytesText, Event},
    Reader, Writer,
};
use thiserror::Error;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

pub mod ns {
    use super::Namespace;

    pub const SOAP_ENVELOPE: Namespace = Namespace("http://schemas.xmlsoap.org/soap/envelope/");
    pub const WS_SECURITY: Namespace = Namespace(
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd",
    );
    pub const WORKDAY: Namespace = Namespace("urn:com.workday/bsvc");
    pub const WSDL: Namespace = Namespace("http://schemas.xmlsoap.org/wsdl/");
    pub const XSD: Namespace = Namespace("http://www.w3.org/2001/XMLSchema");
}

fn well_known_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        uri if uri == ns::SOAP_ENVELOPE.0 => Some("env"),
        uri if uri == ns::WS_SECURITY.0 => Some("wsse"),
        uri if uri == ns::WORKDAY.0 => Some("wd"),
        _ => None,
    }
}

/// Reduces `prefix:local` to `local`. Everything after the first colon is kept.
pub fn strip_namespace_prefix(name: &str) -> &str {
    match name.find(':') {
        Some(index) => &name[index + 1..],
        None => name,
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading or writing XML")]
    QuickXml(#[from] quick_xml::Error),

    #[error("Namespace prefix {0} is not bound")]
    UnboundPrefix(String),

    #[error("Closing tag without a matching opening tag")]
    UnbalancedEnd,

    #[error("Document ended inside an open element")]
    UnexpectedEof,

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Document has more than one root element")]
    MultipleRoots,
}

/// Failure to bind a generic [`Element`] to a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Expected element {expected} but found {found}")]
    UnexpectedElement { expected: String, found: String },

    #[error("Element {parent} has no child {child}")]
    MissingChild { parent: String, child: String },

    #[error("Element {element} has no attribute {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("Element {element} holds invalid value {value:?}")]
    InvalidValue { element: String, value: String },

    #[error("Response body holds no element")]
    EmptyBody,
}

pub trait ToElement {
    fn to_element(&self) -> Element;
}

pub trait FromElement: Sized {
    fn from_element(element: Element) -> Result<Self, ConversionError>;
}

impl ToElement for Element {
    fn to_element(&self) -> Element {
        self.clone()
    }
}

impl FromElement for Element {
    fn from_element(element: Element) -> Result<Self, ConversionError> {
        Ok(element)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace(pub &'static str);

impl Namespace {
    pub fn uri(&self) -> &'static str {
        self.0
    }

    pub fn name(&self, local: &str) -> QName {
        QName::new(Some(self.0), local)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(ToOwned::to_owned),
            local: local.to_owned(),
        }
    }

    pub fn unqualified(local: &str) -> Self {
        Self::new(None, local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<(QName, String)>,
    pub children: Vec<Node>,
}

/// Pre-order walk over every element below a root, excluding the root itself.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        loop {
            let next = self.stack.last_mut()?.next();

            match next {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(Node::Text(_)) => (),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        let value = value.into();

        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }

        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn with_children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn attribute(&self, name: &QName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn into_elements(self) -> impl Iterator<Item = Element> {
        self.children.into_iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn children_named(&self, name: QName) -> impl Iterator<Item = &Element> + '_ {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn child(&self, name: &QName) -> Option<&Element> {
        self.elements().find(|element| element.name == *name)
    }

    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    pub fn descendants_named(&self, name: QName) -> impl Iterator<Item = &Element> + '_ {
        self.descendants().filter(move |element| element.name == name)
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    pub fn expect_name(&self, expected: &QName) -> Result<(), ConversionError> {
        if self.name == *expected {
            Ok(())
        } else {
            Err(ConversionError::UnexpectedElement {
                expected: expected.to_string(),
                found: self.name.to_string(),
            })
        }
    }

    pub fn required_child(&self, name: &QName) -> Result<&Element, ConversionError> {
        self.child(name).ok_or_else(|| ConversionError::MissingChild {
            parent: self.name.to_string(),
            child: name.to_string(),
        })
    }

    pub fn required_attribute(&self, name: &QName) -> Result<&str, ConversionError> {
        self.attribute(name)
            .ok_or_else(|| ConversionError::MissingAttribute {
                element: self.name.to_string(),
                attribute: name.to_string(),
            })
    }

    pub fn parse_text<T: FromStr>(&self) -> Result<T, ConversionError> {
        let text = self.text();

        text.trim()
            .parse()
            .map_err(|_| ConversionError::InvalidValue {
                element: self.name.to_string(),
                value: text.clone(),
            })
    }

    pub fn parse_str(xml: &str) -> Result<Self, Error> {
        Self::parse(xml.as_bytes())
    }

    pub fn parse<R: BufRead>(read: R) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(read);

        let mut buffer = Vec::new();
        let mut scopes = Scopes::default();
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event(&mut buffer)? {
                Event::Start(start) => {
                    let element = scopes.open(&reader, &start)?;
                    stack.push(element);
                }

                Event::Empty(start) => {
                    let element = scopes.open(&reader, &start)?;
                    scopes.close();
                    close_element(&mut stack, &mut root, element)?;
                }

                Event::End(..) => {
                    let mut element = stack.pop().ok_or(Error::UnbalancedEnd)?;
                    element.drop_indentation();
                    scopes.close();
                    close_element(&mut stack, &mut root, element)?;
                }

                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = text.unescape_and_decode(&reader)?;
                        if !text.is_empty() {
                            parent.children.push(Node::Text(text));
                        }
                    }
                }

                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = reader.decode(data.escaped())?.to_owned();
                        parent.children.push(Node::Text(text));
                    }
                }

                Event::Eof => break,

                _ => (),
            }

            buffer.clear();
        }

        if !stack.is_empty() {
            return Err(Error::UnexpectedEof);
        }

        root.ok_or(Error::NoRootElement)
    }

    /// Whitespace-only text next to child elements is layout. Text of leaf
    /// elements is kept exactly as read.
    fn drop_indentation(&mut self) {
        if self.elements().next().is_none() {
            return;
        }

        self.children.retain(|node| match node {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => true,
        });
    }

    /// Serializes the tree with an XML declaration. Every namespace used in the
    /// tree is declared once on the root element.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut prefixes = Prefixes::default();
        prefixes.collect(self);

        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new(b"1.0", Some(b"UTF-8"), None)))?;
        self.write(&mut writer, &prefixes, true)?;

        Ok(writer.into_inner().into_inner())
    }

    fn write<W: Write>(
        &self,
        writer: &mut Writer<W>,
        prefixes: &Prefixes,
        top_level: bool,
    ) -> Result<(), Error> {
        let mut start = BytesStart::owned_name(prefixes.qualify(&self.name));

        if top_level {
            for (uri, prefix) in &prefixes.0 {
                start.push_attribute((format!("xmlns:{}", prefix).as_str(), uri.as_str()));
            }
        }

        for (name, value) in &self.attributes {
            start.push_attribute((prefixes.qualify(name).as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start.to_borrowed()))?;

        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer, prefixes, false)?,
                Node::Text(text) => {
                    writer.write_event(Event::Text(BytesText::from_plain_str(text)))?
                }
            }
        }

        writer.write_event(Event::End(start.to_end()))?;
        Ok(())
    }
}

fn close_element(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), Error> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_some() => return Err(Error::MultipleRoots),
        None => *root = Some(element),
    }

    Ok(())
}

#[derive(Default)]
struct Scopes {
    bindings: Vec<(Option<String>, String)>,
    marks: Vec<usize>,
}

impl Scopes {
    fn open<B: BufRead>(
        &mut self,
        reader: &Reader<B>,
        start: &BytesStart<'_>,
    ) -> Result<Element, Error> {
        self.marks.push(self.bindings.len());
        let mut raw_attributes = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = reader.decode(attribute.key)?;
            let value = reader.decode(&attribute.unescaped_value()?)?.to_owned();

            match key.split_once(':') {
                None if key == "xmlns" => self.bindings.push((None, value)),
                Some(("xmlns", prefix)) => self.bindings.push((Some(prefix.to_owned()), value)),
                _ => raw_attributes.push((key.to_owned(), value)),
            }
        }

        let name = self.resolve(reader.decode(start.name())?, true)?;
        let attributes = raw_attributes
            .into_iter()
            .map(|(key, value)| Ok((self.resolve(&key, false)?, value)))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn close(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    fn resolve(&self, qualified: &str, is_element: bool) -> Result<QName, Error> {
        let (prefix, local) = match qualified.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, qualified),
        };

        // Unprefixed attributes never take the default namespace.
        let namespace = match prefix {
            Some("xml") => Some(XML_NAMESPACE.to_owned()),
            Some(prefix) => Some(
                self.lookup(Some(prefix))
                    .ok_or_else(|| Error::UnboundPrefix(prefix.to_owned()))?
                    .to_owned(),
            ),
            None if is_element => self
                .lookup(None)
                .filter(|uri| !uri.is_empty())
                .map(ToOwned::to_owned),
            None => None,
        };

        Ok(QName {
            namespace,
            local: local.to_owned(),
        })
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }
}

/// Namespace URI to prefix assignments used while writing.
#[derive(Default)]
struct Prefixes(Vec<(String, String)>);

impl Prefixes {
    fn collect(&mut self, element: &Element) {
        self.insert(&element.name);

        for (name, _) in &element.attributes {
            self.insert(name);
        }

        for child in element.elements() {
            self.collect(child);
        }
    }

    fn insert(&mut self, name: &QName) {
        if let Some(uri) = &name.namespace {
            if uri == XML_NAMESPACE || self.prefix(uri).is_some() {
                return;
            }

            let prefix = well_known_prefix(uri)
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| format!("ns{}", self.0.len()));

            self.0.push((uri.clone(), prefix));
        }
    }

    fn prefix(&self, uri: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(known, _)| known == uri)
            .map(|(_, prefix)| prefix.as_str())
    }

    fn qualify(&self, name: &QName) -> String {
        match name.namespace.as_deref() {
            Some(XML_NAMESPACE) => format!("xml:{}", name.local),
            Some(uri) => match self.prefix(uri) {
                Some(prefix) => format!("{}:{}", prefix, name.local),
                None => name.local.clone(),
            },
            None => name.local.clone(),
        }
    }
}
