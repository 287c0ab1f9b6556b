//! Template AST
//!
//! Element tree produced by the template parser and walked by the compile
//! pipeline.

use crate::parse_util::ParseSourceSpan;
use std::rc::Rc;

/// Node type union
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Rc<Element>),
    Text(Text),
    Comment(Comment),
}

impl Node {
    pub fn as_element(&self) -> Option<&Rc<Element>> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Text node
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: Option<ParseSourceSpan>,
}

/// Comment node
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub value: String,
    pub source_span: Option<ParseSourceSpan>,
}

/// Attribute node
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub source_span: Option<ParseSourceSpan>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            source_span: None,
        }
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub is_void: bool,
    pub source_span: Option<ParseSourceSpan>,
}

impl Element {
    pub fn new(name: impl Into<String>, attrs: Vec<Attribute>, children: Vec<Node>) -> Self {
        Element {
            name: name.into(),
            attrs,
            children,
            is_void: false,
            source_span: None,
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.iter().any(|attr| attr.name == name)
    }

    /// Copy of this element without the named attribute.
    pub fn without_attribute(&self, name: &str) -> Element {
        let mut copy = self.clone();
        copy.attrs.retain(|attr| attr.name != name);
        copy
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Rc<Element>> {
        self.children.iter().filter_map(Node::as_element)
    }
}
