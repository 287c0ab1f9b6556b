//! Template Tree Builder
//!
//! Scans template source and builds the element tree. Errors are collected
//! rather than aborting, so one pass reports every problem.

use super::ast::{Attribute, Comment, Element, Node, Text};
use super::html_tags::{decode_entities, is_void_element};
use crate::chars;
use crate::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};
use std::rc::Rc;
use std::sync::Arc;

/// Options for parsing
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Keep text nodes that only contain whitespace
    pub preserve_whitespaces: bool,
}

/// Result of parsing a template
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
}

struct OpenElement {
    name: String,
    attrs: Vec<Attribute>,
    children: Vec<Node>,
    start: usize,
}

pub(crate) struct TreeBuilder<'a> {
    file: Arc<ParseSourceFile>,
    source: &'a str,
    pos: usize,
    stack: Vec<OpenElement>,
    root_nodes: Vec<Node>,
    errors: Vec<ParseError>,
    options: ParseOptions,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(source: &'a str, url: &str, options: ParseOptions) -> Self {
        TreeBuilder {
            file: Arc::new(ParseSourceFile::new(source.to_string(), url.to_string())),
            source,
            pos: 0,
            stack: Vec::new(),
            root_nodes: Vec::new(),
            errors: Vec::new(),
            options,
        }
    }

    pub(crate) fn build(mut self) -> ParseTreeResult {
        while self.pos < self.source.len() {
            let rest = &self.source[self.pos..];
            if rest.starts_with("<!--") {
                self.consume_comment();
            } else if rest.starts_with("</") {
                self.consume_end_tag();
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| chars::is_ascii_letter(c)) {
                self.consume_start_tag();
            } else {
                self.consume_text();
            }
        }

        // Elements still open at the end of the input are closed implicitly.
        while let Some(open) = self.stack.pop() {
            let end = self.pos;
            self.close(open, end);
        }

        ParseTreeResult {
            root_nodes: self.root_nodes,
            errors: self.errors,
        }
    }

    fn span(&self, start: usize, end: usize) -> ParseSourceSpan {
        ParseSourceSpan::new(
            ParseLocation::at_offset(self.file.clone(), start),
            ParseLocation::at_offset(self.file.clone(), end),
        )
    }

    fn report(&mut self, start: usize, end: usize, msg: String) {
        let span = self.span(start, end);
        self.errors.push(ParseError::new(span, msg));
    }

    fn peek(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or(chars::EOF)
    }

    fn advance(&mut self) {
        let ch = self.peek();
        if ch != chars::EOF {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.source.len() && chars::is_whitespace(self.peek()) {
            self.advance();
        }
    }

    fn consume_name(&mut self) -> &'a str {
        let start = self.pos;
        while self.pos < self.source.len() && chars::is_name_part(self.peek()) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn add_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root_nodes.push(node),
        }
    }

    fn consume_comment(&mut self) {
        let start = self.pos;
        let body_start = start + 4;
        match self.source[body_start..].find("-->") {
            Some(end) => {
                let value = self.source[body_start..body_start + end].trim().to_string();
                self.pos = body_start + end + 3;
                let span = self.span(start, self.pos);
                self.add_node(Node::Comment(Comment {
                    value,
                    source_span: Some(span),
                }));
            }
            None => {
                self.pos = self.source.len();
                self.report(start, self.pos, "Unexpected character \"EOF\"".to_string());
            }
        }
    }

    fn consume_text(&mut self) {
        let start = self.pos;
        // A `<` that does not start a tag or comment is plain text.
        self.advance();
        while self.pos < self.source.len() {
            let rest = &self.source[self.pos..];
            if rest.starts_with("</")
                || rest.starts_with("<!--")
                || (rest.starts_with('<') && rest[1..].starts_with(|c: char| chars::is_ascii_letter(c)))
            {
                break;
            }
            self.advance();
        }

        let raw = &self.source[start..self.pos];
        if !self.options.preserve_whitespaces && raw.trim().is_empty() {
            return;
        }
        let span = self.span(start, self.pos);
        self.add_node(Node::Text(Text {
            value: decode_entities(raw),
            source_span: Some(span),
        }));
    }

    fn consume_start_tag(&mut self) {
        let start = self.pos;
        self.advance();
        let name = self.consume_name().to_string();
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            if self.pos >= self.source.len() {
                self.report(start, self.pos, format!("Unexpected EOF in tag \"{}\"", name));
                break;
            }
            let rest = &self.source[self.pos..];
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            match self.consume_attribute() {
                Some(attr) => attrs.push(attr),
                None => {
                    let at = self.pos;
                    let unexpected = self.peek();
                    self.advance();
                    self.report(at, self.pos, format!("Unexpected character \"{}\"", unexpected));
                }
            }
        }

        let open = OpenElement {
            name,
            attrs,
            children: Vec::new(),
            start,
        };
        if self_closing || is_void_element(&open.name) {
            let end = self.pos;
            self.close(open, end);
        } else {
            self.stack.push(open);
        }
    }

    fn consume_attribute(&mut self) -> Option<Attribute> {
        let start = self.pos;
        let name = self.consume_name();
        if name.is_empty() {
            return None;
        }
        let name = name.to_string();

        let checkpoint = self.pos;
        self.skip_whitespace();
        let mut value = String::new();
        if self.peek() == chars::EQ {
            self.advance();
            self.skip_whitespace();
            let quote = self.peek();
            if chars::is_quote(quote) {
                self.advance();
                let value_start = self.pos;
                match self.source[value_start..].find(quote) {
                    Some(end) => {
                        value = decode_entities(&self.source[value_start..value_start + end]);
                        self.pos = value_start + end + 1;
                    }
                    None => {
                        self.pos = self.source.len();
                        self.report(start, self.pos, format!("Unterminated attribute value for \"{}\"", name));
                    }
                }
            } else {
                let value_start = self.pos;
                while self.pos < self.source.len()
                    && !chars::is_whitespace(self.peek())
                    && self.peek() != chars::GT
                {
                    self.advance();
                }
                value = decode_entities(&self.source[value_start..self.pos]);
            }
        } else {
            self.pos = checkpoint;
        }

        let span = self.span(start, self.pos);
        Some(Attribute {
            name,
            value,
            source_span: Some(span),
        })
    }

    fn consume_end_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name = self.consume_name().to_string();
        self.skip_whitespace();
        if self.peek() == chars::GT {
            self.advance();
        } else {
            self.report(start, self.pos, format!("Unexpected character \"{}\"", self.peek()));
        }

        if is_void_element(&name) {
            self.report(
                start,
                self.pos,
                format!("Void elements do not have end tags \"{}\"", name),
            );
            return;
        }

        let matching = self
            .stack
            .iter()
            .rposition(|open| open.name.eq_ignore_ascii_case(&name));
        match matching {
            Some(index) => {
                let end = self.pos;
                while self.stack.len() > index {
                    if let Some(open) = self.stack.pop() {
                        self.close(open, end);
                    }
                }
            }
            None => {
                self.report(start, self.pos, format!("Unexpected closing tag \"{}\"", name));
            }
        }
    }

    fn close(&mut self, open: OpenElement, end: usize) {
        let span = self.span(open.start, end);
        let is_void = is_void_element(&open.name);
        let element = Element {
            name: open.name,
            attrs: open.attrs,
            children: open.children,
            is_void,
            source_span: Some(span),
        };
        self.add_node(Node::Element(Rc::new(element)));
    }
}
