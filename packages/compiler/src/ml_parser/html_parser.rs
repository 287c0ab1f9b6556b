//! HTML Parser
//!
//! Entry point for parsing template source into an element tree.

use super::ast::Node;
use super::parser::{ParseOptions, ParseTreeResult, TreeBuilder};
use crate::error::{CompilerError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    pub fn new() -> Self {
        HtmlParser::default()
    }

    pub fn with_preserve_whitespaces(mut self, preserve: bool) -> Self {
        self.options.preserve_whitespaces = preserve;
        self
    }

    /// Parse `source`, collecting errors alongside the (possibly partial) tree.
    pub fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        TreeBuilder::new(source, url, self.options).build()
    }

    /// Parse `source`, failing with every collected error if there are any.
    pub fn parse_strict(&self, source: &str, url: &str) -> Result<Vec<Node>> {
        let result = self.parse(source, url);
        if result.errors.is_empty() {
            Ok(result.root_nodes)
        } else {
            Err(CompilerError::TemplateParse {
                errors: result.errors,
            })
        }
    }
}
