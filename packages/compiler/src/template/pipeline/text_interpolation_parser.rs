//! Text Interpolation Parser Step
//!
//! Turns `{{...}}` in the text children of an element into text bindings.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use crate::error::Result;
use crate::expression_parser::Parser;
use crate::ml_parser::Node;

#[derive(Debug, Default)]
pub struct TextInterpolationParser {
    parser: Parser,
}

impl TextInterpolationParser {
    pub fn new() -> Self {
        TextInterpolationParser::default()
    }
}

impl CompileStep for TextInterpolationParser {
    fn process(
        &self,
        _parent: Option<&CompileElement>,
        current: &mut CompileElement,
        _control: &mut CompileControl,
    ) -> Result<()> {
        if !current.compile_children {
            return Ok(());
        }
        let location = current.element_description();
        let element = current.element.clone();
        for (index, node) in element.children.iter().enumerate() {
            if let Node::Text(text) = node {
                if let Some(ast) = self.parser.parse_interpolation(&text.value, &location)? {
                    current.text_node_bindings.insert(index, ast);
                }
            }
        }
        Ok(())
    }
}
