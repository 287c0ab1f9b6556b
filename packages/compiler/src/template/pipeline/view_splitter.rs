//! View Splitter Step
//!
//! Splits templates into nested views:
//! - the root element starts the top-level view;
//! - a `<template>` element becomes an anchor and its content a new view root;
//! - an element with a `template="..."` or `*name="..."` attribute is replaced
//!   by an anchor carrying the template bindings, and the element itself
//!   (without that attribute) becomes the root of the nested view.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use crate::error::Result;
use crate::expression_parser::Parser;
use crate::ml_parser::Element;
use crate::util::{camel_case_to_dash_case, dash_case_to_camel_case};
use indexmap::IndexMap;
use std::rc::Rc;

const TEMPLATE_TAG: &str = "template";
const TEMPLATE_ATTR: &str = "template";
const TEMPLATE_ATTR_PREFIX: char = '*';

#[derive(Debug, Default)]
pub struct ViewSplitter {
    parser: Parser,
}

impl ViewSplitter {
    pub fn new() -> Self {
        ViewSplitter::default()
    }

    fn parse_template_bindings(
        &self,
        source: &str,
        location: &str,
        anchor: &mut CompileElement,
    ) -> Result<()> {
        let bindings = self.parser.parse_template_bindings(source, location)?;
        for binding in bindings {
            let attr_name = camel_case_to_dash_case(&binding.key);
            if binding.key_is_var {
                let name = binding.name.unwrap_or_else(|| "$implicit".to_string());
                anchor.add_attribute(attr_name, name.clone());
                anchor
                    .variable_bindings
                    .insert(dash_case_to_camel_case(&binding.key), name);
            } else if let Some(expression) = binding.expression {
                anchor.add_attribute(attr_name, expression.source.clone());
                anchor.property_bindings.insert(binding.key, expression);
            } else {
                anchor.add_attribute(attr_name, "");
            }
        }
        Ok(())
    }
}

fn template_attribute(element: &Element) -> Option<(String, String)> {
    element.attrs.iter().find_map(|attr| {
        if attr.name == TEMPLATE_ATTR {
            Some((attr.name.clone(), attr.value.clone()))
        } else {
            attr.name.strip_prefix(TEMPLATE_ATTR_PREFIX).map(|key| {
                let source = if attr.value.is_empty() {
                    key.to_string()
                } else {
                    format!("{} {}", key, attr.value)
                };
                (attr.name.clone(), source)
            })
        }
    })
}

impl CompileStep for ViewSplitter {
    fn process(
        &self,
        parent: Option<&CompileElement>,
        current: &mut CompileElement,
        control: &mut CompileControl,
    ) -> Result<()> {
        if parent.is_none() {
            current.is_view_root = true;
            return Ok(());
        }
        if current.is_view_root {
            return Ok(());
        }

        if current.element.name.eq_ignore_ascii_case(TEMPLATE_TAG) {
            let content = Element::new(TEMPLATE_TAG, Vec::new(), current.element.children.clone());
            let mut view_root = CompileElement::from_element(content);
            view_root.is_view_root = true;

            let mut anchor_element = (*current.element).clone();
            anchor_element.children.clear();
            current.element = Rc::new(anchor_element);
            current.is_template_anchor = true;
            control.ignore_current_children();
            control.add_child(view_root);
            return Ok(());
        }

        if let Some((attr_name, source)) = template_attribute(&current.element) {
            let location = current.element_description();
            let mut view_root = CompileElement::from_element(current.element.without_attribute(&attr_name));
            view_root.is_view_root = true;

            let mut anchor_element = Element::new(TEMPLATE_TAG, Vec::new(), Vec::new());
            anchor_element.source_span = current.element.source_span.clone();
            current.element = Rc::new(anchor_element);
            current.attrs = IndexMap::new();
            current.is_template_anchor = true;
            self.parse_template_bindings(&source, &location, current)?;

            control.ignore_current_children();
            control.add_child(view_root);
        }
        Ok(())
    }
}
