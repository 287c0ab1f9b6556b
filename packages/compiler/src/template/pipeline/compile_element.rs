//! Compile Element
//!
//! Per-element state accumulated by the compile steps during one pipeline
//! run.

use super::view_builder::{BinderBuilder, DirectiveBinderBuilder, ViewBuilder};
use crate::expression_parser::ASTWithSource;
use crate::ml_parser::Element;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct CompileElement {
    pub element: Rc<Element>,
    /// Attributes used for directive matching; bound properties are added
    /// with their expression source as value.
    pub attrs: IndexMap<String, String>,
    /// Starts a new proto view
    pub is_view_root: bool,
    /// Hosts an embedded view (a `<template>` element or a `*` attribute)
    pub is_template_anchor: bool,
    /// Index of the element inside its proto view
    pub element_index: Option<usize>,
    pub inherited_proto_view: Option<Rc<RefCell<ViewBuilder>>>,
    pub inherited_element_binder: Option<Rc<RefCell<BinderBuilder>>>,
    pub distance_to_inherited_binder: usize,
    pub property_bindings: IndexMap<String, ASTWithSource>,
    pub event_bindings: IndexMap<String, ASTWithSource>,
    pub variable_bindings: IndexMap<String, String>,
    /// Interpolations keyed by the index of the text node among the
    /// element's children
    pub text_node_bindings: IndexMap<usize, ASTWithSource>,
    pub directives: Vec<DirectiveBinderBuilder>,
    /// Position of the component directive within `directives`
    pub component_directive: Option<usize>,
    pub compile_children: bool,
}

impl CompileElement {
    pub fn new(element: Rc<Element>) -> Self {
        let attrs = element
            .attrs
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        CompileElement {
            element,
            attrs,
            is_view_root: false,
            is_template_anchor: false,
            element_index: None,
            inherited_proto_view: None,
            inherited_element_binder: None,
            distance_to_inherited_binder: 0,
            property_bindings: IndexMap::new(),
            event_bindings: IndexMap::new(),
            variable_bindings: IndexMap::new(),
            text_node_bindings: IndexMap::new(),
            directives: Vec::new(),
            component_directive: None,
            compile_children: true,
        }
    }

    pub fn from_element(element: Element) -> Self {
        CompileElement::new(Rc::new(element))
    }

    pub fn has_bindings(&self) -> bool {
        self.is_template_anchor
            || !self.property_bindings.is_empty()
            || !self.event_bindings.is_empty()
            || !self.variable_bindings.is_empty()
            || !self.text_node_bindings.is_empty()
            || !self.directives.is_empty()
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Opening tag used in error messages, e.g. `<div [title]="t">`.
    pub fn element_description(&self) -> String {
        let mut description = format!("<{}", self.element.name);
        for attr in &self.element.attrs {
            if attr.value.is_empty() {
                let _ = write!(description, " {}", attr.name);
            } else {
                let _ = write!(description, " {}=\"{}\"", attr.name, attr.value);
            }
        }
        description.push('>');
        description
    }
}
