//! Binding Records
//!
//! One binding the change detector evaluates: an expression and the place
//! its value is written to.

use super::directive_record::{DirectiveIndex, DirectiveRecord, LifecycleEvent};
use crate::expression_parser::AST;
use std::rc::Rc;

/// Where a binding's value goes
#[derive(Debug, Clone, PartialEq)]
pub enum BindingTarget {
    /// `[prop]="exp"` on an element
    ElementProperty {
        element_index: usize,
        property_name: String,
    },
    /// A host property of a directive, evaluated against the directive
    HostProperty {
        element_index: usize,
        property_name: String,
    },
    /// `{{exp}}` inside a text node
    TextNode { text_index: usize },
    /// An input property of a directive
    DirectiveProperty { property_name: String },
    /// A lifecycle hook call; has no expression
    DirectiveLifecycle(LifecycleEvent),
}

/// What the implicit receiver of the expression resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImplicitReceiver {
    /// The component instance (and its locals)
    Context,
    Directive(DirectiveIndex),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingRecord {
    pub target: BindingTarget,
    pub implicit_receiver: ImplicitReceiver,
    pub ast: Option<AST>,
    pub directive_record: Option<Rc<DirectiveRecord>>,
}

impl BindingRecord {
    pub fn element_property(element_index: usize, property_name: impl Into<String>, ast: AST) -> Self {
        BindingRecord {
            target: BindingTarget::ElementProperty {
                element_index,
                property_name: property_name.into(),
            },
            implicit_receiver: ImplicitReceiver::Context,
            ast: Some(ast),
            directive_record: None,
        }
    }

    pub fn host_property(
        directive: Rc<DirectiveRecord>,
        property_name: impl Into<String>,
        ast: AST,
    ) -> Self {
        BindingRecord {
            target: BindingTarget::HostProperty {
                element_index: directive.directive_index.element_index,
                property_name: property_name.into(),
            },
            implicit_receiver: ImplicitReceiver::Directive(directive.directive_index),
            ast: Some(ast),
            directive_record: Some(directive),
        }
    }

    pub fn text_node(text_index: usize, ast: AST) -> Self {
        BindingRecord {
            target: BindingTarget::TextNode { text_index },
            implicit_receiver: ImplicitReceiver::Context,
            ast: Some(ast),
            directive_record: None,
        }
    }

    pub fn directive_property(
        directive: Rc<DirectiveRecord>,
        property_name: impl Into<String>,
        ast: AST,
    ) -> Self {
        BindingRecord {
            target: BindingTarget::DirectiveProperty {
                property_name: property_name.into(),
            },
            implicit_receiver: ImplicitReceiver::Context,
            ast: Some(ast),
            directive_record: Some(directive),
        }
    }

    pub fn directive_lifecycle(directive: Rc<DirectiveRecord>, event: LifecycleEvent) -> Self {
        BindingRecord {
            target: BindingTarget::DirectiveLifecycle(event),
            implicit_receiver: ImplicitReceiver::Context,
            ast: None,
            directive_record: Some(directive),
        }
    }

    pub fn is_directive_lifecycle(&self) -> bool {
        matches!(self.target, BindingTarget::DirectiveLifecycle(_))
    }

    pub fn directive_index(&self) -> Option<DirectiveIndex> {
        self.directive_record.as_ref().map(|d| d.directive_index)
    }

    /// Whether both bindings belong to the same directive (or both to none).
    pub fn same_directive(&self, other: &BindingRecord) -> bool {
        self.directive_index() == other.directive_index()
    }
}
