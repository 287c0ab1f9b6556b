//! Directive Parser Step
//!
//! Matches the directives of the view against each element and binds their
//! input, host property and host listener declarations.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use super::view_builder::DirectiveBinderBuilder;
use crate::directive_matching::{CssSelector, SelectorMatcher};
use crate::error::{CompilerError, Result};
use crate::expression_parser::Parser;
use crate::render::api::{DirectiveMetadata, EventBinding};
use crate::util::{camel_case_to_dash_case, dash_case_to_camel_case, parse_property_mapping};

pub struct DirectiveParser {
    directives: Vec<DirectiveMetadata>,
    matcher: SelectorMatcher<usize>,
    parser: Parser,
}

impl DirectiveParser {
    pub fn new(directives: Vec<DirectiveMetadata>) -> Result<Self> {
        let mut matcher = SelectorMatcher::new();
        for (index, directive) in directives.iter().enumerate() {
            if let Some(selector) = &directive.selector {
                matcher.add_selectables(CssSelector::parse(selector)?, index);
            }
        }
        Ok(DirectiveParser {
            directives,
            matcher,
            parser: Parser::new(),
        })
    }

    fn bind_directive(
        &self,
        directive: &DirectiveMetadata,
        directive_index: usize,
        current: &mut CompileElement,
        location: &str,
    ) -> Result<DirectiveBinderBuilder> {
        let mut binder = DirectiveBinderBuilder::new(directive_index);

        for declaration in &directive.properties {
            let (dir_property, el_property) = parse_property_mapping(declaration);
            let bound = current
                .property_bindings
                .get(&dash_case_to_camel_case(&el_property))
                .cloned()
                .or_else(|| {
                    current
                        .attrs
                        .get(&camel_case_to_dash_case(&el_property))
                        .map(|value| self.parser.wrap_literal_primitive(value, location))
                });
            if let Some(ast) = bound {
                binder.property_bindings.insert(dir_property, ast);
            }
        }

        for (property, expression) in &directive.host_properties {
            let ast = self.parser.parse_binding(expression, location)?;
            binder.host_property_bindings.insert(property.clone(), ast);
        }

        for (event, action) in &directive.host_listeners {
            binder.event_bindings.push(EventBinding {
                full_name: event.clone(),
                source: self.parser.parse_action(action, location)?,
            });
        }

        for (name, value) in &directive.host_attributes {
            if !current.attrs.contains_key(name) {
                current.add_attribute(name.clone(), value.clone());
            }
        }

        Ok(binder)
    }
}

impl CompileStep for DirectiveParser {
    fn process(
        &self,
        _parent: Option<&CompileElement>,
        current: &mut CompileElement,
        _control: &mut CompileControl,
    ) -> Result<()> {
        let selector = CssSelector::for_element_with_attrs(
            &current.element.name,
            current.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let mut matched = Vec::new();
        self.matcher
            .match_selector(&selector, |_, &index| matched.push(index));
        matched.sort_unstable();
        matched.dedup();

        let location = current.element_description();
        for index in matched {
            let directive = &self.directives[index];
            if directive.is_component() {
                if current.component_directive.is_some() {
                    return Err(CompilerError::MultipleComponents { element: location });
                }
                current.component_directive = Some(current.directives.len());
            }
            let binder = self.bind_directive(directive, index, current, &location)?;
            current.directives.push(binder);
        }
        Ok(())
    }
}
