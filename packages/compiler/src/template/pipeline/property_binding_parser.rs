//! Property Binding Parser Step
//!
//! Parses the binding attributes of an element:
//! - `[prop]="exp"`, `bind-prop="exp"` and `prop="a {{b}}"` property bindings
//! - `(event)="action"` and `on-event="action"` event bindings
//! - `[(prop)]="exp"` and `bindon-prop="exp"` two-way bindings
//! - `#var` and `var-var` variable bindings
//!
//! Bound property names are also recorded as attributes so directive
//! selectors can match them.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use crate::error::Result;
use crate::expression_parser::Parser;
use crate::util::dash_case_to_camel_case;
use once_cell::sync::Lazy;
use regex::Regex;

static BIND_NAME_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:(?:(bind-)|(var-|#)|(on-)|(bindon-))(.+))|\[\(([^\)]+)\)\]|\[([^\]]+)\]|\(([^\)]+)\))$")
        .unwrap()
});

#[derive(Debug, Clone, Copy)]
enum BindGroup {
    Bind = 1,
    Var = 2,
    On = 3,
    BindOn = 4,
    Name = 5,
    TwoWay = 6,
    Property = 7,
    Event = 8,
}

#[derive(Debug, Default)]
pub struct PropertyBindingParser {
    parser: Parser,
}

impl PropertyBindingParser {
    pub fn new() -> Self {
        PropertyBindingParser::default()
    }

    fn bind_property(
        &self,
        name: &str,
        expression: &str,
        location: &str,
        current: &mut CompileElement,
        new_attrs: &mut Vec<(String, String)>,
    ) -> Result<()> {
        let ast = self.parser.parse_binding(expression, location)?;
        new_attrs.push((name.to_string(), ast.source.clone()));
        current
            .property_bindings
            .insert(dash_case_to_camel_case(name), ast);
        Ok(())
    }

    fn bind_event(
        &self,
        name: &str,
        action: &str,
        location: &str,
        current: &mut CompileElement,
    ) -> Result<()> {
        let ast = self.parser.parse_action(action, location)?;
        current.event_bindings.insert(dash_case_to_camel_case(name), ast);
        Ok(())
    }

    fn bind_two_way(
        &self,
        name: &str,
        expression: &str,
        location: &str,
        current: &mut CompileElement,
        new_attrs: &mut Vec<(String, String)>,
    ) -> Result<()> {
        self.bind_property(name, expression, location, current, new_attrs)?;
        self.bind_event(
            &format!("{}-change", name),
            &format!("{}=$event", expression),
            location,
            current,
        )
    }
}

impl CompileStep for PropertyBindingParser {
    fn process(
        &self,
        _parent: Option<&CompileElement>,
        current: &mut CompileElement,
        _control: &mut CompileControl,
    ) -> Result<()> {
        let location = current.element_description();
        let element = current.element.clone();
        let mut new_attrs = Vec::new();

        for attr in &element.attrs {
            let (name, value) = (attr.name.as_str(), attr.value.as_str());
            let caps = match BIND_NAME_REGEXP.captures(name) {
                Some(caps) => caps,
                None => {
                    if let Some(ast) = self.parser.parse_interpolation(value, &location)? {
                        new_attrs.push((name.to_string(), ast.source.clone()));
                        current
                            .property_bindings
                            .insert(dash_case_to_camel_case(name), ast);
                    }
                    continue;
                }
            };
            let group = |g: BindGroup| caps.get(g as usize).map(|m| m.as_str());

            if let Some(target) = group(BindGroup::Name) {
                if group(BindGroup::Bind).is_some() {
                    self.bind_property(target, value, &location, current, &mut new_attrs)?;
                } else if group(BindGroup::Var).is_some() {
                    let value = if value.is_empty() { "$implicit" } else { value };
                    new_attrs.push((target.to_string(), value.to_string()));
                    current
                        .variable_bindings
                        .insert(dash_case_to_camel_case(target), value.to_string());
                } else if group(BindGroup::On).is_some() {
                    self.bind_event(target, value, &location, current)?;
                } else if group(BindGroup::BindOn).is_some() {
                    self.bind_two_way(target, value, &location, current, &mut new_attrs)?;
                }
            } else if let Some(target) = group(BindGroup::TwoWay) {
                self.bind_two_way(target, value, &location, current, &mut new_attrs)?;
            } else if let Some(target) = group(BindGroup::Property) {
                self.bind_property(target, value, &location, current, &mut new_attrs)?;
            } else if let Some(target) = group(BindGroup::Event) {
                self.bind_event(target, value, &location, current)?;
            }
        }

        for (name, value) in new_attrs {
            current.add_attribute(name, value);
        }
        Ok(())
    }
}
