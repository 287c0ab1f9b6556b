//! Element Binder Builder Step
//!
//! Creates an element binder in the current proto view for every element
//! that has bindings, directives or a nested view. Other elements inherit
//! the binder of their parent, except at view roots.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use crate::error::Result;
use crate::render::api::EventBinding;

#[derive(Debug, Default)]
pub struct ElementBinderBuilder;

impl ElementBinderBuilder {
    pub fn new() -> Self {
        ElementBinderBuilder
    }
}

impl CompileStep for ElementBinderBuilder {
    fn process(
        &self,
        parent: Option<&CompileElement>,
        current: &mut CompileElement,
        _control: &mut CompileControl,
    ) -> Result<()> {
        let same_view_parent = parent.filter(|_| !current.is_view_root);

        if current.has_bindings() {
            let proto_view = match &current.inherited_proto_view {
                Some(proto_view) => proto_view.clone(),
                None => return Ok(()),
            };
            let element_index = current.element_index.unwrap_or_default();
            let binder = proto_view.borrow_mut().bind_element(element_index);
            {
                let mut b = binder.borrow_mut();
                if let Some(parent) = same_view_parent {
                    b.parent_index = parent
                        .inherited_element_binder
                        .as_ref()
                        .map(|parent_binder| parent_binder.borrow().index);
                    b.distance_to_parent = parent.distance_to_inherited_binder + 1;
                }
                b.property_bindings = current.property_bindings.clone();
                b.variable_bindings = current.variable_bindings.clone();
                b.event_bindings = current
                    .event_bindings
                    .iter()
                    .map(|(name, source)| EventBinding {
                        full_name: name.clone(),
                        source: source.clone(),
                    })
                    .collect();
                b.text_bindings = current.text_node_bindings.values().cloned().collect();
                b.directives = current.directives.clone();
                b.component_directive = current.component_directive;
                b.read_attributes = current
                    .element
                    .attrs
                    .iter()
                    .map(|attr| (attr.name.clone(), attr.value.clone()))
                    .collect();
            }
            current.distance_to_inherited_binder = 0;
            current.inherited_element_binder = Some(binder);
        } else if let Some(parent) = same_view_parent {
            current.distance_to_inherited_binder = parent.distance_to_inherited_binder + 1;
            current.inherited_element_binder = parent.inherited_element_binder.clone();
        } else {
            current.inherited_element_binder = None;
        }
        Ok(())
    }
}
