//! Proto View Builder Step
//!
//! Creates a proto view for every view root and hands it to the element
//! binder of the parent element. Other elements inherit the proto view of
//! their parent.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use super::view_builder::ViewBuilder;
use crate::error::{CompilerError, Result};
use crate::render::api::ViewType;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct ProtoViewBuilder {
    root_view_type: ViewType,
}

impl ProtoViewBuilder {
    /// `root_view_type` is the type of the view created for the root
    /// element; nested views are embedded.
    pub fn new(root_view_type: ViewType) -> Self {
        ProtoViewBuilder { root_view_type }
    }
}

impl Default for ProtoViewBuilder {
    fn default() -> Self {
        ProtoViewBuilder::new(ViewType::Component)
    }
}

impl CompileStep for ProtoViewBuilder {
    fn process(
        &self,
        parent: Option<&CompileElement>,
        current: &mut CompileElement,
        _control: &mut CompileControl,
    ) -> Result<()> {
        let inherited = if current.is_view_root {
            let view_type = if parent.is_some() {
                ViewType::Embedded
            } else {
                self.root_view_type
            };
            let proto_view = Rc::new(RefCell::new(ViewBuilder::new(current.element.clone(), view_type)));

            if let Some(parent) = parent {
                let binder = parent.inherited_element_binder.as_ref().ok_or_else(|| {
                    CompilerError::MissingParentBinder {
                        element: parent.element_description(),
                    }
                })?;
                let mut binder = binder.borrow_mut();
                if binder.nested_proto_view.is_some() {
                    return Err(CompilerError::MultipleNestedViews);
                }
                binder.nested_proto_view = Some(proto_view.clone());
            }
            Some(proto_view)
        } else {
            parent.and_then(|parent| parent.inherited_proto_view.clone())
        };

        if let Some(proto_view) = &inherited {
            current.element_index = Some(proto_view.borrow_mut().add_element());
        }
        current.inherited_proto_view = inherited;
        Ok(())
    }
}
