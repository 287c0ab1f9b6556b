//! View Builder
//!
//! Mutable proto-view and element-binder structures filled in by the compile
//! steps and frozen into render DTOs once the pipeline has run.

use crate::expression_parser::ASTWithSource;
use crate::ml_parser::Element;
use crate::render::api::{
    DirectiveBinderDto, ElementBinderDto, EventBinding, ProtoViewDto, RenderProtoViewRef, ViewType,
};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct ViewBuilder {
    pub root_element: Rc<Element>,
    pub view_type: ViewType,
    pub element_count: usize,
    pub element_binders: Vec<Rc<RefCell<BinderBuilder>>>,
    pub variable_bindings: IndexMap<String, String>,
}

impl ViewBuilder {
    pub fn new(root_element: Rc<Element>, view_type: ViewType) -> Self {
        ViewBuilder {
            root_element,
            view_type,
            element_count: 0,
            element_binders: Vec::new(),
            variable_bindings: IndexMap::new(),
        }
    }

    /// Register an element of this view and return its index.
    pub fn add_element(&mut self) -> usize {
        self.element_count += 1;
        self.element_count - 1
    }

    pub fn bind_element(&mut self, element_index: usize) -> Rc<RefCell<BinderBuilder>> {
        let binder = Rc::new(RefCell::new(BinderBuilder::new(
            self.element_binders.len(),
            element_index,
        )));
        self.element_binders.push(binder.clone());
        binder
    }

    pub fn bind_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variable_bindings.insert(name.into(), value.into());
    }

    /// Freeze this view and its nested views. `allocate` assigns the render
    /// reference of each view, innermost first.
    pub fn build(&self, allocate: &mut dyn FnMut(&ProtoViewDto) -> RenderProtoViewRef) -> ProtoViewDto {
        self.build_with_variables(&IndexMap::new(), allocate)
    }

    fn build_with_variables(
        &self,
        inherited_variables: &IndexMap<String, String>,
        allocate: &mut dyn FnMut(&ProtoViewDto) -> RenderProtoViewRef,
    ) -> ProtoViewDto {
        let mut variable_bindings = inherited_variables.clone();
        variable_bindings.extend(self.variable_bindings.iter().map(|(k, v)| (k.clone(), v.clone())));

        let element_binders = self
            .element_binders
            .iter()
            .map(|binder| binder.borrow().build(allocate))
            .collect();

        let mut dto = ProtoViewDto {
            render: RenderProtoViewRef::default(),
            view_type: self.view_type,
            element_count: self.element_count,
            element_binders,
            variable_bindings,
        };
        dto.render = allocate(&dto);
        dto
    }
}

#[derive(Debug)]
pub struct BinderBuilder {
    pub index: usize,
    pub element_index: usize,
    pub parent_index: Option<usize>,
    pub distance_to_parent: usize,
    pub directives: Vec<DirectiveBinderBuilder>,
    pub component_directive: Option<usize>,
    pub nested_proto_view: Option<Rc<RefCell<ViewBuilder>>>,
    pub property_bindings: IndexMap<String, ASTWithSource>,
    pub variable_bindings: IndexMap<String, String>,
    pub event_bindings: Vec<EventBinding>,
    pub text_bindings: Vec<ASTWithSource>,
    pub read_attributes: IndexMap<String, String>,
}

impl BinderBuilder {
    fn new(index: usize, element_index: usize) -> Self {
        BinderBuilder {
            index,
            element_index,
            parent_index: None,
            distance_to_parent: 0,
            directives: Vec::new(),
            component_directive: None,
            nested_proto_view: None,
            property_bindings: IndexMap::new(),
            variable_bindings: IndexMap::new(),
            event_bindings: Vec::new(),
            text_bindings: Vec::new(),
            read_attributes: IndexMap::new(),
        }
    }

    /// Detached binder, not registered with any view.
    pub fn standalone() -> Self {
        BinderBuilder::new(0, 0)
    }

    fn build(&self, allocate: &mut dyn FnMut(&ProtoViewDto) -> RenderProtoViewRef) -> ElementBinderDto {
        // Variables declared on a template anchor belong to the embedded view.
        let (nested_proto_view, variable_bindings) = match &self.nested_proto_view {
            Some(nested) => (
                Some(Box::new(
                    nested.borrow().build_with_variables(&self.variable_bindings, allocate),
                )),
                IndexMap::new(),
            ),
            None => (None, self.variable_bindings.clone()),
        };

        ElementBinderDto {
            index: self.index,
            element_index: self.element_index,
            parent_index: self.parent_index,
            distance_to_parent: self.distance_to_parent,
            directives: self.directives.iter().map(DirectiveBinderBuilder::build).collect(),
            component_directive: self.component_directive,
            nested_proto_view,
            property_bindings: self.property_bindings.clone(),
            variable_bindings,
            event_bindings: self.event_bindings.clone(),
            text_bindings: self.text_bindings.clone(),
            read_attributes: self.read_attributes.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectiveBinderBuilder {
    /// Index into the directive list of the view definition
    pub directive_index: usize,
    pub property_bindings: IndexMap<String, ASTWithSource>,
    pub host_property_bindings: IndexMap<String, ASTWithSource>,
    pub event_bindings: Vec<EventBinding>,
}

impl DirectiveBinderBuilder {
    pub fn new(directive_index: usize) -> Self {
        DirectiveBinderBuilder {
            directive_index,
            property_bindings: IndexMap::new(),
            host_property_bindings: IndexMap::new(),
            event_bindings: Vec::new(),
        }
    }

    fn build(&self) -> DirectiveBinderDto {
        DirectiveBinderDto {
            directive_index: self.directive_index,
            property_bindings: self.property_bindings.clone(),
            host_property_bindings: self.host_property_bindings.clone(),
            event_bindings: self.event_bindings.clone(),
        }
    }
}
