//! App Proto Views
//!
//! The application-level result of compiling a component: element binders
//! linked to their directives and nested views, change-detection records,
//! and the mapping onto the merged render view.

use super::directive_binding::DirectiveBinding;
use crate::change_detection::{ChangeDetectionStrategy, DirectiveRecord, ProtoRecord};
use crate::render::api::{RenderProtoViewMergeMapping, RenderProtoViewRef, ViewType};
use indexmap::IndexMap;
use log::warn;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Change-detection records of one view
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoChangeDetector {
    pub id: String,
    pub strategy: ChangeDetectionStrategy,
    pub records: Vec<ProtoRecord>,
    pub directive_records: Vec<Rc<DirectiveRecord>>,
}

/// Where the elements and views of an app proto view ended up in its
/// merged render view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppProtoViewMergeMapping {
    pub render_proto_view_ref: RenderProtoViewRef,
    pub render_fragment_count: usize,
    pub render_element_indices: Vec<usize>,
    pub host_element_indices_by_view_index: Vec<Option<usize>>,
    pub nested_view_count_by_view_index: Vec<usize>,
}

impl From<RenderProtoViewMergeMapping> for AppProtoViewMergeMapping {
    fn from(mapping: RenderProtoViewMergeMapping) -> Self {
        AppProtoViewMergeMapping {
            render_proto_view_ref: mapping.merged_proto_view_ref,
            render_fragment_count: mapping.fragment_count,
            render_element_indices: mapping.mapped_element_indices,
            host_element_indices_by_view_index: mapping.host_element_indices_by_view_index,
            nested_view_count_by_view_index: mapping.nested_view_count_by_view_index,
        }
    }
}

pub struct ElementBinder {
    pub index: usize,
    pub parent_index: Option<usize>,
    pub distance_to_parent: usize,
    pub directives: Vec<DirectiveBinding>,
    pub component_directive: Option<DirectiveBinding>,
    /// The embedded view of a template anchor, or the component view once
    /// the component has been compiled
    nested_proto_view: OnceCell<Rc<AppProtoView>>,
}

impl ElementBinder {
    pub fn new(
        index: usize,
        parent_index: Option<usize>,
        distance_to_parent: usize,
        directives: Vec<DirectiveBinding>,
        component_directive: Option<DirectiveBinding>,
        embedded_proto_view: Option<Rc<AppProtoView>>,
    ) -> Self {
        let nested_proto_view = OnceCell::new();
        if let Some(view) = embedded_proto_view {
            let _ = nested_proto_view.set(view);
        }
        ElementBinder {
            index,
            parent_index,
            distance_to_parent,
            directives,
            component_directive,
            nested_proto_view,
        }
    }

    pub fn has_static_component(&self) -> bool {
        self.component_directive.is_some()
    }

    pub fn has_embedded_proto_view(&self) -> bool {
        !self.has_static_component() && self.nested_proto_view.get().is_some()
    }

    pub fn nested_proto_view(&self) -> Option<&Rc<AppProtoView>> {
        self.nested_proto_view.get()
    }

    /// Attach the compiled component view. Only the first call has an effect.
    pub fn set_nested_proto_view(&self, view: Rc<AppProtoView>) {
        if self.nested_proto_view.set(view).is_err() {
            warn!("Element binder {} already has a nested proto view", self.index);
        }
    }
}

// Nested views are printed by reference only; recursive components make
// the view graph cyclic.
impl fmt::Debug for ElementBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBinder")
            .field("index", &self.index)
            .field("parent_index", &self.parent_index)
            .field("distance_to_parent", &self.distance_to_parent)
            .field("directives", &self.directives)
            .field("component_directive", &self.component_directive)
            .field("nested_proto_view", &self.nested_proto_view.get().map(|view| view.render))
            .finish()
    }
}

#[derive(Debug)]
pub struct AppProtoView {
    pub view_type: ViewType,
    pub render: RenderProtoViewRef,
    pub element_binders: Vec<ElementBinder>,
    pub variable_bindings: IndexMap<String, String>,
    pub proto_change_detector: ProtoChangeDetector,
    merge_mapping: OnceCell<AppProtoViewMergeMapping>,
}

impl AppProtoView {
    pub fn new(
        view_type: ViewType,
        render: RenderProtoViewRef,
        element_binders: Vec<ElementBinder>,
        variable_bindings: IndexMap<String, String>,
        proto_change_detector: ProtoChangeDetector,
    ) -> Self {
        AppProtoView {
            view_type,
            render,
            element_binders,
            variable_bindings,
            proto_change_detector,
            merge_mapping: OnceCell::new(),
        }
    }

    pub fn merge_mapping(&self) -> Option<&AppProtoViewMergeMapping> {
        self.merge_mapping.get()
    }

    pub fn is_merged(&self) -> bool {
        self.merge_mapping.get().is_some()
    }

    pub fn set_merge_mapping(&self, mapping: AppProtoViewMergeMapping) {
        if self.merge_mapping.set(mapping).is_err() {
            warn!("Proto view {} was merged twice", self.render);
        }
    }
}

/// Public handle to a compiled host view
#[derive(Debug, Clone)]
pub struct ProtoViewRef(Rc<AppProtoView>);

impl ProtoViewRef {
    pub fn new(proto_view: Rc<AppProtoView>) -> Self {
        ProtoViewRef(proto_view)
    }

    pub fn proto_view(&self) -> &Rc<AppProtoView> {
        &self.0
    }
}

impl PartialEq for ProtoViewRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
