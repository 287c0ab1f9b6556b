//! Render API
//!
//! Data exchanged between the component compiler and the render compiler.

use crate::change_detection::{ChangeDetectionStrategy, LifecycleHooks};
use crate::error::Result;
use crate::expression_parser::ASTWithSource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A boxed future that is not required to be `Send`.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    /// Hosts a component on a synthetic element
    Host,
    /// The template of a component
    Component,
    /// A template nested inside another view
    Embedded,
}

/// Opaque handle to a proto view owned by the render compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RenderProtoViewRef(pub usize);

impl fmt::Display for RenderProtoViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DirectiveType {
    #[default]
    Directive,
    Component,
}

/// Render-level description of a directive
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectiveMetadata {
    pub id: String,
    pub selector: Option<String>,
    pub directive_type: DirectiveType,
    /// Input declarations, `dirProp` or `dirProp: elProp`
    pub properties: Vec<String>,
    /// Element property -> expression evaluated against the directive
    pub host_properties: IndexMap<String, String>,
    /// Element event -> action evaluated against the directive
    pub host_listeners: IndexMap<String, String>,
    pub host_attributes: IndexMap<String, String>,
    pub hooks: LifecycleHooks,
    pub change_detection: ChangeDetectionStrategy,
    pub export_as: Option<String>,
}

impl DirectiveMetadata {
    pub fn is_component(&self) -> bool {
        self.directive_type == DirectiveType::Component
    }
}

/// Everything the render compiler needs to compile one component template
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewDefinition {
    pub component_id: String,
    pub template_abs_url: Option<String>,
    pub template: Option<String>,
    pub style_abs_urls: Vec<String>,
    pub styles: Vec<String>,
    pub directives: Vec<DirectiveMetadata>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBinding {
    pub full_name: String,
    pub source: ASTWithSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveBinderDto {
    /// Index into `ViewDefinition::directives`
    pub directive_index: usize,
    pub property_bindings: IndexMap<String, ASTWithSource>,
    pub host_property_bindings: IndexMap<String, ASTWithSource>,
    pub event_bindings: Vec<EventBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementBinderDto {
    pub index: usize,
    pub element_index: usize,
    pub parent_index: Option<usize>,
    pub distance_to_parent: usize,
    pub directives: Vec<DirectiveBinderDto>,
    /// Position of the component within `directives`
    pub component_directive: Option<usize>,
    pub nested_proto_view: Option<Box<ProtoViewDto>>,
    pub property_bindings: IndexMap<String, ASTWithSource>,
    pub variable_bindings: IndexMap<String, String>,
    pub event_bindings: Vec<EventBinding>,
    pub text_bindings: Vec<ASTWithSource>,
    pub read_attributes: IndexMap<String, String>,
}

/// A compiled template as produced by the render compiler
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoViewDto {
    pub render: RenderProtoViewRef,
    pub view_type: ViewType,
    pub element_count: usize,
    pub element_binders: Vec<ElementBinderDto>,
    pub variable_bindings: IndexMap<String, String>,
}

/// Nested render views to merge into one.
///
/// `children` line up with the element binders of `root` that host a
/// component or an embedded view, in binder order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeTree {
    pub root: RenderProtoViewRef,
    pub children: Vec<MergeChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeChild {
    /// An already merged component view to inline
    Component(RenderProtoViewRef),
    /// An embedded view, merged on its own
    Embedded(MergeTree),
    /// An embedded view that cannot be merged yet
    Unresolved,
}

impl MergeTree {
    pub fn new(root: RenderProtoViewRef) -> Self {
        MergeTree {
            root,
            children: Vec::new(),
        }
    }
}

/// Result of merging one [`MergeTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderProtoViewMergeMapping {
    pub merged_proto_view_ref: RenderProtoViewRef,
    pub fragment_count: usize,
    /// Merged index of every element, root view first, then each inlined
    /// component view
    pub mapped_element_indices: Vec<usize>,
    /// Merged index of the host element of each view; `None` for the root
    pub host_element_indices_by_view_index: Vec<Option<usize>>,
    /// Number of views nested (transitively) inside each view
    pub nested_view_count_by_view_index: Vec<usize>,
}

impl RenderProtoViewMergeMapping {
    pub fn view_count(&self) -> usize {
        self.host_element_indices_by_view_index.len()
    }
}

/// The render compiler collaborator
pub trait RenderCompiler {
    /// Compile the template of a component.
    fn compile(&self, view: ViewDefinition) -> LocalBoxFuture<'_, Result<ProtoViewDto>>;

    /// Compile a host view holding a single element for `directive`.
    fn compile_host(&self, directive: DirectiveMetadata) -> LocalBoxFuture<'_, Result<ProtoViewDto>>;

    /// Merge `tree`, returning one mapping per merged tree in pre-order.
    /// Unresolved subtrees produce no mapping.
    fn merge_proto_views_recursively(
        &self,
        tree: MergeTree,
    ) -> LocalBoxFuture<'_, Result<Vec<RenderProtoViewMergeMapping>>>;
}
