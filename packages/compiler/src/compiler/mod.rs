//! Component Compiler
//!
//! Resolves component metadata, drives the render compiler and links the
//! resulting views into app proto views.

pub mod cache;
#[allow(clippy::module_inception)]
pub mod compiler;
pub mod component_url_mapper;
pub mod directive_binding;
pub mod directive_resolver;
pub mod metadata_registry;
pub mod proto_view_factory;
pub mod view;
pub mod view_resolver;

pub use cache::CompilerCache;
pub use compiler::Compiler;
pub use component_url_mapper::{ComponentUrlMapper, DefaultComponentUrlMapper};
pub use directive_binding::{Binding, DirectiveBinding, DirectiveValue, Type};
pub use directive_resolver::DirectiveResolver;
pub use metadata_registry::MetadataRegistry;
pub use proto_view_factory::ProtoViewFactory;
pub use view::{AppProtoView, AppProtoViewMergeMapping, ElementBinder, ProtoChangeDetector, ProtoViewRef};
pub use view_resolver::{ViewMetadata, ViewResolver};
