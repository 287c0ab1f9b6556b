//! Render Compiler
//!
//! Compiles component templates into render proto views and merges nested
//! views into flat ones.

pub mod api;
pub mod compiler;
pub mod template_loader;
pub mod view_store;

pub use api::{
    DirectiveBinderDto, DirectiveMetadata, DirectiveType, ElementBinderDto, EventBinding,
    LocalBoxFuture, MergeChild, MergeTree, ProtoViewDto, RenderCompiler, RenderProtoViewMergeMapping,
    RenderProtoViewRef, ViewDefinition, ViewType,
};
pub use compiler::DefaultRenderCompiler;
pub use template_loader::{StaticTemplateLoader, TemplateLoader};
pub use view_store::RenderViewStore;
