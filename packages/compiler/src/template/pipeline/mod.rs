//! Compile Pipeline
//!
//! A fixed sequence of compile steps run over a template element tree. The
//! steps annotate each element and build the proto views of the template.

pub mod compile_control;
pub mod compile_element;
pub mod compile_pipeline;
pub mod compile_step;
pub mod default_steps;
pub mod directive_parser;
pub mod element_binder_builder;
pub mod property_binding_parser;
pub mod proto_view_builder;
pub mod text_interpolation_parser;
pub mod view_builder;
pub mod view_splitter;

pub use compile_control::CompileControl;
pub use compile_element::CompileElement;
pub use compile_pipeline::CompilePipeline;
pub use compile_step::CompileStep;
pub use default_steps::default_steps;
pub use directive_parser::DirectiveParser;
pub use element_binder_builder::ElementBinderBuilder;
pub use property_binding_parser::PropertyBindingParser;
pub use proto_view_builder::ProtoViewBuilder;
pub use text_interpolation_parser::TextInterpolationParser;
pub use view_builder::{BinderBuilder, DirectiveBinderBuilder, ViewBuilder};
pub use view_splitter::ViewSplitter;
