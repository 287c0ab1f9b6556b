//! Default Steps
//!
//! The standard compile step sequence used by the render compiler.

use super::compile_step::CompileStep;
use super::directive_parser::DirectiveParser;
use super::element_binder_builder::ElementBinderBuilder;
use super::property_binding_parser::PropertyBindingParser;
use super::proto_view_builder::ProtoViewBuilder;
use super::text_interpolation_parser::TextInterpolationParser;
use super::view_splitter::ViewSplitter;
use crate::error::Result;
use crate::render::api::{DirectiveMetadata, ViewType};

pub fn default_steps(
    directives: &[DirectiveMetadata],
    root_view_type: ViewType,
) -> Result<Vec<Box<dyn CompileStep>>> {
    Ok(vec![
        Box::new(ViewSplitter::new()),
        Box::new(PropertyBindingParser::new()),
        Box::new(TextInterpolationParser::new()),
        Box::new(DirectiveParser::new(directives.to_vec())?),
        Box::new(ProtoViewBuilder::new(root_view_type)),
        Box::new(ElementBinderBuilder::new()),
    ])
}
