#![deny(clippy::all)]

/**
 * View Compiler
 *
 * Compiles component templates into proto views: an HTML and expression
 * parser, a step pipeline that splits templates into nested views and
 * binds directives, change-detection record generation, and a compiler
 * that caches, deduplicates and merges component views.
 */

// Core modules
pub mod chars;
pub mod config;
pub mod directive_matching;
pub mod error;
pub mod parse_util;
pub mod url_resolver;
pub mod util;

// Parsers
pub mod expression_parser;
pub mod ml_parser;

// Compilation
pub mod change_detection;
pub mod compiler;
pub mod render;
pub mod template;

// Re-exports
pub use compiler::{
    AppProtoView, Binding, Compiler, CompilerCache, DirectiveValue, MetadataRegistry, ProtoViewRef, Type,
    ViewMetadata,
};
pub use config::CompilerConfig;
pub use error::{CompilerError, Result};
pub use render::{DefaultRenderCompiler, DirectiveMetadata, RenderCompiler, StaticTemplateLoader};
