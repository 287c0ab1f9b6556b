//! ML (Markup Language) Parser Module
//!
//! Parses HTML templates into the element tree consumed by the compile
//! pipeline.

pub mod ast;
pub mod html_parser;
pub mod html_tags;
pub mod parser;

pub use ast::*;
pub use html_parser::HtmlParser;
pub use html_tags::{decode_entities, is_void_element};
pub use parser::{ParseOptions, ParseTreeResult};
