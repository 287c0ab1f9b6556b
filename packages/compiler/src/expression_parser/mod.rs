/**
 * Expression Parser Module
 *
 * Lexer, parser and AST for binding expressions.
 */
pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::Parser;
