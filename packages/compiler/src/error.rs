//! Compiler Errors
//!
//! A single error type shared by every stage of the compiler. It is `Clone`
//! because one in-flight compilation result is handed to every requester
//! waiting on it.

use crate::parse_util::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilerError {
    /// Errors reported by the template (HTML) parser
    #[error("Template parse errors:\n{}", join_parse_errors(.errors))]
    TemplateParse { errors: Vec<ParseError> },

    /// Errors reported by the expression parser
    #[error("Parser Error: {message}")]
    ParseError { message: String },

    #[error("Cannot reassign a variable binding {name}")]
    VariableReassignment { name: String },

    #[error("Only one nested view per element is allowed")]
    MultipleNestedViews,

    #[error("Only one component directive is allowed per element - check {element}")]
    MultipleComponents { element: String },

    #[error("Nested view inside {element} has no element binder on its parent")]
    MissingParentBinder { element: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Unexpected directive value '{value}' on the View of component '{component}'")]
    InvalidDirective { value: String, component: String },

    #[error("Could not load '{name}' because it is not a component.")]
    NotAComponent { name: String },

    #[error("Unconditional component cycle in {component}")]
    UnconditionalCycle { component: String },

    #[error("No {kind} annotation found on {name}")]
    NoAnnotation { kind: &'static str, name: String },

    #[error("Failed to load {url}: {message}")]
    TemplateLoad { url: String, message: String },

    #[error("View of component '{component}' should have either the templateUrl or template property set")]
    MissingTemplate { component: String },

    #[error("Invalid merge tree: {message}")]
    InvalidMergeTree { message: String },

    #[error("Unknown render proto view #{0}")]
    UnknownRenderProtoView(usize),

    #[error("Invalid compiler configuration: {message}")]
    Config { message: String },
}

fn join_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, CompilerError>;
