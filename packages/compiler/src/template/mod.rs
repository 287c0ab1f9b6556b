//! Template Compilation
//!
//! The compile pipeline that turns parsed templates into proto views.

pub mod pipeline;
