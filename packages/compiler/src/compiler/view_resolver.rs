//! View Resolver

use super::directive_binding::{DirectiveValue, Type};
use crate::error::Result;

/// The view declared on a component
#[derive(Debug, Clone, Default)]
pub struct ViewMetadata {
    /// Inline template, wins over `template_url`
    pub template: Option<String>,
    pub template_url: Option<String>,
    pub styles: Vec<String>,
    pub style_urls: Vec<String>,
    /// Directives used by the template; may nest lists and forward refs
    pub directives: Vec<DirectiveValue>,
}

impl ViewMetadata {
    pub fn with_template(template: impl Into<String>) -> Self {
        ViewMetadata {
            template: Some(template.into()),
            ..Default::default()
        }
    }

    pub fn with_template_url(url: impl Into<String>) -> Self {
        ViewMetadata {
            template_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn directives(mut self, directives: Vec<DirectiveValue>) -> Self {
        self.directives = directives;
        self
    }
}

/// Looks up the view declared on a component type.
pub trait ViewResolver {
    fn resolve(&self, component: &Type) -> Result<ViewMetadata>;
}
