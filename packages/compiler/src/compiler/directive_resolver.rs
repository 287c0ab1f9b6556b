//! Directive Resolver

use super::directive_binding::Type;
use crate::error::Result;
use crate::render::api::DirectiveMetadata;

/// Looks up the directive metadata declared on a type.
pub trait DirectiveResolver {
    fn resolve(&self, ty: &Type) -> Result<DirectiveMetadata>;
}
