//! Metadata Registry
//!
//! In-memory source of directive metadata, component views and component
//! URLs, standing in for annotations on classes.

use super::component_url_mapper::ComponentUrlMapper;
use super::directive_binding::Type;
use super::directive_resolver::DirectiveResolver;
use super::view_resolver::{ViewMetadata, ViewResolver};
use crate::error::{CompilerError, Result};
use crate::render::api::{DirectiveMetadata, DirectiveType};
use indexmap::IndexMap;
use std::cell::RefCell;

#[derive(Debug, Default)]
struct Entry {
    directive: Option<DirectiveMetadata>,
    view: Option<ViewMetadata>,
    url: Option<String>,
}

#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entries: RefCell<IndexMap<Type, Entry>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        MetadataRegistry::default()
    }

    /// Register a directive. An empty `id` defaults to the type name.
    pub fn register_directive(&self, ty: impl Into<Type>, mut metadata: DirectiveMetadata) {
        let ty = ty.into();
        if metadata.id.is_empty() {
            metadata.id = ty.name().to_string();
        }
        self.entries.borrow_mut().entry(ty).or_default().directive = Some(metadata);
    }

    /// Register a component and its view.
    pub fn register_component(&self, ty: impl Into<Type>, mut metadata: DirectiveMetadata, view: ViewMetadata) {
        let ty = ty.into();
        metadata.directive_type = DirectiveType::Component;
        self.register_directive(ty.clone(), metadata);
        self.set_view(ty, view);
    }

    /// Replace the view of a component.
    pub fn set_view(&self, ty: impl Into<Type>, view: ViewMetadata) {
        self.entries.borrow_mut().entry(ty.into()).or_default().view = Some(view);
    }

    pub fn set_component_url(&self, ty: impl Into<Type>, url: impl Into<String>) {
        self.entries.borrow_mut().entry(ty.into()).or_default().url = Some(url.into());
    }
}

impl DirectiveResolver for MetadataRegistry {
    fn resolve(&self, ty: &Type) -> Result<DirectiveMetadata> {
        self.entries
            .borrow()
            .get(ty)
            .and_then(|entry| entry.directive.clone())
            .ok_or_else(|| CompilerError::NoAnnotation {
                kind: "Directive",
                name: ty.to_string(),
            })
    }
}

impl ViewResolver for MetadataRegistry {
    fn resolve(&self, component: &Type) -> Result<ViewMetadata> {
        self.entries
            .borrow()
            .get(component)
            .and_then(|entry| entry.view.clone())
            .ok_or_else(|| CompilerError::NoAnnotation {
                kind: "View",
                name: component.to_string(),
            })
    }
}

impl ComponentUrlMapper for MetadataRegistry {
    fn get_url(&self, component: &Type) -> String {
        self.entries
            .borrow()
            .get(component)
            .and_then(|entry| entry.url.clone())
            .unwrap_or_else(|| "./".to_string())
    }
}
