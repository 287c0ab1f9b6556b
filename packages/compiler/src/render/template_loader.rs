//! Template Loader
//!
//! Fetches template sources referenced by absolute URL.

use super::api::LocalBoxFuture;
use crate::error::{CompilerError, Result};
use indexmap::IndexMap;
use log::{trace, warn};
use std::cell::RefCell;

pub trait TemplateLoader {
    fn load(&self, url: &str) -> LocalBoxFuture<'_, Result<String>>;
}

/// Serves templates registered up front, keyed by absolute URL.
#[derive(Debug, Default)]
pub struct StaticTemplateLoader {
    templates: RefCell<IndexMap<String, String>>,
}

impl StaticTemplateLoader {
    pub fn new() -> Self {
        StaticTemplateLoader::default()
    }

    pub fn with_template(self, url: impl Into<String>, template: impl Into<String>) -> Self {
        self.add(url, template);
        self
    }

    pub fn add(&self, url: impl Into<String>, template: impl Into<String>) {
        self.templates.borrow_mut().insert(url.into(), template.into());
    }
}

impl TemplateLoader for StaticTemplateLoader {
    fn load(&self, url: &str) -> LocalBoxFuture<'_, Result<String>> {
        let result = match self.templates.borrow().get(url) {
            Some(template) => {
                trace!("Loaded template {}", url);
                Ok(template.clone())
            }
            None => {
                warn!("No template registered for {}", url);
                Err(CompilerError::TemplateLoad {
                    url: url.to_string(),
                    message: "not found".to_string(),
                })
            }
        };
        Box::pin(async move { result })
    }
}
