//! Compiler Configuration

use serde::{Deserialize, Serialize};

use crate::error::{CompilerError, Result};

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Base URL that component URLs are resolved against
    pub app_root_url: Option<String>,
    /// Keep whitespace-only text nodes in templates
    pub preserve_whitespaces: bool,
    /// Deduplicate change-detection records shared between bindings
    pub coalesce_records: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            app_root_url: None,
            preserve_whitespaces: false,
            coalesce_records: true,
        }
    }
}

impl CompilerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CompilerError::Config {
            message: e.to_string(),
        })
    }
}
