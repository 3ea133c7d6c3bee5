use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BbResult;
use crate::registry::{TagRegistry, BUILTIN_TAGS};

pub const DEFAULT_DUMMY_LABEL: &str = "text";

/// A tag that needs a parameter, and the value written for it when it appears bare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultParam {
    pub tag: String,
    pub value: String,
}

impl DefaultParam {
    pub fn new(tag: &str, value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }
}

/// The bare tags the balancer fills in: `[size]`, `[color]`, `[url]`, `[indent]`
pub fn builtin_defaults() -> Vec<DefaultParam> {
    vec![
        DefaultParam::new("size", "10"),
        DefaultParam::new("color", "000000"),
        DefaultParam::new("url", ""),
        DefaultParam::new("indent", "15"),
    ]
}

/// Editor configuration, loaded from YAML.
///
/// Every field is optional in the file and falls back to the built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Placeholder inserted between tags when nothing is selected
    pub dummy_label: String,
    /// Known tag names
    pub tags: Vec<String>,
    /// Default parameters for bare tags
    pub defaults: Vec<DefaultParam>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dummy_label: DEFAULT_DUMMY_LABEL.to_string(),
            tags: BUILTIN_TAGS.iter().map(|t| t.to_string()).collect(),
            defaults: builtin_defaults(),
        }
    }
}

impl EditorConfig {
    pub fn from_yaml(yaml: &str) -> BbResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> BbResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn registry(&self) -> TagRegistry {
        TagRegistry::from_names(self.tags.iter().cloned())
    }
}
