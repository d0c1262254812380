//! Level → template lookup
//!
//! A registry is assembled once and then only read. Registration validates
//! each template and refuses to let two levels share a template name unless
//! the templates are identical in every field.

use crate::template::LayoutTemplate;
use crate::types::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Levels using the one-column elementary template
pub const ELEMENTARY_LEVELS: &[&str] = &[
    "7A", "6A", "5A", "4A", "3A", "2A", "A", "B", "C", "D", "E", "F",
];

/// Levels using the two-column advanced template
pub const ADVANCED_LEVELS: &[&str] = &["G", "H", "I", "J", "K", "L", "M", "N", "O"];

/// Current version of the registry file format
pub const REGISTRY_FORMAT_VERSION: u32 = 1;

static BUILTIN: LazyLock<std::result::Result<TemplateRegistry, String>> =
    LazyLock::new(|| TemplateRegistry::with_builtin_templates().map_err(|e| e.to_string()));

fn normalize_level(level: &str) -> String {
    level.trim().to_uppercase()
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Arc<LayoutTemplate>>,
    levels: BTreeMap<String, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide builtin registry
    pub fn builtin() -> Result<&'static TemplateRegistry> {
        BUILTIN.as_ref().map_err(|reason| LayoutError::InvalidTemplate {
            name: "builtin".to_string(),
            reason: reason.clone(),
        })
    }

    /// Registry with the elementary and advanced level tiers
    pub fn with_builtin_templates() -> Result<Self> {
        let mut registry = Self::new();
        let elementary = LayoutTemplate::elementary();
        let advanced = LayoutTemplate::advanced();
        for level in ELEMENTARY_LEVELS {
            registry.register(level, elementary.clone())?;
        }
        for level in ADVANCED_LEVELS {
            registry.register(level, advanced.clone())?;
        }
        Ok(registry)
    }

    /// Register `template` for `level`
    pub fn register(&mut self, level: &str, template: LayoutTemplate) -> Result<()> {
        let level = normalize_level(level);
        if level.is_empty() {
            return Err(LayoutError::InvalidTemplate {
                name: template.name,
                reason: "level identifier is empty".to_string(),
            });
        }
        if self.levels.contains_key(&level) {
            return Err(LayoutError::DuplicateLevel(level));
        }
        template.validate()?;

        match self.templates.get(&template.name) {
            Some(existing) if **existing != template => {
                return Err(LayoutError::TemplateConflict {
                    level,
                    name: template.name,
                });
            }
            Some(_) => {}
            None => {
                self.templates
                    .insert(template.name.clone(), Arc::new(template.clone()));
            }
        }
        self.levels.insert(level, template.name);
        Ok(())
    }

    /// Template for `level`; lookup ignores case and surrounding whitespace
    pub fn resolve(&self, level: &str) -> Result<&LayoutTemplate> {
        let key = normalize_level(level);
        self.levels
            .get(&key)
            .and_then(|name| self.templates.get(name))
            .map(|template| template.as_ref())
            .ok_or_else(|| LayoutError::UnknownLevel(level.trim().to_string()))
    }

    /// Registered levels with their template names, sorted by level
    pub fn levels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.levels
            .iter()
            .map(|(level, name)| (level.as_str(), name.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Parse and validate a registry file
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    fn from_file(file: RegistryFile) -> Result<Self> {
        if file.version != REGISTRY_FORMAT_VERSION {
            return Err(LayoutError::InvalidTemplate {
                name: "registry".to_string(),
                reason: format!("unsupported registry version {}", file.version),
            });
        }
        let mut registry = Self::new();
        for entry in file.templates {
            for level in &entry.levels {
                registry.register(level, entry.template.clone())?;
            }
        }
        log::info!(
            "Loaded {} templates for {} levels",
            registry.templates.len(),
            registry.levels.len()
        );
        Ok(registry)
    }

    /// Load a registry file; every template is validated before this returns
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Write the registry in its file format
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_file())?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    fn to_file(&self) -> RegistryFile {
        let templates = self
            .templates
            .iter()
            .map(|(name, template)| RegistryEntry {
                levels: self
                    .levels
                    .iter()
                    .filter(|(_, n)| *n == name)
                    .map(|(level, _)| level.clone())
                    .collect(),
                template: template.as_ref().clone(),
            })
            .collect();
        RegistryFile {
            version: REGISTRY_FORMAT_VERSION,
            templates,
        }
    }
}

/// On-disk registry format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    version: u32,
    templates: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryEntry {
    levels: Vec<String>,
    template: LayoutTemplate,
}
