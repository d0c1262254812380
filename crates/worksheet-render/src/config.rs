use crate::backend::RenderBackend;
use crate::drawing::DrawingBackend;
use crate::typeset::{TexEngine, TypesetBackend, default_search_dirs};
use crate::types::{RenderError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Entries of the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Tectonic,
    XeLatex,
    PdfLatex,
    Drawing,
}

impl BackendKind {
    pub fn engine(self) -> Option<TexEngine> {
        match self {
            BackendKind::Tectonic => Some(TexEngine::Tectonic),
            BackendKind::XeLatex => Some(TexEngine::XeLatex),
            BackendKind::PdfLatex => Some(TexEngine::PdfLatex),
            BackendKind::Drawing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Backends in the order they are tried
    pub backends: Vec<BackendKind>,
    /// Limit for a single backend attempt
    pub timeout_secs: u64,
    /// Searched after `PATH` when locating compilers
    pub search_dirs: Vec<PathBuf>,
    /// Parent of per-render working directories; system temp dir when unset
    pub scratch_root: Option<PathBuf>,
    /// Compiler cache shared across renders; per-render when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backends: vec![
                BackendKind::Tectonic,
                BackendKind::XeLatex,
                BackendKind::PdfLatex,
                BackendKind::Drawing,
            ],
            timeout_secs: 30,
            search_dirs: default_search_dirs(),
            scratch_root: None,
            cache_dir: None,
        }
    }
}

impl RenderConfig {
    /// Load configuration from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config: RenderConfig = serde_json::from_slice(&bytes)
            .map_err(|e| RenderError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RenderError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backends.is_empty() {
            return Err(RenderError::Config("No backends configured".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(RenderError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Instantiate the configured chain
    pub fn build_backends(&self) -> Vec<Box<dyn RenderBackend>> {
        self.backends
            .iter()
            .map(|kind| -> Box<dyn RenderBackend> {
                match kind.engine() {
                    Some(engine) => {
                        let mut backend =
                            TypesetBackend::new(engine).search_dirs(self.search_dirs.clone());
                        if let Some(root) = &self.scratch_root {
                            backend = backend.scratch_root(root);
                        }
                        if let Some(cache) = &self.cache_dir {
                            backend = backend.cache_dir(cache);
                        }
                        Box::new(backend)
                    }
                    None => Box::new(DrawingBackend::new()),
                }
            })
            .collect()
    }
}
