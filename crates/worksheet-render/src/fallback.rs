//! Ordered fallback across render backends
//!
//! Backends are tried once each, highest fidelity first. A backend is
//! skipped when its availability check fails, when it errors, when it runs
//! past the timeout, or when its output breaks the page contract. The first
//! valid document wins; every skipped backend leaves a typed failure behind.

use crate::backend::RenderBackend;
use crate::config::RenderConfig;
use crate::types::{BackendError, Document, RenderError, Result, pdf_page_count};
use std::time::Duration;
use worksheet_layout::{LayoutTemplate, PageModel, TemplateRegistry, WorksheetSpec, paginate_worksheet};

/// A document plus the failures of the backends tried before it
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub document: Document,
    pub failures: Vec<BackendError>,
}

pub struct FallbackRenderer {
    backends: Vec<Box<dyn RenderBackend>>,
    timeout: Duration,
}

impl Default for FallbackRenderer {
    /// Tectonic, XeLaTeX, pdfLaTeX, then the drawing backend
    fn default() -> Self {
        let config = RenderConfig::default();
        Self::new(config.build_backends(), config.timeout())
    }
}

impl FallbackRenderer {
    pub fn new(backends: Vec<Box<dyn RenderBackend>>, timeout: Duration) -> Self {
        Self { backends, timeout }
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.build_backends(), config.timeout()))
    }

    /// Identifiers of the chain in the order they are tried
    pub fn backend_ids(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.id().to_string()).collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn render(&self, pages: &[PageModel], template: &LayoutTemplate) -> Result<Document> {
        Ok(self.render_with_report(pages, template).await?.document)
    }

    pub async fn render_with_report(
        &self,
        pages: &[PageModel],
        template: &LayoutTemplate,
    ) -> Result<RenderReport> {
        if self.backends.is_empty() {
            return Err(RenderError::NoBackends);
        }

        let mut failures = Vec::new();
        for backend in &self.backends {
            match self.attempt(backend.as_ref(), pages, template).await {
                Ok(document) => {
                    log::info!(
                        "Rendered {} pages with {}",
                        document.page_count(),
                        document.backend()
                    );
                    return Ok(RenderReport { document, failures });
                }
                Err(err) => {
                    log::warn!("{err}");
                    failures.push(err);
                }
            }
        }

        Err(RenderError::AllBackendsFailed(failures))
    }

    /// Resolve the level, paginate and render
    pub async fn render_worksheet(
        &self,
        spec: &WorksheetSpec,
        registry: &TemplateRegistry,
    ) -> Result<RenderReport> {
        let template = registry.resolve(&spec.level)?;
        let pages = paginate_worksheet(spec, template)?;
        log::info!(
            "Worksheet '{}' level {}: {} problems on {} pages",
            spec.topic,
            spec.level,
            spec.problems.len(),
            pages.len()
        );
        self.render_with_report(&pages, template).await
    }

    async fn attempt(
        &self,
        backend: &dyn RenderBackend,
        pages: &[PageModel],
        template: &LayoutTemplate,
    ) -> std::result::Result<Document, BackendError> {
        let id = backend.id();

        match tokio::time::timeout(self.timeout, backend.is_available()).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(BackendError::unavailable(id, "availability check failed"));
            }
            Err(_) => {
                return Err(BackendError::unavailable(id, "availability check timed out"));
            }
        }

        log::debug!("Trying backend {id}");
        let document = tokio::time::timeout(self.timeout, backend.render(pages, template))
            .await
            .map_err(|_| {
                BackendError::failure(
                    id.clone(),
                    format!("timed out after {:.1}s", self.timeout.as_secs_f32()),
                )
            })??;

        check_contract(&document, pages).map_err(|reason| BackendError::failure(id, reason))?;
        Ok(document)
    }
}

/// A document is only accepted when its PDF holds exactly one page per model
fn check_contract(document: &Document, pages: &[PageModel]) -> std::result::Result<(), String> {
    let count = pdf_page_count(document.bytes()).map_err(|e| format!("unreadable PDF: {e}"))?;
    if count != pages.len() {
        return Err(format!("expected {} pages, document has {count}", pages.len()));
    }
    Ok(())
}
