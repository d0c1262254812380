//! Backends compiling generated LaTeX with an external TeX engine
//!
//! Each render gets its own temporary working directory holding the source,
//! the compiler's auxiliary files and, unless a shared cache is configured,
//! the compiler cache. The directory is removed when the render returns or
//! its future is dropped; the compiler process is killed on drop as well.

mod engine;
mod markup;

pub use engine::{TexEngine, compile_diagnostics, default_search_dirs, locate_program};
pub use markup::{PDF_FILE, TEX_FILE, worksheet_markup};

use crate::backend::RenderBackend;
use crate::types::{BackendError, BackendId, Document, PageSummary, pdf_page_count};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use worksheet_layout::{LayoutTemplate, PageModel};

#[derive(Debug, Clone)]
pub struct TypesetBackend {
    engine: TexEngine,
    /// Explicit compiler path; skips the search when set
    program: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    scratch_root: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
}

impl TypesetBackend {
    pub fn new(engine: TexEngine) -> Self {
        Self {
            engine,
            program: None,
            search_dirs: default_search_dirs(),
            scratch_root: None,
            cache_dir: None,
        }
    }

    /// Use `program` as the compiler executable for `engine`
    pub fn with_program(engine: TexEngine, program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
            ..Self::new(engine)
        }
    }

    pub fn search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    /// Create working directories under `root` instead of the system temp dir
    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Share a compiler cache across renders
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn engine(&self) -> TexEngine {
        self.engine
    }

    fn resolve_program(&self) -> Option<PathBuf> {
        match &self.program {
            Some(program) => program.is_file().then(|| program.clone()),
            None => locate_program(self.engine.program(), &self.search_dirs),
        }
    }

    fn workdir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("worksheet-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn command(&self, program: &Path, workdir: &Path) -> Command {
        let cache = self
            .cache_dir
            .clone()
            .unwrap_or_else(|| workdir.join("cache"));

        let mut command = Command::new(program);
        command
            .args(self.engine.args(TEX_FILE))
            .current_dir(workdir)
            .env("TEXMFVAR", &cache)
            .env("TECTONIC_CACHE_DIR", &cache)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl RenderBackend for TypesetBackend {
    fn id(&self) -> BackendId {
        self.engine.backend_id()
    }

    async fn is_available(&self) -> bool {
        self.resolve_program().is_some()
    }

    async fn render(
        &self,
        pages: &[PageModel],
        template: &LayoutTemplate,
    ) -> Result<Document, BackendError> {
        let id = self.id();
        let program = self.resolve_program().ok_or_else(|| {
            BackendError::unavailable(
                id.clone(),
                format!("'{}' not found on PATH or search directories", self.engine.program()),
            )
        })?;

        let workdir = self
            .workdir()
            .map_err(|e| BackendError::failure(id.clone(), format!("cannot create working directory: {e}")))?;

        let source = worksheet_markup(pages, template);
        tokio::fs::write(workdir.path().join(TEX_FILE), source)
            .await
            .map_err(|e| BackendError::failure(id.clone(), format!("cannot write {TEX_FILE}: {e}")))?;

        log::debug!(
            "Running {} in {}",
            program.display(),
            workdir.path().display()
        );
        let output = self
            .command(&program, workdir.path())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    BackendError::unavailable(id.clone(), format!("cannot run {}: {e}", program.display()))
                }
                _ => BackendError::failure(id.clone(), format!("cannot run {}: {e}", program.display())),
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::failure(
                id,
                format!("{} ({})", compile_diagnostics(&stdout, &stderr), output.status),
            ));
        }

        let bytes = tokio::fs::read(workdir.path().join(PDF_FILE))
            .await
            .map_err(|e| BackendError::failure(id.clone(), format!("compiler produced no {PDF_FILE}: {e}")))?;

        let count = pdf_page_count(&bytes)
            .map_err(|e| BackendError::failure(id.clone(), format!("unreadable PDF: {e}")))?;
        if count != pages.len() {
            return Err(BackendError::failure(
                id,
                format!("expected {} pages, compiler produced {count}", pages.len()),
            ));
        }

        let geometry = template.geometry();
        Ok(Document::new(
            id,
            bytes,
            (geometry.page_width_pt, geometry.page_height_pt),
            PageSummary::from_models(pages),
        ))
    }
}
