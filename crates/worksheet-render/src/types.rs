use std::fmt;
use std::path::Path;
use thiserror::Error;
use worksheet_layout::{LayoutError, PageModel, PageRole};

/// Identifier of the backend that produced a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendId(String);

impl BackendId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a single backend did not produce a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The tool or runtime the backend needs is not present
    #[error("{backend} unavailable: {reason}")]
    Unavailable { backend: BackendId, reason: String },
    /// The backend ran but could not produce a valid document
    #[error("{backend} failed: {reason}")]
    RenderFailure { backend: BackendId, reason: String },
}

impl BackendError {
    pub fn unavailable(backend: BackendId, reason: impl Into<String>) -> Self {
        BackendError::Unavailable {
            backend,
            reason: reason.into(),
        }
    }

    pub fn failure(backend: BackendId, reason: impl Into<String>) -> Self {
        BackendError::RenderFailure {
            backend,
            reason: reason.into(),
        }
    }

    pub fn backend(&self) -> &BackendId {
        match self {
            BackendError::Unavailable { backend, .. } | BackendError::RenderFailure { backend, .. } => {
                backend
            }
        }
    }
}

fn describe_failures(failures: &[BackendError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("All render backends failed: {}", describe_failures(.0))]
    AllBackendsFailed(Vec<BackendError>),
    #[error("No render backends configured")]
    NoBackends,
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Role and problem numbers of the page model a rendered page was drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub role: PageRole,
    /// Problem numbers in placement order
    pub numbers: Vec<usize>,
}

impl PageSummary {
    pub fn from_models(pages: &[PageModel]) -> Vec<Self> {
        pages
            .iter()
            .map(|page| PageSummary {
                role: page.role,
                numbers: page.numbers(),
            })
            .collect()
    }
}

/// A finished PDF produced by exactly one backend
#[derive(Debug, Clone)]
pub struct Document {
    backend: BackendId,
    bytes: Vec<u8>,
    page_size_pt: (f32, f32),
    pages: Vec<PageSummary>,
}

impl Document {
    pub fn new(
        backend: BackendId,
        bytes: Vec<u8>,
        page_size_pt: (f32, f32),
        pages: Vec<PageSummary>,
    ) -> Self {
        Self {
            backend,
            bytes,
            page_size_pt,
            pages,
        }
    }

    pub fn backend(&self) -> &BackendId {
        &self.backend
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageSummary] {
        &self.pages
    }

    /// Page width and height in points
    pub fn page_size_pt(&self) -> (f32, f32) {
        self.page_size_pt
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Parse the rendered bytes for further processing such as imposition
    pub fn to_pdf(&self) -> Result<lopdf::Document> {
        Ok(lopdf::Document::load_mem(&self.bytes)?)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }
}

/// Number of pages in a PDF byte buffer
pub fn pdf_page_count(bytes: &[u8]) -> std::result::Result<usize, lopdf::Error> {
    Ok(lopdf::Document::load_mem(bytes)?.get_pages().len())
}
