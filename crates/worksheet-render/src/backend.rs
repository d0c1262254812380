use crate::types::{BackendError, BackendId, Document};
use async_trait::async_trait;
use worksheet_layout::{LayoutTemplate, PageModel};

/// A strategy that turns laid-out pages into a finished PDF
///
/// Implementations draw at the positions given by
/// [`worksheet_layout::PageGeometry`] and must emit exactly one PDF page per
/// [`PageModel`], in order.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    fn id(&self) -> BackendId;

    /// Cheap check for the tool or runtime the backend depends on
    async fn is_available(&self) -> bool;

    async fn render(
        &self,
        pages: &[PageModel],
        template: &LayoutTemplate,
    ) -> Result<Document, BackendError>;
}
