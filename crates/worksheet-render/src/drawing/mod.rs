//! In-process backend drawing pages directly with printpdf
//!
//! Always available and bounded in time. Uses the builtin Helvetica faces
//! and the plain-text notation rewrite, so fractions stay inline.

mod encoding;
mod ops;

pub use encoding::{reencode_text, to_win_ansi};

use crate::backend::RenderBackend;
use crate::types::{BackendError, BackendId, Document, PageSummary};
use async_trait::async_trait;
use ops::PageOps;
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions};
use worksheet_layout::notation::to_plain;
use worksheet_layout::text::text_width_pt;
use worksheet_layout::{ColorRole, HeaderBlock, HeaderLayout, LayoutTemplate, PageGeometry, PageModel};

pub const DRAWING_BACKEND_ID: &str = "drawing";

/// Outline weight of score-table boxes and underline rules
const RULE_THICKNESS_PT: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingBackend;

impl DrawingBackend {
    pub fn new() -> Self {
        Self
    }

    /// Compose the PDF synchronously
    pub fn render_bytes(pages: &[PageModel], template: &LayoutTemplate) -> Result<Vec<u8>, lopdf::Error> {
        let geometry = template.geometry();
        let header = geometry.header_layout(template);
        let (width_mm, height_mm) = template.paper.dimensions_mm();

        let mut doc = PdfDocument::new("Worksheet");
        doc.pages = pages
            .iter()
            .map(|page| {
                let ops = draw_page(page, template, &geometry, &header);
                PdfPage::new(Mm(width_mm), Mm(height_mm), ops.into_ops())
            })
            .collect();

        let mut warnings = Vec::new();
        reencode_text(&doc.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

#[async_trait]
impl RenderBackend for DrawingBackend {
    fn id(&self) -> BackendId {
        BackendId::new(DRAWING_BACKEND_ID)
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn render(
        &self,
        pages: &[PageModel],
        template: &LayoutTemplate,
    ) -> Result<Document, BackendError> {
        let owned_pages = pages.to_vec();
        let owned_template = template.clone();

        // PDF composition is CPU-bound, spawn blocking
        let bytes = tokio::task::spawn_blocking(move || {
            DrawingBackend::render_bytes(&owned_pages, &owned_template)
        })
        .await
        .map_err(|e| BackendError::failure(self.id(), format!("drawing task failed: {e}")))?
        .map_err(|e| BackendError::failure(self.id(), format!("cannot encode text: {e}")))?;

        log::debug!("Drew {} pages ({} bytes)", pages.len(), bytes.len());
        Ok(Document::new(
            self.id(),
            bytes,
            (template.geometry().page_width_pt, template.geometry().page_height_pt),
            PageSummary::from_models(pages),
        ))
    }
}

fn draw_page(
    page: &PageModel,
    template: &LayoutTemplate,
    geometry: &PageGeometry,
    header: &HeaderLayout,
) -> PageOps {
    let mut ops = PageOps::default();
    let fonts = &template.fonts;
    let body = template.color(ColorRole::Body);

    match &page.header {
        Some(block) => draw_header(&mut ops, block, page.label.as_deref(), template, geometry, header),
        None => {
            if let Some(label) = &page.label {
                let (x, y) = geometry.label_baseline(header.label.size_pt);
                ops.text(
                    x,
                    y,
                    header.label.size_pt,
                    BuiltinFont::HelveticaBold,
                    template.color(ColorRole::Header),
                    label,
                );
            }
        }
    }

    for placement in &page.placements {
        let rect = geometry.placement_rect(placement);
        ops.text(
            rect.x,
            geometry.line_baseline(&rect, 0),
            fonts.body_pt,
            BuiltinFont::HelveticaBold,
            body,
            &format!("({})", placement.number),
        );
        let text_x = rect.x + geometry.number_indent_pt;
        for (i, line) in placement.lines.iter().enumerate() {
            ops.text(
                text_x,
                geometry.line_baseline(&rect, i),
                fonts.body_pt,
                BuiltinFont::Helvetica,
                body,
                &to_plain(line),
            );
        }
    }

    if let Some(footer) = &template.footer_text {
        let (center_x, y) = geometry.footer_anchor(fonts.footer_pt);
        ops.text(
            center_x - text_width_pt(footer, fonts.footer_pt) / 2.0,
            y,
            fonts.footer_pt,
            BuiltinFont::Helvetica,
            template.color(ColorRole::Footer),
            footer,
        );
    }

    ops
}

fn draw_header(
    ops: &mut PageOps,
    block: &HeaderBlock,
    label: Option<&str>,
    template: &LayoutTemplate,
    geometry: &PageGeometry,
    header: &HeaderLayout,
) {
    let accent = template.color(ColorRole::Header);
    let body = template.color(ColorRole::Body);
    let body_pt = template.fonts.body_pt;

    ops.text(
        header.brand.x,
        header.brand.y,
        header.brand.size_pt,
        BuiltinFont::HelveticaBold,
        accent,
        &template.brand,
    );
    if let Some(label) = label {
        ops.text(
            header.label.x,
            header.label.y,
            header.label.size_pt,
            BuiltinFont::HelveticaBold,
            accent,
            label,
        );
    }
    ops.text(
        header.centred_x(&block.topic),
        header.title.y,
        header.title.size_pt,
        BuiltinFont::HelveticaBold,
        body,
        &block.topic,
    );

    for (field, (anchor, rule_start, rule_end)) in block
        .student_fields
        .iter()
        .zip(geometry.student_field_cells(header, &block.student_fields))
    {
        ops.text(
            anchor.x,
            anchor.y,
            anchor.size_pt,
            BuiltinFont::Helvetica,
            body,
            &format!("{field}:"),
        );
        ops.rule(rule_start, rule_end, anchor.y - 2.0, body, RULE_THICKNESS_PT);
    }

    for (band, cell) in template.score_bands.iter().zip(&header.score_boxes) {
        ops.fill_rect(*cell, template.color(ColorRole::TableFill));
        ops.stroke_rect(*cell, body, RULE_THICKNESS_PT);
        let (label_y, mistakes_y) = geometry.score_baselines(cell);
        for (text, y) in [(&band.label, label_y), (&band.mistakes, mistakes_y)] {
            ops.text(
                cell.center_x() - text_width_pt(text, body_pt) / 2.0,
                y,
                body_pt,
                BuiltinFont::Helvetica,
                body,
                text,
            );
        }
    }
}
