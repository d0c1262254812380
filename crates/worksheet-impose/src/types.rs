use serde::{Deserialize, Serialize};
use thiserror::Error;
use worksheet_layout::Rect;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("Front stream has {fronts} pages but back stream has {backs}")]
    ImpositionMismatch { fronts: usize, backs: usize },
    #[error("No pages to impose")]
    NoPages,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Which side of a physical sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetSide {
    Front,
    Back,
}

/// Sheet margins - printer-safe area around the whole output sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetMargins {
    pub top_mm: f32,
    pub bottom_mm: f32,
    pub left_mm: f32,
    pub right_mm: f32,
}

impl Default for SheetMargins {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

impl SheetMargins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_mm: f32) -> Self {
        Self {
            top_mm: margin_mm,
            bottom_mm: margin_mm,
            left_mm: margin_mm,
            right_mm: margin_mm,
        }
    }
}

/// Printer's marks options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkOptions {
    /// Dashed line down the middle of each gap, with a scissors glyph
    pub cut_guides: bool,
    /// L-shaped marks at the corners of every placed page
    pub crop_marks: bool,
}

impl Default for MarkOptions {
    fn default() -> Self {
        Self {
            cut_guides: true,
            crop_marks: false,
        }
    }
}

/// Output PDF format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Single PDF with front and back sheets interleaved
    #[default]
    DoubleSided,
    /// Two separate PDFs (fronts and backs)
    TwoSided,
}

/// One slot of an imposition sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlacement {
    /// Zero-based position, left to right
    pub slot: usize,
    /// Index into the side's stream; `None` leaves the slot blank
    pub source: Option<usize>,
    /// Area the scaled page occupies, in sheet points
    pub rect: Rect,
    pub scale: f32,
}

/// A target page combining up to k source pages
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionSheet {
    /// Zero-based sheet number; a front and its back share it
    pub index: usize,
    pub side: SheetSide,
    pub slots: Vec<SlotPlacement>,
}

impl ImpositionSheet {
    /// Stream indices in slot order
    pub fn sources(&self) -> Vec<Option<usize>> {
        self.slots.iter().map(|slot| slot.source).collect()
    }
}

/// Rendered imposition output
#[derive(Debug, Clone)]
pub struct ImposedDocument {
    /// One document for `DoubleSided`, fronts then backs for `TwoSided`
    pub documents: Vec<lopdf::Document>,
    /// Sheets in print order: front 1, back 1, front 2, back 2, ...
    pub sheets: Vec<ImpositionSheet>,
}

/// Statistics about the imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Pages in each stream (fronts and backs are equal)
    pub copies: usize,
    /// Physical sheets printed on both sides
    pub sheets: usize,
    /// Output page count across all output documents
    pub output_pages: usize,
    /// Blank slots on the last sheet, per side
    pub empty_slots: usize,
    pub scale: f32,
}
