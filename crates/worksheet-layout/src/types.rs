use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("No template registered for level '{0}'")]
    UnknownLevel(String),
    #[error(
        "Problem {problem_index} needs {required_pt:.1}pt but a full column holds {available_pt:.1}pt"
    )]
    LayoutOverflow {
        /// Zero-based index into the input problem sequence
        problem_index: usize,
        required_pt: f32,
        available_pt: f32,
    },
    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },
    #[error("Level '{level}' redefines template '{name}' with different values")]
    TemplateConflict { level: String, name: String },
    #[error("Level '{0}' is registered twice")]
    DuplicateLevel(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

pub fn default_student_fields() -> Vec<String> {
    vec!["Time".to_string(), "Date".to_string(), "Name".to_string()]
}

/// The request handed to the pipeline by its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetSpec {
    pub level: String,
    pub topic: String,
    pub problems: Vec<String>,
    #[serde(default = "default_student_fields")]
    pub student_fields: Vec<String>,
}

impl WorksheetSpec {
    pub fn new(level: impl Into<String>, topic: impl Into<String>, problems: Vec<String>) -> Self {
        Self {
            level: level.into(),
            topic: topic.into(),
            problems,
            student_fields: default_student_fields(),
        }
    }
}

/// What a page is for within the printed worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// First page; carries the header block
    FrontHeader,
    /// Later front side of a sheet
    FrontContinuation,
    /// Reverse side of a sheet
    Back,
}

impl PageRole {
    /// Role of the page at `index` in print order
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => PageRole::FrontHeader,
            i if i % 2 == 1 => PageRole::Back,
            _ => PageRole::FrontContinuation,
        }
    }

    pub fn is_front(self) -> bool {
        !matches!(self, PageRole::Back)
    }

    /// Side suffix used in page labels ("a" front, "b" back)
    pub fn side_suffix(self) -> &'static str {
        if self.is_front() { "a" } else { "b" }
    }
}

/// Content of the header block on the front-header page
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBlock {
    pub level: String,
    pub topic: String,
    pub student_fields: Vec<String>,
}

/// One problem placed on a page
///
/// Offsets are measured downward from the top of the content area so the
/// model stays independent of any particular drawing origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Zero-based index into the input problem sequence
    pub problem_index: usize,
    /// Printed number, 1-based and continuous across columns and pages
    pub number: usize,
    /// Zero-based column
    pub column: usize,
    /// First slot occupied, counted from the top of the column
    pub slot: usize,
    /// Number of consecutive slots occupied
    pub slots: usize,
    pub y_offset_pt: f32,
    pub height_pt: f32,
    /// Source text broken into display lines
    pub lines: Vec<String>,
}

/// One page worth of placed content
#[derive(Debug, Clone, PartialEq)]
pub struct PageModel {
    /// Zero-based position in print order
    pub index: usize,
    pub role: PageRole,
    /// Name of the template the page was laid out with
    pub template: String,
    pub header: Option<HeaderBlock>,
    /// Level/sheet/side label, e.g. "K 1 b"
    pub label: Option<String>,
    pub placements: Vec<Placement>,
}

impl PageModel {
    pub fn new(index: usize, template: &str) -> Self {
        Self {
            index,
            role: PageRole::for_index(index),
            template: template.to_string(),
            header: None,
            label: None,
            placements: Vec::new(),
        }
    }

    /// One-based physical sheet this page is printed on
    pub fn sheet_number(&self) -> usize {
        self.index / 2 + 1
    }

    /// Problem numbers in placement order
    pub fn numbers(&self) -> Vec<usize> {
        self.placements.iter().map(|p| p.number).collect()
    }
}
