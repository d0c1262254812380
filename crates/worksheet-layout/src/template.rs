//! Layout templates
//!
//! A template is plain data: paper, margins, column structure, spacing,
//! type sizes and color roles. Everything a renderer needs to know about the
//! look of a level lives here; nothing in a template is mutated after load.

use crate::geometry::PageGeometry;
use crate::types::{LayoutError, Result};
use crate::units::{PaperSize, Rgb8};
use serde::{Deserialize, Serialize};

/// Margins around the content area of every page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMargins {
    pub top_mm: f32,
    pub bottom_mm: f32,
    pub left_mm: f32,
    pub right_mm: f32,
}

/// Type sizes in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontTiers {
    /// Brand mark and page labels
    pub header_pt: f32,
    /// Worksheet topic
    pub title_pt: f32,
    /// Problems, student fields and score table
    pub body_pt: f32,
    pub footer_pt: f32,
}

/// Symbolic color roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Header,
    Body,
    Footer,
    TableFill,
}

/// Concrete colors for each role, as `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorRoles {
    pub header: String,
    pub body: String,
    pub footer: String,
    pub table_fill: String,
}

/// One box of the performance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub label: String,
    pub mistakes: String,
}

fn default_score_bands() -> Vec<ScoreBand> {
    [
        ("100%", "(mistakes) 0"),
        ("90%", "\u{2014}"),
        ("80%", "1"),
        ("70%", "\u{2014}"),
        ("69%~", "2~"),
    ]
    .into_iter()
    .map(|(label, mistakes)| ScoreBand {
        label: label.to_string(),
        mistakes: mistakes.to_string(),
    })
    .collect()
}

fn default_brand() -> String {
    "KUMON".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutTemplate {
    /// Identity of the template; levels sharing a name share every other field
    pub name: String,
    pub paper: PaperSize,
    /// 1 or 2
    pub columns: usize,
    pub column_gap_mm: f32,
    /// Height budget of a single problem before spacing
    pub problem_height_mm: f32,
    /// Vertical space between consecutive problems
    pub problem_spacing_mm: f32,
    /// Height reserved for the header block on the first page
    pub header_height_mm: f32,
    pub margins: PageMargins,
    pub fonts: FontTiers,
    pub colors: ColorRoles,
    /// Pad to an even page count so every sheet has a back
    #[serde(default)]
    pub duplex: bool,
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_score_bands")]
    pub score_bands: Vec<ScoreBand>,
}

impl LayoutTemplate {
    /// One column, generous work space (levels 7A through F)
    pub fn elementary() -> Self {
        Self {
            name: "elementary".to_string(),
            paper: PaperSize::Letter,
            columns: 1,
            column_gap_mm: 0.0,
            problem_height_mm: 8.0,
            problem_spacing_mm: 15.24,
            header_height_mm: 45.0,
            margins: PageMargins {
                top_mm: 12.7,
                bottom_mm: 19.05,
                left_mm: 19.05,
                right_mm: 19.05,
            },
            fonts: FontTiers {
                header_pt: 18.0,
                title_pt: 16.0,
                body_pt: 11.0,
                footer_pt: 6.0,
            },
            colors: default_colors(),
            duplex: true,
            footer_text: Some("\u{00A9} 2002 Kumon Institute of Education".to_string()),
            brand: default_brand(),
            score_bands: default_score_bands(),
        }
    }

    /// Two denser columns (levels G through O)
    pub fn advanced() -> Self {
        Self {
            name: "advanced".to_string(),
            columns: 2,
            column_gap_mm: 6.35,
            problem_spacing_mm: 10.16,
            fonts: FontTiers {
                body_pt: 10.0,
                ..Self::elementary().fonts
            },
            ..Self::elementary()
        }
    }

    /// Resolve a symbolic color role
    pub fn color(&self, role: ColorRole) -> Rgb8 {
        let hex = match role {
            ColorRole::Header => &self.colors.header,
            ColorRole::Body => &self.colors.body,
            ColorRole::Footer => &self.colors.footer,
            ColorRole::TableFill => &self.colors.table_fill,
        };
        // validate() rejects unparseable colors, so this only covers hand-built templates
        Rgb8::parse_hex(hex).unwrap_or(Rgb8::BLACK)
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::for_template(self)
    }

    /// Check every field a renderer relies on
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("template name is empty"));
        }
        if !(1..=2).contains(&self.columns) {
            return Err(self.invalid(format!("columns must be 1 or 2, got {}", self.columns)));
        }

        let (page_w, page_h) = self.paper.dimensions_mm();
        let positive = [
            ("page width", page_w),
            ("page height", page_h),
            ("problem_height_mm", self.problem_height_mm),
            ("problem_spacing_mm", self.problem_spacing_mm),
            ("header_height_mm", self.header_height_mm),
            ("margins.top_mm", self.margins.top_mm),
            ("margins.bottom_mm", self.margins.bottom_mm),
            ("margins.left_mm", self.margins.left_mm),
            ("margins.right_mm", self.margins.right_mm),
            ("fonts.header_pt", self.fonts.header_pt),
            ("fonts.title_pt", self.fonts.title_pt),
            ("fonts.body_pt", self.fonts.body_pt),
            ("fonts.footer_pt", self.fonts.footer_pt),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(self.invalid(format!("{field} must be positive, got {value}")));
            }
        }
        if !self.column_gap_mm.is_finite() || self.column_gap_mm < 0.0 {
            return Err(self.invalid("column_gap_mm must not be negative"));
        }
        if self.columns > 1 && self.column_gap_mm == 0.0 {
            return Err(self.invalid("multi-column templates need a positive column_gap_mm"));
        }

        for (role, hex) in [
            ("header", &self.colors.header),
            ("body", &self.colors.body),
            ("footer", &self.colors.footer),
            ("table_fill", &self.colors.table_fill),
        ] {
            if Rgb8::parse_hex(hex).is_none() {
                return Err(self.invalid(format!("color '{role}' is not #RRGGBB: {hex}")));
            }
        }

        let geometry = self.geometry();
        if geometry.content.width <= 0.0 || geometry.content.height <= 0.0 {
            return Err(self.invalid("margins leave no content area"));
        }
        if geometry.column_width_pt <= geometry.number_indent_pt {
            return Err(self.invalid("columns are too narrow for problem text"));
        }
        if geometry.slots_per_column == 0 {
            return Err(self.invalid("a column cannot hold a single problem"));
        }
        if geometry.header_slots >= geometry.slots_per_column {
            return Err(self.invalid("header leaves no room for problems on the first page"));
        }
        let header = geometry.header_layout(self);
        if header.bottom_pt < geometry.header_rect().y {
            return Err(self.invalid(format!(
                "header block needs {:.1}pt but header_height_mm reserves {:.1}pt",
                geometry.content.top() - header.bottom_pt,
                geometry.header_rect().height
            )));
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> LayoutError {
        LayoutError::InvalidTemplate {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

fn default_colors() -> ColorRoles {
    ColorRoles {
        header: "#4B2E83".to_string(),
        body: "#000000".to_string(),
        footer: "#808080".to_string(),
        table_fill: "#E0E0E0".to_string(),
    }
}
