//! Page geometry resolved from a template
//!
//! Every coordinate a renderer draws at comes from here, in PDF points with
//! the origin at the bottom-left of the page. Backends never compute
//! positions of their own, which is what keeps their output equivalent.

use crate::template::LayoutTemplate;
use crate::text::{HELVETICA_CHAR_WIDTH_RATIO, text_width_pt};
use crate::types::Placement;
use crate::units::{Rect, mm_to_pt};

/// Horizontal space between score-table boxes (points)
pub const SCORE_BOX_GAP_PT: f32 = 4.0;

/// Characters reserved for the problem number, e.g. "(12) "
const NUMBER_LABEL_CHARS: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// Area inside the page margins
    pub content: Rect,
    pub columns: usize,
    pub column_width_pt: f32,
    pub column_gap_pt: f32,
    pub problem_height_pt: f32,
    pub spacing_pt: f32,
    /// `problem_height_pt + spacing_pt`
    pub slot_height_pt: f32,
    pub slots_per_column: usize,
    /// Slots the header block takes from each column of the first page
    pub header_slots: usize,
    /// Width kept for the problem number before the text starts
    pub number_indent_pt: f32,
    pub body_pt: f32,
}

impl PageGeometry {
    pub fn for_template(template: &LayoutTemplate) -> Self {
        let (page_width_mm, page_height_mm) = template.paper.dimensions_mm();
        let page_width_pt = mm_to_pt(page_width_mm);
        let page_height_pt = mm_to_pt(page_height_mm);
        let margins = &template.margins;

        let content = Rect::new(
            mm_to_pt(margins.left_mm),
            mm_to_pt(margins.bottom_mm),
            page_width_pt - mm_to_pt(margins.left_mm) - mm_to_pt(margins.right_mm),
            page_height_pt - mm_to_pt(margins.top_mm) - mm_to_pt(margins.bottom_mm),
        );

        let columns = template.columns.max(1);
        let column_gap_pt = mm_to_pt(template.column_gap_mm);
        let column_width_pt =
            (content.width - (columns - 1) as f32 * column_gap_pt) / columns as f32;

        let problem_height_pt = mm_to_pt(template.problem_height_mm);
        let spacing_pt = mm_to_pt(template.problem_spacing_mm);
        let slot_height_pt = problem_height_pt + spacing_pt;

        let slots_per_column = if slot_height_pt > 0.0 && content.height > 0.0 {
            (content.height / slot_height_pt).floor() as usize
        } else {
            0
        };
        let header_slots = if slot_height_pt > 0.0 {
            (mm_to_pt(template.header_height_mm) / slot_height_pt).ceil() as usize
        } else {
            0
        };

        let body_pt = template.fonts.body_pt;
        Self {
            page_width_pt,
            page_height_pt,
            content,
            columns,
            column_width_pt,
            column_gap_pt,
            problem_height_pt,
            spacing_pt,
            slot_height_pt,
            slots_per_column,
            header_slots,
            number_indent_pt: NUMBER_LABEL_CHARS * body_pt * HELVETICA_CHAR_WIDTH_RATIO,
            body_pt,
        }
    }

    /// Left edge of a column
    pub fn column_x(&self, column: usize) -> f32 {
        self.content.x + column as f32 * (self.column_width_pt + self.column_gap_pt)
    }

    /// Width available to wrapped problem text
    pub fn text_width_pt(&self) -> f32 {
        self.column_width_pt - self.number_indent_pt
    }

    /// Usable height of a column without the header reservation
    pub fn column_capacity_pt(&self) -> f32 {
        self.slots_per_column as f32 * self.slot_height_pt - self.spacing_pt
    }

    /// First free slot in each column of the page at `page_index`
    pub fn first_slot(&self, page_index: usize) -> usize {
        if page_index == 0 { self.header_slots } else { 0 }
    }

    /// Slots a problem of the given estimated height occupies
    pub fn slots_for_height(&self, height_pt: f32) -> usize {
        (((height_pt + self.spacing_pt) / self.slot_height_pt).ceil() as usize).max(1)
    }

    /// Occupied height of `slots` consecutive slots, without trailing spacing
    pub fn slots_height_pt(&self, slots: usize) -> f32 {
        slots as f32 * self.slot_height_pt - self.spacing_pt
    }

    /// Box a placement occupies on the page
    pub fn placement_rect(&self, placement: &Placement) -> Rect {
        let top = self.content.top() - placement.y_offset_pt;
        Rect::new(
            self.column_x(placement.column),
            top - placement.height_pt,
            self.column_width_pt,
            placement.height_pt,
        )
    }

    /// Baseline of the `line`-th text line inside a placement box
    pub fn line_baseline(&self, rect: &Rect, line: usize) -> f32 {
        rect.top() - self.body_pt - line as f32 * self.body_pt * crate::text::LINE_HEIGHT_FACTOR
    }

    /// Area reserved for the header block on the first page
    pub fn header_rect(&self) -> Rect {
        let height = self.header_slots as f32 * self.slot_height_pt;
        Rect::new(
            self.content.x,
            self.content.top() - height,
            self.content.width,
            height,
        )
    }

    /// Baseline of labels drawn in the top margin band (back pages)
    pub fn label_baseline(&self, label_pt: f32) -> (f32, f32) {
        let band = self.page_height_pt - self.content.top();
        (self.content.x, self.content.top() + (band - label_pt) / 2.0)
    }

    /// Centre point of the footer line in the bottom margin band
    pub fn footer_anchor(&self, footer_pt: f32) -> (f32, f32) {
        (
            self.content.center_x(),
            (self.content.y - footer_pt) / 2.0,
        )
    }

    /// Positions of every element of the header block
    pub fn header_layout(&self, template: &LayoutTemplate) -> HeaderLayout {
        let fonts = &template.fonts;
        let top = self.content.top();
        let left = self.content.x;

        let label_pt = fonts.header_pt * 0.75;
        let brand = TextAnchor::new(left, top - fonts.header_pt, fonts.header_pt);
        let label = TextAnchor::new(left, brand.y - label_pt * 1.3, label_pt);

        let title_width = text_width_pt(&template.name, fonts.title_pt);
        let title = TextAnchor::new(
            self.content.center_x() - title_width / 2.0,
            top - fonts.title_pt,
            fonts.title_pt,
        );

        let fields_y = label.y - fonts.body_pt * 2.2;
        let score_top = fields_y - fonts.body_pt * 1.5;
        let score_height = fonts.body_pt * 3.2;
        let band_count = template.score_bands.len().max(1) as f32;
        let score_width =
            (self.content.width - (band_count - 1.0) * SCORE_BOX_GAP_PT) / band_count;
        let score_boxes = (0..template.score_bands.len())
            .map(|i| {
                Rect::new(
                    left + i as f32 * (score_width + SCORE_BOX_GAP_PT),
                    score_top - score_height,
                    score_width,
                    score_height,
                )
            })
            .collect();

        HeaderLayout {
            brand,
            label,
            title,
            fields_baseline: fields_y,
            fields_left: left,
            fields_width: self.content.width,
            score_boxes,
            bottom_pt: score_top - score_height,
        }
    }

    /// Baselines of the band label and the mistakes line inside a score box
    pub fn score_baselines(&self, cell: &Rect) -> (f32, f32) {
        (cell.top() - self.body_pt * 1.2, cell.y + self.body_pt * 0.6)
    }

    /// Cells for student fields: (label anchor, underline start, underline end)
    pub fn student_field_cells(
        &self,
        header: &HeaderLayout,
        fields: &[String],
    ) -> Vec<(TextAnchor, f32, f32)> {
        if fields.is_empty() {
            return Vec::new();
        }
        let cell_width = header.fields_width / fields.len() as f32;
        fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let x = header.fields_left + i as f32 * cell_width;
                let label = format!("{field}:");
                let rule_start = x + text_width_pt(&label, self.body_pt) + self.body_pt * 0.5;
                let rule_end = x + cell_width - self.body_pt;
                (
                    TextAnchor::new(x, header.fields_baseline, self.body_pt),
                    rule_start,
                    rule_end.max(rule_start),
                )
            })
            .collect()
    }
}

/// Baseline origin and size of a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnchor {
    pub x: f32,
    pub y: f32,
    pub size_pt: f32,
}

impl TextAnchor {
    pub fn new(x: f32, y: f32, size_pt: f32) -> Self {
        Self { x, y, size_pt }
    }
}

/// Resolved header block positions
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    pub brand: TextAnchor,
    /// Page label under the brand ("K 1 a")
    pub label: TextAnchor,
    /// Topic title; `x` is computed for the template name and re-centred per topic
    pub title: TextAnchor,
    pub fields_baseline: f32,
    pub fields_left: f32,
    pub fields_width: f32,
    pub score_boxes: Vec<Rect>,
    /// Lowest y the header draws at
    pub bottom_pt: f32,
}

impl HeaderLayout {
    /// Left x that centres `text` across the content width
    pub fn centred_x(&self, text: &str) -> f32 {
        self.fields_left + (self.fields_width - text_width_pt(text, self.title.size_pt)) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elementary_capacity() {
        let geometry = LayoutTemplate::elementary().geometry();
        assert_eq!(geometry.columns, 1);
        assert_eq!(geometry.slots_per_column, 10);
        assert_eq!(geometry.header_slots, 2);
    }

    #[test]
    fn test_advanced_columns_do_not_overlap() {
        let geometry = LayoutTemplate::advanced().geometry();
        assert_eq!(geometry.columns, 2);
        let first_right = geometry.column_x(0) + geometry.column_width_pt;
        assert!(first_right < geometry.column_x(1));
        let second_right = geometry.column_x(1) + geometry.column_width_pt;
        assert!((second_right - geometry.content.right()).abs() < 0.01);
    }

    #[test]
    fn test_header_fits_reserved_area() {
        for template in [LayoutTemplate::elementary(), LayoutTemplate::advanced()] {
            let geometry = template.geometry();
            let header = geometry.header_layout(&template);
            assert!(header.bottom_pt >= geometry.header_rect().y);
            assert_eq!(header.score_boxes.len(), template.score_bands.len());
        }
    }
}
