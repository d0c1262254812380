//! Printer's marks for imposed sheets
//!
//! Marks are emitted as raw content stream operators and appended after the
//! placed pages.

use crate::constants::*;
use crate::layout::SlotGeometry;
use crate::types::MarkOptions;
use worksheet_layout::Rect;

/// Content stream operators for the requested marks on one sheet side
///
/// `occupied` holds the rects of filled slots; crop marks are only drawn
/// around those.
pub fn generate_marks(marks: &MarkOptions, geometry: &SlotGeometry, occupied: &[Rect]) -> String {
    let mut ops = String::new();
    if !marks.cut_guides && !marks.crop_marks {
        return ops;
    }

    ops.push_str("q\n");
    ops.push_str("0 0 0 RG\n");

    if marks.cut_guides {
        ops.push_str(&generate_cut_guides(geometry));
    }
    if marks.crop_marks {
        for rect in occupied {
            ops.push_str(&generate_crop_marks(rect));
        }
    }

    ops.push_str("Q\n");
    ops
}

/// Dashed vertical line through the middle of each gap, scissors at the foot
fn generate_cut_guides(geometry: &SlotGeometry) -> String {
    let mut ops = String::new();
    let bottom = geometry.origin_y;
    let top = geometry.origin_y + geometry.slot_height_pt();

    ops.push_str(&format!("{} w\n", CUT_LINE_WIDTH));
    for x in geometry.cut_positions() {
        ops.push_str(&format!("{CUT_LINE_DASH}\n"));
        ops.push_str(&format!("{} {} m {} {} l S\n", x, bottom, x, top));
        ops.push_str("[] 0 d\n");
        ops.push_str(&draw_scissors_vertical(x, bottom - SCISSORS_SIZE - 3.0));
    }
    ops
}

/// L-shaped marks just outside each corner of `rect`
fn generate_crop_marks(rect: &Rect) -> String {
    let mut ops = String::new();
    ops.push_str(&format!("{} w\n", CROP_MARK_WIDTH));

    let corners = [
        (rect.x, rect.y, -1.0, -1.0),
        (rect.right(), rect.y, 1.0, -1.0),
        (rect.x, rect.top(), -1.0, 1.0),
        (rect.right(), rect.top(), 1.0, 1.0),
    ];
    for (x, y, dx, dy) in corners {
        // Horizontal arm
        let h_start = x + dx * CROP_MARK_GAP;
        let h_end = x + dx * (CROP_MARK_GAP + CROP_MARK_LENGTH);
        ops.push_str(&format!("{} {} m {} {} l S\n", h_start, y, h_end, y));
        // Vertical arm
        let v_start = y + dy * CROP_MARK_GAP;
        let v_end = y + dy * (CROP_MARK_GAP + CROP_MARK_LENGTH);
        ops.push_str(&format!("{} {} m {} {} l S\n", x, v_start, x, v_end));
    }
    ops
}

/// Closed circle of radius `r` around (cx, cy) from four Bezier arcs
fn circle(cx: f32, cy: f32, r: f32) -> String {
    let k = r * BEZIER_CIRCLE_FACTOR;
    let mut ops = format!("{} {} m\n", cx + r, cy);
    let arcs = [
        (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
        (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
        (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
        (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
    ];
    for (x1, y1, x2, y2, x3, y3) in arcs {
        ops.push_str(&format!("{} {} {} {} {} {} c\n", x1, y1, x2, y2, x3, y3));
    }
    ops.push_str("S\n");
    ops
}

/// Scissors glyph with blades pointing up along a vertical cut
fn draw_scissors_vertical(x: f32, y: f32) -> String {
    let half = SCISSORS_SIZE / 2.0;
    let r = half * 0.4;
    let (cx1, cy1) = (x - half * 0.5, y + half * 0.3);
    let (cx2, cy2) = (x + half * 0.5, y + half * 0.3);

    let mut ops = String::from("q\n0.3 w\n");
    ops.push_str(&circle(cx1, cy1, r));
    ops.push_str(&circle(cx2, cy2, r));
    ops.push_str(&format!(
        "{} {} m {} {} l S\n",
        cx1 + r * 0.5,
        cy1 + r,
        x + 1.0,
        y + SCISSORS_SIZE
    ));
    ops.push_str(&format!(
        "{} {} m {} {} l S\n",
        cx2 - r * 0.5,
        cy2 + r,
        x - 1.0,
        y + SCISSORS_SIZE
    ));
    ops.push_str("Q\n");
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ImpositionOptions;

    #[test]
    fn test_no_marks_no_ops() {
        let geometry = SlotGeometry::compute(&ImpositionOptions::default(), (612.0, 792.0)).unwrap();
        let marks = MarkOptions {
            cut_guides: false,
            crop_marks: false,
        };
        assert!(generate_marks(&marks, &geometry, &[]).is_empty());
    }

    #[test]
    fn test_one_cut_line_per_gap() {
        let options = ImpositionOptions {
            slots_per_sheet: 3,
            ..ImpositionOptions::default()
        };
        let geometry = SlotGeometry::compute(&options, (612.0, 792.0)).unwrap();
        let ops = generate_marks(&MarkOptions::default(), &geometry, &[]);
        assert_eq!(ops.matches(CUT_LINE_DASH).count(), 2);
    }

    #[test]
    fn test_crop_marks_per_rect() {
        let geometry = SlotGeometry::compute(&ImpositionOptions::default(), (612.0, 792.0)).unwrap();
        let marks = MarkOptions {
            cut_guides: false,
            crop_marks: true,
        };
        let ops = generate_marks(&marks, &geometry, &[geometry.slot_rect(0)]);
        // Two arms at each of four corners
        assert_eq!(ops.matches(" l S").count(), 8);
    }
}
