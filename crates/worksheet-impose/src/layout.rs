//! Slot geometry and front/back pairing
//!
//! Everything here is pure arithmetic; rendering happens in [`crate::render`].

use crate::options::ImpositionOptions;
use crate::types::*;
use worksheet_layout::{Rect, mm_to_pt};

/// Slot layout shared by every sheet of one imposition
#[derive(Debug, Clone, PartialEq)]
pub struct SlotGeometry {
    pub sheet_width_pt: f32,
    pub sheet_height_pt: f32,
    /// Size every slot is laid out for (the largest source page)
    pub source_width_pt: f32,
    pub source_height_pt: f32,
    pub slots: usize,
    pub scale: f32,
    pub gap_pt: f32,
    /// Left edge of slot 0
    pub origin_x: f32,
    /// Bottom edge of every slot
    pub origin_y: f32,
}

impl SlotGeometry {
    /// Fit `slots` pages of `source_size` side by side on the configured sheet
    ///
    /// The scale is the smallest of the width bound, the height bound and 1.0.
    pub fn compute(options: &ImpositionOptions, source_size: (f32, f32)) -> Result<Self> {
        let (source_width_pt, source_height_pt) = source_size;
        if source_width_pt <= 0.0 || source_height_pt <= 0.0 {
            return Err(ImposeError::Config(format!(
                "source page size {source_width_pt}x{source_height_pt}pt is not positive"
            )));
        }

        let (sheet_width_pt, sheet_height_pt) = options.sheet_size.dimensions_pt(options.orientation);
        let margins = &options.sheet_margins;
        let usable = Rect::new(
            mm_to_pt(margins.left_mm),
            mm_to_pt(margins.bottom_mm),
            sheet_width_pt - mm_to_pt(margins.left_mm) - mm_to_pt(margins.right_mm),
            sheet_height_pt - mm_to_pt(margins.top_mm) - mm_to_pt(margins.bottom_mm),
        );

        let k = options.slots_per_sheet.max(1);
        let gap_pt = mm_to_pt(options.cut_gap_mm);
        let width_bound = (usable.width - (k - 1) as f32 * gap_pt) / (k as f32 * source_width_pt);
        let height_bound = usable.height / source_height_pt;
        let scale = width_bound.min(height_bound).min(1.0);
        if scale.is_nan() || scale <= 0.0 {
            return Err(ImposeError::Config(format!(
                "{k} pages do not fit on the sheet inside its margins"
            )));
        }

        Ok(Self {
            sheet_width_pt,
            sheet_height_pt,
            source_width_pt,
            source_height_pt,
            slots: k,
            scale,
            gap_pt,
            origin_x: usable.x,
            origin_y: usable.y + (usable.height - scale * source_height_pt) / 2.0,
        })
    }

    pub fn slot_width_pt(&self) -> f32 {
        self.scale * self.source_width_pt
    }

    pub fn slot_height_pt(&self) -> f32 {
        self.scale * self.source_height_pt
    }

    /// Area of slot `slot` on the sheet
    pub fn slot_rect(&self, slot: usize) -> Rect {
        Rect::new(
            self.origin_x + slot as f32 * (self.slot_width_pt() + self.gap_pt),
            self.origin_y,
            self.slot_width_pt(),
            self.slot_height_pt(),
        )
    }

    /// x of the cut line in the middle of each gap
    pub fn cut_positions(&self) -> Vec<f32> {
        (1..self.slots)
            .map(|slot| self.slot_rect(slot).x - self.gap_pt / 2.0)
            .collect()
    }
}

/// Sheets needed for `pages` pages at `slots_per_sheet` per sheet
pub fn sheet_count(pages: usize, slots_per_sheet: usize) -> usize {
    pages.div_ceil(slots_per_sheet.max(1))
}

/// Pair a fronts stream with a backs stream
///
/// Front sheet `s` holds front pages `s*k .. s*k+k` left to right; back
/// sheet `s` holds the back pages with the same indices in the same slot
/// order, so slot `i` of both sides always carries the same copy. Sheets are
/// returned in print order: front, back, front, back.
pub fn plan_sheets(fronts: usize, backs: usize, geometry: &SlotGeometry) -> Result<Vec<ImpositionSheet>> {
    if fronts != backs {
        return Err(ImposeError::ImpositionMismatch { fronts, backs });
    }
    if fronts == 0 {
        return Err(ImposeError::NoPages);
    }

    let k = geometry.slots;
    let side = |index: usize, side: SheetSide| ImpositionSheet {
        index,
        side,
        slots: (0..k)
            .map(|slot| {
                let source = index * k + slot;
                SlotPlacement {
                    slot,
                    source: (source < fronts).then_some(source),
                    rect: geometry.slot_rect(slot),
                    scale: geometry.scale,
                }
            })
            .collect(),
    };

    Ok((0..sheet_count(fronts, k))
        .flat_map(|index| [side(index, SheetSide::Front), side(index, SheetSide::Back)])
        .collect())
}
