//! Flow problems onto pages
//!
//! Every page is a grid of `columns × slots_per_column` slots. Problems take
//! one or more consecutive slots in input order, filling a column top to
//! bottom before moving to the next column and then the next page. The first
//! page loses `header_slots` from the top of each column to the header block.

use crate::geometry::PageGeometry;
use crate::template::LayoutTemplate;
use crate::text::{lines_height_pt, wrap_text};
use crate::types::{HeaderBlock, LayoutError, PageModel, PageRole, Placement, Result, WorksheetSpec};

/// Estimated height of a problem and its display lines
pub fn measure_problem(text: &str, geometry: &PageGeometry) -> (Vec<String>, f32) {
    let lines = wrap_text(text, geometry.text_width_pt(), geometry.body_pt);
    let height = lines_height_pt(lines.len(), geometry.body_pt);
    (lines, height)
}

/// Lay out `problems` with `template`
///
/// Deterministic: the output depends on nothing but the arguments. Fails with
/// [`LayoutError::LayoutOverflow`] when a problem is taller than a full
/// column; problems are never shrunk or overlapped.
pub fn paginate<S: AsRef<str>>(problems: &[S], template: &LayoutTemplate) -> Result<Vec<PageModel>> {
    let geometry = template.geometry();
    let mut pages = vec![PageModel::new(0, &template.name)];

    let mut column = 0;
    let mut slot = geometry.first_slot(0);

    for (problem_index, problem) in problems.iter().enumerate() {
        let (lines, estimate) = measure_problem(problem.as_ref(), &geometry);
        let slots = geometry.slots_for_height(estimate);
        if slots > geometry.slots_per_column {
            return Err(LayoutError::LayoutOverflow {
                problem_index,
                required_pt: estimate,
                available_pt: geometry.column_capacity_pt(),
            });
        }

        // Header page columns are shorter, so a tall problem may skip several
        while slot + slots > geometry.slots_per_column {
            column += 1;
            if column >= geometry.columns {
                pages.push(PageModel::new(pages.len(), &template.name));
                column = 0;
            }
            slot = geometry.first_slot(pages.len() - 1);
        }

        let page_index = pages.len() - 1;
        pages[page_index].placements.push(Placement {
            problem_index,
            number: problem_index + 1,
            column,
            slot,
            slots,
            y_offset_pt: slot as f32 * geometry.slot_height_pt,
            height_pt: geometry.slots_height_pt(slots),
            lines,
        });
        slot += slots;
    }

    if template.duplex && pages.len() % 2 == 1 {
        pages.push(PageModel::new(pages.len(), &template.name));
    }

    log::debug!(
        "Paginated {} problems onto {} pages with template '{}'",
        problems.len(),
        pages.len(),
        template.name
    );
    Ok(pages)
}

/// Paginate a worksheet and attach its header block and page labels
pub fn paginate_worksheet(spec: &WorksheetSpec, template: &LayoutTemplate) -> Result<Vec<PageModel>> {
    let mut pages = paginate(&spec.problems, template)?;
    let level = spec.level.trim().to_uppercase();

    for page in &mut pages {
        page.label = Some(format!(
            "{} {} {}",
            level,
            page.sheet_number(),
            page.role.side_suffix()
        ));
        if page.role == PageRole::FrontHeader {
            page.header = Some(HeaderBlock {
                level: level.clone(),
                topic: spec.topic.clone(),
                student_fields: spec.student_fields.clone(),
            });
        }
    }
    Ok(pages)
}
