use crate::impose::{DuplexStreams, plan_geometry};
use crate::layout::sheet_count;
use crate::options::ImpositionOptions;
use crate::types::*;

/// Calculate statistics for the imposition without rendering it
pub fn calculate_statistics(
    streams: &DuplexStreams,
    options: &ImpositionOptions,
) -> Result<ImpositionStatistics> {
    let geometry = plan_geometry(streams, options)?;
    let copies = streams.fronts().len();
    let sheets = sheet_count(copies, geometry.slots);

    Ok(ImpositionStatistics {
        copies,
        sheets,
        // Front and back of every sheet, whichever way they are split into files
        output_pages: sheets * 2,
        empty_slots: sheets * geometry.slots - copies,
        scale: geometry.scale,
    })
}
