//! Shared constants for worksheet imposition

/// Page size assumed when a source page has no usable MediaBox (US Letter)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

/// Line width for cut guides (points)
pub const CUT_LINE_WIDTH: f32 = 0.5;

/// Dash pattern for cut guides: 6pt dash, 3pt gap
pub const CUT_LINE_DASH: &str = "[6 3] 0 d";

/// Line width for crop marks (points)
pub const CROP_MARK_WIDTH: f32 = 0.25;

/// Length of crop marks (points)
pub const CROP_MARK_LENGTH: f32 = 12.0;

/// Gap between crop mark and content edge (points)
pub const CROP_MARK_GAP: f32 = 3.0;

/// Size of scissors symbol (points)
pub const SCISSORS_SIZE: f32 = 8.0;

/// Control point factor for approximating circles with Bezier curves:
/// 4 * (sqrt(2) - 1) / 3
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552284749831;
