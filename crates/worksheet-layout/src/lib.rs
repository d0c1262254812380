//! Templates, page geometry and pagination for printed worksheets

pub mod geometry;
mod input;
pub mod notation;
mod paginate;
mod registry;
mod template;
pub mod text;
mod types;
pub mod units;

pub use geometry::{HeaderLayout, PageGeometry, TextAnchor};
pub use input::{load_problems, parse_problem_lines};
pub use paginate::{measure_problem, paginate, paginate_worksheet};
pub use registry::{ADVANCED_LEVELS, ELEMENTARY_LEVELS, REGISTRY_FORMAT_VERSION, TemplateRegistry};
pub use template::*;
pub use types::*;
pub use units::{Orientation, PaperSize, Rect, Rgb8, mm_to_pt, pt_to_mm};
