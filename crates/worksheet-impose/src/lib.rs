pub mod constants;
pub mod impose;
pub mod layout;
mod marks;
mod options;
pub mod render;
mod stats;
mod types;

pub use impose::{
    DuplexStreams, SourcePage, impose, impose_sync, load_multiple_pdfs, load_pdf, pdf_bytes,
    save_imposed, save_pdf,
};
pub use layout::{SlotGeometry, plan_sheets, sheet_count};
pub use marks::generate_marks;
pub use options::*;
pub use stats::calculate_statistics;
pub use types::*;
