//! Render laid-out worksheets to PDF through an ordered chain of backends

mod backend;
mod config;
pub mod drawing;
mod fallback;
pub mod typeset;
mod types;

pub use backend::RenderBackend;
pub use config::{BackendKind, RenderConfig};
pub use drawing::{DRAWING_BACKEND_ID, DrawingBackend};
pub use fallback::{FallbackRenderer, RenderReport};
pub use typeset::{TexEngine, TypesetBackend};
pub use types::*;
