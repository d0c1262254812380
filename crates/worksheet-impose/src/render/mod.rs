//! PDF output for imposition
//!
//! Source pages are copied into the output as Form XObjects and placed into
//! slots with a scale-and-translate transform.

mod sheet;
mod xobject;

pub(crate) use sheet::{CopyCaches, render_sheet};
pub use xobject::{copy_object_deep, create_page_xobject, get_page_dimensions, inherited_attribute, page_box};
