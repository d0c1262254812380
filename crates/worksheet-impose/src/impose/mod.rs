//! Duplex imposition of worksheet copies
//!
//! Places k copies side by side on each sheet:
//! 1. Split the source pages into a fronts and a backs stream
//! 2. Fit k slots of the largest source page onto the sheet
//! 3. Pair front sheet `s` with back sheet `s`, slot for slot
//! 4. Render each side as an output page with cut guides

mod io;
mod streams;

pub use io::{load_multiple_pdfs, load_pdf, pdf_bytes, save_imposed, save_pdf};
pub use streams::{DuplexStreams, SourcePage};

use crate::layout::{SlotGeometry, plan_sheets};
use crate::options::ImpositionOptions;
use crate::render::{CopyCaches, render_sheet};
use crate::types::*;
use lopdf::{Dictionary, Document, Object};

/// Main imposition function
pub async fn impose(streams: DuplexStreams, options: &ImpositionOptions) -> Result<ImposedDocument> {
    options.validate()?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || impose_sync(&streams, &options)).await?
}

/// Blocking variant of [`impose`]
pub fn impose_sync(streams: &DuplexStreams, options: &ImpositionOptions) -> Result<ImposedDocument> {
    let geometry = plan_geometry(streams, options)?;
    let sheets = plan_sheets(streams.fronts().len(), streams.backs().len(), &geometry)?;

    let documents = match options.output_format {
        OutputFormat::DoubleSided => {
            let all: Vec<&ImpositionSheet> = sheets.iter().collect();
            vec![build_document(streams, &all, &geometry, options)?]
        }
        OutputFormat::TwoSided => {
            let (fronts, backs): (Vec<&ImpositionSheet>, Vec<&ImpositionSheet>) =
                sheets.iter().partition(|sheet| sheet.side == SheetSide::Front);
            vec![
                build_document(streams, &fronts, &geometry, options)?,
                build_document(streams, &backs, &geometry, options)?,
            ]
        }
    };

    log::info!(
        "Imposed {} copies {}-up onto {} sheets at scale {:.3}",
        streams.fronts().len(),
        geometry.slots,
        sheets.len() / 2,
        geometry.scale
    );

    Ok(ImposedDocument { documents, sheets })
}

/// Validate the streams and lay out the slots
pub(crate) fn plan_geometry(streams: &DuplexStreams, options: &ImpositionOptions) -> Result<SlotGeometry> {
    options.validate()?;
    let (fronts, backs) = (streams.fronts().len(), streams.backs().len());
    if fronts != backs {
        return Err(ImposeError::ImpositionMismatch { fronts, backs });
    }
    let source_size = streams.source_size().ok_or(ImposeError::NoPages)?;
    SlotGeometry::compute(options, source_size)
}

fn build_document(
    streams: &DuplexStreams,
    sheets: &[&ImpositionSheet],
    geometry: &SlotGeometry,
    options: &ImpositionOptions,
) -> Result<Document> {
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut caches = CopyCaches::new(streams.documents().len());

    let mut page_refs = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let page_id = render_sheet(
            &mut output,
            streams,
            sheet,
            geometry,
            &options.marks,
            pages_tree_id,
            &mut caches,
        )?;
        page_refs.push(Object::Reference(page_id));
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    Ok(output)
}
