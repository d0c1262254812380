use super::xobject::{create_page_xobject, page_box};
use crate::impose::{DuplexStreams, SourcePage};
use crate::layout::SlotGeometry;
use crate::marks::generate_marks;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Copies already made from each source document into one output document
pub(crate) struct CopyCaches {
    objects: Vec<HashMap<ObjectId, ObjectId>>,
    xobjects: HashMap<SourcePage, ObjectId>,
}

impl CopyCaches {
    pub(crate) fn new(documents: usize) -> Self {
        Self {
            objects: vec![HashMap::new(); documents],
            xobjects: HashMap::new(),
        }
    }

    fn xobject(&mut self, output: &mut Document, streams: &DuplexStreams, page: SourcePage) -> Result<ObjectId> {
        if let Some(&id) = self.xobjects.get(&page) {
            return Ok(id);
        }
        let source = &streams.documents()[page.document];
        let id = create_page_xobject(output, source, page.page_id, &mut self.objects[page.document])?;
        self.xobjects.insert(page, id);
        Ok(id)
    }
}

/// Render one side of a sheet as a page of `output`
///
/// Each filled slot draws its source page scaled by the geometry's scale.
/// Pages smaller than the slot are centred in it.
pub(crate) fn render_sheet(
    output: &mut Document,
    streams: &DuplexStreams,
    sheet: &ImpositionSheet,
    geometry: &SlotGeometry,
    marks: &MarkOptions,
    parent_pages_id: ObjectId,
    caches: &mut CopyCaches,
) -> Result<ObjectId> {
    let stream = match sheet.side {
        SheetSide::Front => streams.fronts(),
        SheetSide::Back => streams.backs(),
    };

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.sheet_width_pt),
            Object::Real(geometry.sheet_height_pt),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut occupied = Vec::new();

    for placement in &sheet.slots {
        let Some(page) = placement.source.and_then(|idx| stream.get(idx).copied()) else {
            continue;
        };

        let xobject_name = format!("P{}", placement.slot);
        let xobject_id = caches.xobject(output, streams, page)?;
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        let media_box = page_box(&streams.documents()[page.document], page.page_id);
        let s = placement.scale;
        let rect = &placement.rect;
        let dx = (rect.width - s * media_box.width) / 2.0;
        let dy = (rect.height - s * media_box.height) / 2.0;
        content_ops.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            s,
            s,
            rect.x + dx - s * media_box.x,
            rect.y + dy - s * media_box.y,
            xobject_name
        ));
        occupied.push(*rect);
    }

    content_ops.push(generate_marks(marks, geometry, &occupied));

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}
