//! Form XObjects from source pages
//!
//! A source page becomes a Form XObject in the output document, carrying its
//! own content and resources, and is then drawn into a slot with a single
//! transform.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use worksheet_layout::Rect;

/// Page tree levels searched for inherited attributes
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Look up `key` on a page, falling back to its ancestors in the page tree
pub fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// The page's MediaBox in its own coordinates, origin included
///
/// Falls back to US Letter at the origin when the box is missing or malformed.
pub fn page_box(doc: &Document, page_id: ObjectId) -> Rect {
    let corners: Option<Vec<f32>> = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .filter(|arr| arr.len() == 4)
        .and_then(|arr| arr.iter().map(|item| resolve(doc, item).and_then(extract_number)).collect());

    match corners.as_deref() {
        Some(&[x0, y0, x1, y1]) if x1 != x0 && y1 != y0 => {
            Rect::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
        }
        _ => Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1),
    }
}

/// Source page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let media_box = page_box(doc, page_id);
    (media_box.width, media_box.height)
}

/// Copy a source page into `output` as a Form XObject
///
/// `cache` maps source object ids to ids already copied into `output`; use
/// one cache per source document.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let media_box = page_box(source, page_id);

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(media_box.x),
            Object::Real(media_box.y),
            Object::Real(media_box.right()),
            Object::Real(media_box.top()),
        ]),
    );

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    let content = get_page_content(source, page_dict)?;
    Ok(output.add_object(Stream::new(xobject_dict, content)))
}

/// Decoded content of a page, concatenating content arrays
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    let refs: Vec<ObjectId> = match resolve(doc, contents) {
        Some(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_reference().ok())
            .collect(),
        Some(Object::Stream(_)) => contents.as_reference().into_iter().collect(),
        _ => Vec::new(),
    };

    let mut content = Vec::new();
    for id in refs {
        if let Ok(stream) = doc.get_object(id)?.as_stream() {
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            content.extend_from_slice(&data);
            content.push(b'\n');
        }
    }
    Ok(content)
}

/// Deep copy an object from `source` into `output`, following references
///
/// The output id is reserved before recursing, so reference cycles resolve to
/// the same copy instead of recursing forever.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);
            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(output, source, dict, cache)?)),
        Object::Array(arr) => {
            let items: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(items?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut copy = Dictionary::new();
    for (key, value) in dict.iter() {
        copy.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(copy)
}
