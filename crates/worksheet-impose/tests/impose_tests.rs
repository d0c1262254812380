use lopdf::{Dictionary, Document, Object, Stream};
use worksheet_impose::*;

/// One page per entry of `contents`, US Letter portrait
fn create_pdf(contents: &[String]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.clone().into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(contents.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn create_test_pdf(num_pages: usize) -> Document {
    let contents: Vec<String> = (0..num_pages).map(|_| "q Q".to_string()).collect();
    create_pdf(&contents)
}

/// A two-page worksheet copy whose pages name their copy and side
fn worksheet_copy(copy: usize) -> Document {
    create_pdf(&[
        format!("q Q\n% copy {copy} front"),
        format!("q Q\n% copy {copy} back"),
    ])
}

/// Content of the XObject drawn in `slot` on output page `page_no` (1-based)
fn slot_content(doc: &Document, page_no: u32, slot: usize) -> Option<String> {
    let page_id = *doc.get_pages().get(&page_no)?;
    let page = doc.get_dictionary(page_id).ok()?;
    let resources = page.get(b"Resources").and_then(Object::as_dict).ok()?;
    let xobjects = resources.get(b"XObject").and_then(Object::as_dict).ok()?;
    let id = xobjects
        .get(format!("P{slot}").as_bytes())
        .and_then(Object::as_reference)
        .ok()?;
    let stream = doc.get_object(id).and_then(Object::as_stream).ok()?;
    Some(String::from_utf8_lossy(&stream.content).into_owned())
}

fn page_content(doc: &Document, page_no: u32) -> String {
    let page_id = doc.get_pages()[&page_no];
    let content_id = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Contents")
        .and_then(Object::as_reference)
        .unwrap();
    let stream = doc.get_object(content_id).and_then(Object::as_stream).unwrap();
    String::from_utf8_lossy(&stream.content).into_owned()
}

fn three_copies() -> DuplexStreams {
    DuplexStreams::from_copies((0..3).map(worksheet_copy).collect())
}

#[test]
fn test_from_copies_splits_even_and_odd_pages() {
    let streams = three_copies();
    assert_eq!(streams.fronts().len(), 3);
    assert_eq!(streams.backs().len(), 3);
    assert_eq!(streams.documents().len(), 3);
    assert_eq!(streams.fronts()[1].document, 1);
    assert_eq!(streams.backs()[2].document, 2);
}

#[tokio::test]
async fn test_three_copies_two_up() {
    let imposed = impose(three_copies(), &ImpositionOptions::default())
        .await
        .unwrap();

    assert_eq!(imposed.documents.len(), 1);
    let doc = &imposed.documents[0];
    assert_eq!(doc.get_pages().len(), 4);

    let sides: Vec<SheetSide> = imposed.sheets.iter().map(|s| s.side).collect();
    assert_eq!(
        sides,
        vec![SheetSide::Front, SheetSide::Back, SheetSide::Front, SheetSide::Back]
    );
    assert_eq!(imposed.sheets[0].sources(), vec![Some(0), Some(1)]);
    assert_eq!(imposed.sheets[1].sources(), vec![Some(0), Some(1)]);
    assert_eq!(imposed.sheets[2].sources(), vec![Some(2), None]);
    assert_eq!(imposed.sheets[3].sources(), vec![Some(2), None]);

    // Slot i of a back carries the back of the copy in slot i of its front
    assert!(slot_content(doc, 1, 0).unwrap().contains("copy 0 front"));
    assert!(slot_content(doc, 1, 1).unwrap().contains("copy 1 front"));
    assert!(slot_content(doc, 2, 0).unwrap().contains("copy 0 back"));
    assert!(slot_content(doc, 2, 1).unwrap().contains("copy 1 back"));
    assert!(slot_content(doc, 3, 0).unwrap().contains("copy 2 front"));
    assert!(slot_content(doc, 4, 0).unwrap().contains("copy 2 back"));
    assert!(slot_content(doc, 4, 1).is_none());
}

#[tokio::test]
async fn test_front_and_back_slots_share_rects() {
    let imposed = impose(three_copies(), &ImpositionOptions::default())
        .await
        .unwrap();
    for pair in imposed.sheets.chunks(2) {
        assert_eq!(pair[0].index, pair[1].index);
        assert_eq!(pair[0].slots, pair[1].slots);
    }
}

#[tokio::test]
async fn test_mismatched_streams() {
    let streams = DuplexStreams::new(vec![create_test_pdf(4)], vec![create_test_pdf(3)]);
    let result = impose(streams, &ImpositionOptions::default()).await;
    assert!(matches!(
        result,
        Err(ImposeError::ImpositionMismatch { fronts: 4, backs: 3 })
    ));
}

#[tokio::test]
async fn test_odd_page_copy_is_a_mismatch() {
    let streams = DuplexStreams::from_copies(vec![create_test_pdf(3)]);
    let result = impose(streams, &ImpositionOptions::default()).await;
    assert!(matches!(
        result,
        Err(ImposeError::ImpositionMismatch { fronts: 2, backs: 1 })
    ));
}

#[tokio::test]
async fn test_empty_streams() {
    let streams = DuplexStreams::new(Vec::new(), Vec::new());
    let result = impose(streams, &ImpositionOptions::default()).await;
    assert!(matches!(result, Err(ImposeError::NoPages)));
}

#[tokio::test]
async fn test_two_sided_output() {
    let options = ImpositionOptions {
        output_format: OutputFormat::TwoSided,
        ..ImpositionOptions::default()
    };
    let imposed = impose(three_copies(), &options).await.unwrap();

    assert_eq!(imposed.documents.len(), 2);
    assert_eq!(imposed.documents[0].get_pages().len(), 2);
    assert_eq!(imposed.documents[1].get_pages().len(), 2);
    assert!(slot_content(&imposed.documents[0], 2, 0).unwrap().contains("copy 2 front"));
    assert!(slot_content(&imposed.documents[1], 1, 1).unwrap().contains("copy 1 back"));
}

#[tokio::test]
async fn test_separate_front_and_back_documents() {
    let streams = DuplexStreams::new(
        vec![create_test_pdf(2), create_test_pdf(3)],
        vec![create_test_pdf(5)],
    );
    let options = ImpositionOptions {
        slots_per_sheet: 3,
        ..ImpositionOptions::default()
    };
    let imposed = impose(streams, &options).await.unwrap();
    assert_eq!(imposed.sheets.len(), 4);
    assert_eq!(imposed.sheets[2].sources(), vec![Some(3), Some(4), None]);
}

#[tokio::test]
async fn test_cut_guides_follow_options() {
    let imposed = impose(three_copies(), &ImpositionOptions::default())
        .await
        .unwrap();
    assert!(page_content(&imposed.documents[0], 1).contains(constants::CUT_LINE_DASH));

    let options = ImpositionOptions {
        marks: MarkOptions {
            cut_guides: false,
            crop_marks: false,
        },
        ..ImpositionOptions::default()
    };
    let imposed = impose(three_copies(), &options).await.unwrap();
    assert!(!page_content(&imposed.documents[0], 1).contains(constants::CUT_LINE_DASH));
}

#[test]
fn test_media_box_inherited_from_page_tree() {
    let mut doc = create_test_pdf(1);
    let page_id = doc.get_pages()[&1];
    let pages_id = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Parent")
        .and_then(Object::as_reference)
        .unwrap();

    doc.get_dictionary_mut(page_id).unwrap().remove(b"MediaBox");
    doc.get_dictionary_mut(pages_id).unwrap().set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(300),
            Object::Integer(400),
        ]),
    );

    assert_eq!(render::get_page_dimensions(&doc, page_id), (300.0, 400.0));
}

#[test]
fn test_media_box_with_offset_origin() {
    let mut doc = create_test_pdf(1);
    let page_id = doc.get_pages()[&1];
    doc.get_dictionary_mut(page_id).unwrap().set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(100),
            Object::Integer(50),
            Object::Integer(400),
            Object::Integer(450),
        ]),
    );

    let media_box = render::page_box(&doc, page_id);
    assert_eq!((media_box.x, media_box.y), (100.0, 50.0));
    assert_eq!((media_box.width, media_box.height), (300.0, 400.0));
}

#[test]
fn test_statistics() {
    let stats = calculate_statistics(&three_copies(), &ImpositionOptions::default()).unwrap();
    assert_eq!(stats.copies, 3);
    assert_eq!(stats.sheets, 2);
    assert_eq!(stats.output_pages, 4);
    assert_eq!(stats.empty_slots, 1);
    assert!(stats.scale > 0.0 && stats.scale <= 1.0);
}

#[tokio::test]
async fn test_load_pdf() {
    use tempfile::NamedTempFile;

    let mut doc = create_test_pdf(5);
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), pdf_bytes(&mut doc).unwrap()).unwrap();

    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 5);
}

#[tokio::test]
async fn test_save_two_sided_writes_both_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let options = ImpositionOptions {
        output_format: OutputFormat::TwoSided,
        ..ImpositionOptions::default()
    };
    let imposed = impose(three_copies(), &options).await.unwrap();

    let written = save_imposed(imposed, dir.path().join("class.pdf")).await.unwrap();
    assert_eq!(
        written,
        vec![dir.path().join("class_fronts.pdf"), dir.path().join("class_backs.pdf")]
    );

    let reloaded = load_multiple_pdfs(written.as_slice()).await.unwrap();
    assert_eq!(reloaded[0].get_pages().len(), 2);
    assert_eq!(reloaded[1].get_pages().len(), 2);
}
