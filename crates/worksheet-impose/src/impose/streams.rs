use crate::render::get_page_dimensions;
use lopdf::{Document, ObjectId};

/// A page of one of the loaded source documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePage {
    /// Index into [`DuplexStreams::documents`]
    pub document: usize,
    pub page_id: ObjectId,
}

/// The two page streams of a duplex imposition
///
/// Page `i` of the backs stream is printed behind page `i` of the fronts
/// stream.
#[derive(Debug, Clone, Default)]
pub struct DuplexStreams {
    documents: Vec<Document>,
    fronts: Vec<SourcePage>,
    backs: Vec<SourcePage>,
}

impl DuplexStreams {
    /// Concatenate `fronts` documents into the fronts stream and `backs`
    /// documents into the backs stream
    pub fn new(fronts: Vec<Document>, backs: Vec<Document>) -> Self {
        let mut streams = Self::default();
        for doc in fronts {
            let pages = streams.push_document(doc);
            streams.fronts.extend(pages);
        }
        for doc in backs {
            let pages = streams.push_document(doc);
            streams.backs.extend(pages);
        }
        streams
    }

    /// Split rendered worksheet copies into streams
    ///
    /// Every even page (0-based) of each copy is a front, every odd page the
    /// back printed behind it. Copies are taken in order.
    pub fn from_copies(copies: Vec<Document>) -> Self {
        let mut streams = Self::default();
        for doc in copies {
            for (i, page) in streams.push_document(doc).into_iter().enumerate() {
                if i % 2 == 0 {
                    streams.fronts.push(page);
                } else {
                    streams.backs.push(page);
                }
            }
        }
        streams
    }

    fn push_document(&mut self, doc: Document) -> Vec<SourcePage> {
        let document = self.documents.len();
        let pages = doc
            .get_pages()
            .into_values()
            .map(|page_id| SourcePage { document, page_id })
            .collect();
        self.documents.push(doc);
        pages
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn fronts(&self) -> &[SourcePage] {
        &self.fronts
    }

    pub fn backs(&self) -> &[SourcePage] {
        &self.backs
    }

    pub fn dimensions(&self, page: SourcePage) -> (f32, f32) {
        get_page_dimensions(&self.documents[page.document], page.page_id)
    }

    /// Largest width and largest height over both streams
    ///
    /// Every slot is laid out for this size so all copies share one scale.
    pub fn source_size(&self) -> Option<(f32, f32)> {
        self.fronts
            .iter()
            .chain(&self.backs)
            .map(|&page| self.dimensions(page))
            .reduce(|(w, h), (pw, ph)| (w.max(pw), h.max(ph)))
    }
}
