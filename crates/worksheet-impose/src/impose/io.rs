//! Document I/O operations for imposition

use crate::types::*;
use lopdf::Document;
use std::path::{Path, PathBuf};

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Load multiple PDF documents
pub async fn load_multiple_pdfs(paths: &[impl AsRef<Path>]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.push(load_pdf(path).await?);
    }
    Ok(documents)
}

/// Serialize a document
pub fn pdf_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Save one output document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || pdf_bytes(&mut doc)).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Save every document of an imposition, returning the written paths
///
/// A single document goes to `path`. Fronts and backs go to `<stem>_fronts.pdf`
/// and `<stem>_backs.pdf` next to it.
pub async fn save_imposed(imposed: ImposedDocument, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let targets = match imposed.documents.len() {
        1 => vec![path.to_path_buf()],
        2 => vec![suffixed(path, "fronts"), suffixed(path, "backs")],
        n => (1..=n).map(|i| suffixed(path, &i.to_string())).collect(),
    };

    for (doc, target) in imposed.documents.into_iter().zip(&targets) {
        save_pdf(doc, target).await?;
        log::info!("Wrote {}", target.display());
    }
    Ok(targets)
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "imposed".to_string());
    path.with_file_name(format!("{stem}_{suffix}.pdf"))
}
