#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use worksheet_layout::{LayoutTemplate, PageModel, WorksheetSpec, paginate_worksheet};
use worksheet_render::*;

fn worksheet() -> (Vec<PageModel>, LayoutTemplate) {
    let problems = (1..=25).map(|i| format!("{i}/4 + 1/4 =")).collect();
    let spec = WorksheetSpec::new("E", "Fractions", problems);
    let template = LayoutTemplate::elementary();
    let pages = paginate_worksheet(&spec, &template).unwrap();
    (pages, template)
}

/// Write an executable shell script standing in for a TeX compiler
fn fake_compiler(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_typeset_document_is_read_back_and_cleaned_up() {
    let (pages, template) = worksheet();
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    // The stand-in compiler emits a drawn document of the right page count
    let fixture = tools.path().join("fixture.pdf");
    std::fs::write(&fixture, DrawingBackend::render_bytes(&pages, &template).unwrap()).unwrap();
    let program = fake_compiler(
        tools.path(),
        "pdflatex",
        &format!(
            "test -f worksheet.tex || exit 3\ncp '{}' worksheet.pdf",
            fixture.display()
        ),
    );

    let typeset = TypesetBackend::with_program(TexEngine::PdfLatex, &program)
        .scratch_root(scratch.path());
    let vector = typeset.render(&pages, &template).await.unwrap();

    assert_eq!(vector.backend().as_str(), "typeset:pdflatex");
    assert_eq!(vector.page_count(), pages.len());
    assert_eq!(vector.pages().len(), pages.len());
    let drawn = DrawingBackend::new().render(&pages, &template).await.unwrap();
    assert_eq!(vector.page_size_pt(), drawn.page_size_pt());
    assert!(is_empty_dir(scratch.path()));
}

#[tokio::test]
async fn test_compiler_errors_become_render_failures() {
    let (pages, template) = worksheet();
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let program = fake_compiler(
        tools.path(),
        "xelatex",
        "echo 'This is XeTeX'\necho '! Undefined control sequence.'\nexit 1",
    );
    let backend = TypesetBackend::with_program(TexEngine::XeLatex, &program)
        .scratch_root(scratch.path());

    match backend.render(&pages, &template).await {
        Err(BackendError::RenderFailure { backend, reason }) => {
            assert_eq!(backend.as_str(), "typeset:xelatex");
            assert!(reason.contains("Undefined control sequence"));
        }
        other => panic!("Expected RenderFailure, got {other:?}"),
    }
    assert!(is_empty_dir(scratch.path()));

    let silent = fake_compiler(tools.path(), "silent", "exit 0");
    let backend = TypesetBackend::with_program(TexEngine::XeLatex, &silent);
    assert!(matches!(
        backend.render(&pages, &template).await,
        Err(BackendError::RenderFailure { reason, .. }) if reason.contains("no worksheet.pdf")
    ));
}

#[tokio::test]
async fn test_stalled_compiler_is_abandoned_and_cleaned_up() {
    let (pages, template) = worksheet();
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let program = fake_compiler(tools.path(), "tectonic", "sleep 30");
    let renderer = FallbackRenderer::new(
        vec![
            Box::new(
                TypesetBackend::with_program(TexEngine::Tectonic, &program)
                    .scratch_root(scratch.path()),
            ),
            Box::new(DrawingBackend::new()),
        ],
        Duration::from_millis(500),
    );

    let report = renderer.render_with_report(&pages, &template).await.unwrap();
    assert_eq!(report.document.backend().as_str(), DRAWING_BACKEND_ID);
    assert!(matches!(
        &report.failures[0],
        BackendError::RenderFailure { reason, .. } if reason.contains("timed out")
    ));
    assert!(is_empty_dir(scratch.path()));
}
