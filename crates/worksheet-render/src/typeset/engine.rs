use crate::types::BackendId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// External TeX compilers, in default priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexEngine {
    Tectonic,
    XeLatex,
    PdfLatex,
}

impl TexEngine {
    pub const ALL: [TexEngine; 3] = [TexEngine::Tectonic, TexEngine::XeLatex, TexEngine::PdfLatex];

    pub fn program(self) -> &'static str {
        match self {
            TexEngine::Tectonic => "tectonic",
            TexEngine::XeLatex => "xelatex",
            TexEngine::PdfLatex => "pdflatex",
        }
    }

    /// Command-line arguments compiling `tex_file` into the working directory
    pub fn args(self, tex_file: &str) -> Vec<String> {
        let args = match self {
            TexEngine::Tectonic => vec!["-X", "compile", tex_file, "--outdir", "."],
            TexEngine::XeLatex | TexEngine::PdfLatex => vec![
                "-interaction=nonstopmode",
                "-halt-on-error",
                "-output-directory=.",
                tex_file,
            ],
        };
        args.into_iter().map(str::to_string).collect()
    }

    pub fn backend_id(self) -> BackendId {
        BackendId::new(format!("typeset:{}", self.program()))
    }
}

/// Directories searched after `PATH`
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".local/bin"));
    }
    dirs.push(PathBuf::from("/usr/local/bin"));
    dirs.push(PathBuf::from("/opt/homebrew/bin"));
    dirs
}

/// Find `program` on `PATH`, then in `search_dirs`
pub fn locate_program(program: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let path_dirs = std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();

    path_dirs
        .iter()
        .chain(search_dirs)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Lines kept from the end of stderr when no TeX error line is found
const DIAGNOSTIC_TAIL_LINES: usize = 5;

/// Condense compiler output into a one-line failure reason
///
/// TeX engines report errors on stdout as lines starting with `!`; tectonic
/// prints `error:` lines on stderr. Without either, the tail of stderr is used.
pub fn compile_diagnostics(stdout: &str, stderr: &str) -> String {
    let errors: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .filter(|line| line.starts_with('!') || line.starts_with("error:"))
        .collect();
    if !errors.is_empty() {
        return errors.join(" | ");
    }

    let tail: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = tail.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    if tail.is_empty() {
        "compiler exited without diagnostics".to_string()
    } else {
        tail[start..].join(" | ")
    }
}
