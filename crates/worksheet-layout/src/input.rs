use crate::types::{LayoutError, Result, WorksheetSpec};
use std::path::Path;

impl WorksheetSpec {
    /// Load a worksheet request from JSON
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Load problem strings from a `.csv` (first column) or plain text file (one per line)
pub async fn load_problems(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref().to_owned();
    let contents = tokio::fs::read_to_string(&path).await?;

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Ok(parse_problem_lines(&contents));
    }

    let problems = tokio::task::spawn_blocking(move || {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(contents.as_bytes());
        let mut problems = Vec::new();

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let Some(first) = record.get(0).map(str::trim) else {
                continue;
            };
            if first.is_empty() || (row == 0 && first.eq_ignore_ascii_case("problem")) {
                continue;
            }
            problems.push(first.to_string());
        }
        Ok::<_, LayoutError>(problems)
    })
    .await??;

    Ok(problems)
}

/// Non-empty trimmed lines of `text`
pub fn parse_problem_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
