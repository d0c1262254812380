use crate::types::*;
use serde::{Deserialize, Serialize};
use worksheet_layout::{Orientation, PaperSize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpositionOptions {
    /// Source pages placed side by side on each sheet (k)
    pub slots_per_sheet: usize,
    pub sheet_size: PaperSize,
    pub orientation: Orientation,
    pub sheet_margins: SheetMargins,
    /// Space between neighbouring slots, where the sheet is cut
    pub cut_gap_mm: f32,
    pub marks: MarkOptions,
    pub output_format: OutputFormat,
}

impl Default for ImpositionOptions {
    fn default() -> Self {
        Self {
            slots_per_sheet: 2,
            sheet_size: PaperSize::Letter,
            orientation: Orientation::Landscape,
            sheet_margins: SheetMargins::default(),
            cut_gap_mm: 6.35,
            marks: MarkOptions::default(),
            output_format: OutputFormat::DoubleSided,
        }
    }
}

impl ImpositionOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: ImpositionOptions = serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.slots_per_sheet == 0 {
            return Err(ImposeError::Config(
                "slots_per_sheet must be at least 1".to_string(),
            ));
        }

        if !self.cut_gap_mm.is_finite() || self.cut_gap_mm < 0.0 {
            return Err(ImposeError::Config(
                "cut_gap_mm must not be negative".to_string(),
            ));
        }

        let margins = &self.sheet_margins;
        for (name, value) in [
            ("top", margins.top_mm),
            ("bottom", margins.bottom_mm),
            ("left", margins.left_mm),
            ("right", margins.right_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ImposeError::Config(format!(
                    "{name} sheet margin must not be negative"
                )));
            }
        }

        let (width_mm, height_mm) = self.sheet_size.dimensions_with_orientation(self.orientation);
        let usable_width = width_mm
            - margins.left_mm
            - margins.right_mm
            - (self.slots_per_sheet - 1) as f32 * self.cut_gap_mm;
        let usable_height = height_mm - margins.top_mm - margins.bottom_mm;
        if usable_width <= 0.0 || usable_height <= 0.0 {
            return Err(ImposeError::Config(format!(
                "{} slots with {}mm gaps do not fit on a {:.1}x{:.1}mm sheet",
                self.slots_per_sheet, self.cut_gap_mm, width_mm, height_mm
            )));
        }

        Ok(())
    }
}
