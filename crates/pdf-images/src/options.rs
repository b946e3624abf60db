use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resolution used to size "Original" pages when neither the options nor the
/// image provide one
pub const ORIGINAL_PAGE_FALLBACK_DPI: f32 = 300.0;

/// Resolution used to measure an image's physical size for resampling when
/// neither the image nor the options provide one
pub const RESAMPLE_FALLBACK_DPI: f32 = 72.0;

/// Complete conversion configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionOptions {
    // Resolution
    /// Resolution assumed for images that do not declare one
    pub source_dpi: Option<f32>,
    /// Resolution to downsample to; no resampling when unset
    pub target_dpi: Option<f32>,

    /// JPEG quality (1-100)
    pub quality: u8,

    // Page
    pub page_size: PageSizePreset,
    pub page_layout: LayoutPreset,
    pub custom_width_mm: Option<f32>,
    pub custom_height_mm: Option<f32>,
    /// Page margin in inches
    pub margin_in: f32,
    pub scaling: ScalingMode,

    /// Write document info (title, producer, creation date)
    pub preserve_metadata: bool,
    pub output_path: Option<PathBuf>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            source_dpi: None,
            target_dpi: None,
            quality: 85,
            page_size: PageSizePreset::A4,
            page_layout: LayoutPreset::One,
            custom_width_mm: None,
            custom_height_mm: None,
            margin_in: 0.25,
            scaling: ScalingMode::FitPage,
            preserve_metadata: true,
            output_path: None,
        }
    }
}

impl ConversionOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ConvertError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConvertError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.margin_in.is_finite() {
            return Err(ConvertError::Config(format!(
                "Margin must be a finite number, got {}",
                self.margin_in
            )));
        }

        if !(1..=100).contains(&self.quality) {
            return Err(ConvertError::Config(format!(
                "Quality must be between 1 and 100, got {}",
                self.quality
            )));
        }

        for (name, dpi) in [("Source", self.source_dpi), ("Target", self.target_dpi)] {
            if let Some(dpi) = dpi {
                if !dpi.is_finite() || dpi <= 0.0 {
                    return Err(ConvertError::Config(format!(
                        "{} DPI must be a positive number, got {}",
                        name, dpi
                    )));
                }
            }
        }

        if self.page_size == PageSizePreset::Custom {
            for (name, mm) in [
                ("width", self.custom_width_mm),
                ("height", self.custom_height_mm),
            ] {
                if let Some(mm) = mm {
                    if !mm.is_finite() || mm <= 0.0 {
                        return Err(ConvertError::Config(format!(
                            "Custom page {} must be a positive number of millimeters, got {}",
                            name, mm
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Images per page: one for "Original" pages, else the grid capacity
    pub fn page_capacity(&self) -> usize {
        match self.page_size {
            PageSizePreset::Original => 1,
            _ => {
                let (cols, rows) = self.page_layout.grid_dimensions();
                cols * rows
            }
        }
    }

    /// Resolution used to size an "Original" page for `image`
    pub fn page_resolution(&self, image: &SourceImage) -> f32 {
        self.target_dpi
            .or(image.dpi)
            .or(self.source_dpi)
            .unwrap_or(ORIGINAL_PAGE_FALLBACK_DPI)
    }

    /// Resolution used to measure `image` before deciding to resample
    pub fn measure_resolution(&self, image: &SourceImage) -> f32 {
        image
            .dpi
            .or(self.source_dpi)
            .unwrap_or(RESAMPLE_FALLBACK_DPI)
    }
}
