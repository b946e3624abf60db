use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unsupported input {}: {reason}", path.display())]
    UnsupportedInput { path: PathBuf, reason: String },
    #[error("{0}")]
    EmptyInput(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Page size selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSizePreset {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
    /// Explicit width/height in millimeters (see `ConversionOptions`)
    Custom,
    /// Page sized to the image it carries, one image per page
    Original,
}

impl PageSizePreset {
    /// Fixed dimensions in inches, portrait. `None` for sizes that depend on
    /// user input or on the image.
    pub fn dimensions_in(self) -> Option<(f32, f32)> {
        match self {
            PageSizePreset::A4 => Some((8.27, 11.69)),
            PageSizePreset::A3 => Some((11.69, 16.54)),
            PageSizePreset::Letter => Some((8.5, 11.0)),
            PageSizePreset::Legal => Some((8.5, 14.0)),
            PageSizePreset::Custom | PageSizePreset::Original => None,
        }
    }
}

/// How many images go on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LayoutPreset {
    #[default]
    One,
    /// One column, two rows
    Two,
    /// Two columns, two rows
    Four,
}

impl LayoutPreset {
    /// Grid dimensions as (columns, rows)
    pub fn grid_dimensions(self) -> (usize, usize) {
        match self {
            LayoutPreset::One => (1, 1),
            LayoutPreset::Two => (1, 2),
            LayoutPreset::Four => (2, 2),
        }
    }
}

/// Image scaling behavior inside a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Grow or shrink until one dimension fills the slot
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "fit-page"))]
    FitPage,
    /// Shrink to the slot width, never upscale; may overflow the slot height
    #[cfg_attr(feature = "serde", serde(rename = "fit-width"))]
    FitWidth,
    /// Keep 1px = 1pt unless the image is larger than the slot
    #[cfg_attr(feature = "serde", serde(rename = "original"))]
    OriginalSize,
}

/// Pixel dimensions and resolution of an inspected image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    /// Native resolution in pixels per inch, if the file declares one
    pub dpi: Option<f32>,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, dpi: Option<f32>) -> Self {
        Self { width, height, dpi }
    }
}

/// Result of a finished conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub output_path: PathBuf,
    /// Per-item problems that did not stop the conversion
    pub warnings: Vec<String>,
    pub duration: Duration,
    pub images: usize,
    pub pages: usize,
}

/// Terminal state of a conversion. Cancellation is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Completed(ConversionSummary),
    Cancelled,
}

impl ConversionOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConversionOutcome::Cancelled)
    }
}

/// Page count estimate for a conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionStatistics {
    /// Number of images to place
    pub images: usize,
    /// Full-page capacity
    pub images_per_page: usize,
    /// Output page count
    pub pages: usize,
    /// Images on the final page (less than `images_per_page` when tightened)
    pub last_page_images: usize,
}
