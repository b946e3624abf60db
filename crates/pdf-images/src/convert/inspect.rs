//! Input file inspection

use image::ImageDecoder;
use image::metadata::Orientation;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::types::SourceImage;

use super::metadata::read_resolution;

/// File extensions accepted as input
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpeg", "jpg", "png", "webp", "heic", "heif", "tiff", "tif", "bmp",
];

/// What is known about an input file before conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFileInfo {
    pub path: PathBuf,
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Detected format, or the extension when the content is unreadable
    pub format: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dpi: Option<f32>,
    pub supported: bool,
    /// The file can be listed but will probably be skipped
    pub warning: Option<String>,
    /// The file could not be read at all
    pub error: Option<String>,
}

impl ImageFileInfo {
    /// Dimensions and resolution, when the header was readable
    pub fn source_image(&self) -> Option<SourceImage> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(SourceImage::new(width, height, self.dpi)),
            _ => None,
        }
    }
}

/// Lowercase extension of `path`, empty when there is none
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Whether `path` has a supported image extension
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}

/// Inspect each file in order
pub async fn inspect_files(paths: &[PathBuf]) -> Vec<ImageFileInfo> {
    let mut infos = Vec::with_capacity(paths.len());
    for path in paths {
        infos.push(inspect_file(path).await);
    }
    infos
}

async fn inspect_file(path: &Path) -> ImageFileInfo {
    let ext = extension(path);
    let mut info = ImageFileInfo {
        path: path.to_path_buf(),
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: 0,
        format: if ext.is_empty() {
            "unknown".to_string()
        } else {
            ext.clone()
        },
        width: None,
        height: None,
        dpi: None,
        supported: false,
        warning: None,
        error: None,
    };

    match tokio::fs::metadata(path).await {
        Ok(metadata) => info.size = metadata.len(),
        Err(e) => {
            info.error = Some(e.to_string());
            return info;
        }
    }

    info.supported = is_supported(path);
    if !info.supported {
        info.warning = Some("Unsupported image format".to_string());
        return info;
    }

    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) => {
            info.error = Some(e.to_string());
            return info;
        }
    };

    match tokio::task::spawn_blocking(move || probe(&data)).await {
        Ok(Ok(probed)) => {
            info.format = probed.format;
            info.width = Some(probed.width);
            info.height = Some(probed.height);
            info.dpi = probed.dpi;
        }
        Ok(Err(e)) => info.warning = Some(e.to_string()),
        Err(e) => info.warning = Some(e.to_string()),
    }

    info
}

struct Probe {
    format: String,
    width: u32,
    height: u32,
    dpi: Option<f32>,
}

/// Read the header only; dimensions are reported after EXIF orientation
fn probe(data: &[u8]) -> image::ImageResult<Probe> {
    let reader = image::ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader
        .format()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("unknown")
        .to_string();

    let mut decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();
    let (width, height) = if swaps_axes(decoder.orientation()?) {
        (height, width)
    } else {
        (width, height)
    };

    Ok(Probe {
        format,
        width,
        height,
        dpi: read_resolution(data),
    })
}

fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}
