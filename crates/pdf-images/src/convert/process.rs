//! Decoding, resampling and re-encoding of input images

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use crate::options::ConversionOptions;
use crate::resample::plan_resample;
use crate::types::*;

use super::metadata::read_resolution;

/// Pixel data ready to be written as an image XObject
#[derive(Debug, Clone, PartialEq)]
pub enum RasterData {
    /// Baseline JPEG, embedded as-is with DCTDecode
    Jpeg { data: Vec<u8>, components: u8 },
    /// Zlib-compressed 8-bit samples with an optional separate alpha plane
    Flate {
        data: Vec<u8>,
        components: u8,
        alpha: Option<Vec<u8>>,
    },
}

impl RasterData {
    pub fn components(&self) -> u8 {
        match self {
            RasterData::Jpeg { components, .. } | RasterData::Flate { components, .. } => {
                *components
            }
        }
    }

    /// Encoded size in bytes, alpha plane included
    pub fn len(&self) -> usize {
        match self {
            RasterData::Jpeg { data, .. } => data.len(),
            RasterData::Flate { data, alpha, .. } => {
                data.len() + alpha.as_ref().map_or(0, Vec::len)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An image after orientation, resampling and encoding
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub path: PathBuf,
    /// Pixel width after processing
    pub width: u32,
    /// Pixel height after processing
    pub height: u32,
    /// Resolution declared by the source file
    pub dpi: Option<f32>,
    pub data: RasterData,
}

impl ProcessedImage {
    pub fn source_image(&self) -> SourceImage {
        SourceImage::new(self.width, self.height, self.dpi)
    }
}

/// Read and prepare one image for embedding.
///
/// Files that cannot be read, decoded or re-encoded fail with
/// [`ConvertError::UnsupportedInput`] so callers can skip them.
pub async fn process_image(path: &Path, options: &ConversionOptions) -> Result<ProcessedImage> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| unsupported(path, e))?;

    let path = path.to_path_buf();
    let options = options.clone();
    tokio::task::spawn_blocking(move || process_sync(path, &data, &options)).await?
}

fn process_sync(path: PathBuf, data: &[u8], options: &ConversionOptions) -> Result<ProcessedImage> {
    let dpi = read_resolution(data);
    let (image, format) = decode_oriented(data).map_err(|e| unsupported(&path, e))?;

    let source = SourceImage::new(image.width(), image.height(), dpi);
    let plan = plan_resample(&source, options)?;
    let (width, height) = plan.apply(image.width(), image.height());

    let image = if (width, height) != (image.width(), image.height()) {
        log::debug!(
            "Resampling {} from {}x{} to {}x{}",
            path.display(),
            image.width(),
            image.height(),
            width,
            height
        );
        image.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        image
    };

    let raster = if format == Some(ImageFormat::Png) {
        encode_flate(&image)
    } else {
        encode_jpeg(&image, options.quality)
    }
    .map_err(|e| unsupported(&path, e))?;

    Ok(ProcessedImage {
        path,
        width: image.width(),
        height: image.height(),
        dpi,
        data: raster,
    })
}

/// Decode with EXIF orientation applied
fn decode_oriented(data: &[u8]) -> image::ImageResult<(DynamicImage, Option<ImageFormat>)> {
    let reader = image::ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader.format();

    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);

    Ok((image, format))
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<RasterData> {
    let mut data = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut data, quality);

    let components = if image.color().has_color() {
        let rgb = image.to_rgb8();
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
        3
    } else {
        let gray = image.to_luma8();
        encoder.encode(gray.as_raw(), gray.width(), gray.height(), ExtendedColorType::L8)?;
        1
    };

    Ok(RasterData::Jpeg { data, components })
}

/// Lossless path: color and alpha compressed into separate planes
fn encode_flate(image: &DynamicImage) -> Result<RasterData> {
    let color = image.color();

    if color.has_alpha() {
        let components: usize = if color.has_color() { 3 } else { 1 };
        let pixel_count = image.width() as usize * image.height() as usize;

        let mut color_enc = ZlibEncoder::new(
            Vec::with_capacity(pixel_count * components / 2),
            Compression::default(),
        );
        let mut alpha_enc =
            ZlibEncoder::new(Vec::with_capacity(pixel_count / 2), Compression::default());

        if components == 3 {
            for px in image.to_rgba8().as_raw().chunks_exact(4) {
                color_enc.write_all(&px[..3])?;
                alpha_enc.write_all(&px[3..])?;
            }
        } else {
            for px in image.to_luma_alpha8().as_raw().chunks_exact(2) {
                color_enc.write_all(&px[..1])?;
                alpha_enc.write_all(&px[1..])?;
            }
        }

        return Ok(RasterData::Flate {
            data: color_enc.finish()?,
            components: components as u8,
            alpha: Some(alpha_enc.finish()?),
        });
    }

    let (pixels, components) = if color.has_color() {
        (image.to_rgb8().into_raw(), 3)
    } else {
        (image.to_luma8().into_raw(), 1)
    };

    let mut enc = ZlibEncoder::new(Vec::with_capacity(pixels.len() / 2), Compression::default());
    enc.write_all(&pixels)?;

    Ok(RasterData::Flate {
        data: enc.finish()?,
        components,
        alpha: None,
    })
}

fn unsupported(path: &Path, reason: impl std::fmt::Display) -> ConvertError {
    ConvertError::UnsupportedInput {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
