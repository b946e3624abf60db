//! Page size resolution

use crate::options::ConversionOptions;
use crate::types::{ConvertError, PageSizePreset, Result, SourceImage};
use crate::units::{check_resolution, in_to_pt, mm_to_in, px_to_in};

use super::Size;

/// A4 portrait in inches, used for missing custom dimensions
const DEFAULT_CUSTOM_SIZE_IN: (f32, f32) = (8.27, 11.69);

/// Resolve a page size selection to points.
///
/// # Arguments
/// * `preset` - The selected page size
/// * `custom_width_mm` / `custom_height_mm` - Dimensions for `Custom`; a
///   missing dimension falls back to A4
/// * `image_px` - (width, height) in pixels of the image on the page, required
///   for `Original`
/// * `resolution` - Pixels per inch used to size `Original` pages
pub fn resolve_page_size(
    preset: PageSizePreset,
    custom_width_mm: Option<f32>,
    custom_height_mm: Option<f32>,
    image_px: Option<(u32, u32)>,
    resolution: Option<f32>,
) -> Result<Size> {
    let (width_in, height_in) = match preset {
        PageSizePreset::Custom => (
            custom_dimension_in(custom_width_mm, DEFAULT_CUSTOM_SIZE_IN.0, "width")?,
            custom_dimension_in(custom_height_mm, DEFAULT_CUSTOM_SIZE_IN.1, "height")?,
        ),
        PageSizePreset::Original => {
            let (width_px, height_px) = image_px.ok_or_else(|| {
                ConvertError::Config("Original page size requires image dimensions".to_string())
            })?;
            let ppi = resolution.ok_or_else(|| {
                ConvertError::Config("Original page size requires a resolution".to_string())
            })?;
            let ppi = check_resolution(ppi)?;
            (px_to_in(width_px, ppi)?, px_to_in(height_px, ppi)?)
        }
        fixed => fixed.dimensions_in().unwrap_or(DEFAULT_CUSTOM_SIZE_IN),
    };

    Ok(Size::new(in_to_pt(width_in), in_to_pt(height_in)))
}

/// Page size for the page carrying `image`, per the options
pub fn page_size_for(options: &ConversionOptions, image: &SourceImage) -> Result<Size> {
    resolve_page_size(
        options.page_size,
        options.custom_width_mm,
        options.custom_height_mm,
        Some((image.width, image.height)),
        Some(options.page_resolution(image)),
    )
}

/// Page size for presets that do not depend on the image
pub fn fixed_page_size(options: &ConversionOptions) -> Result<Size> {
    resolve_page_size(
        options.page_size,
        options.custom_width_mm,
        options.custom_height_mm,
        None,
        None,
    )
}

fn custom_dimension_in(mm: Option<f32>, default_in: f32, name: &str) -> Result<f32> {
    match mm {
        None => Ok(default_in),
        Some(mm) if mm.is_finite() && mm > 0.0 => Ok(mm_to_in(mm)),
        Some(mm) => Err(ConvertError::Config(format!(
            "Custom page {} must be a positive number of millimeters, got {}",
            name, mm
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_size(size: Size, width: f32, height: f32) {
        assert!(
            (size.width - width).abs() < 0.01 && (size.height - height).abs() < 0.01,
            "expected {}x{}, got {}x{}",
            width,
            height,
            size.width,
            size.height
        );
    }

    #[test]
    fn test_preset_sizes() {
        let a4 = resolve_page_size(PageSizePreset::A4, None, None, None, None).unwrap();
        assert_size(a4, 595.44, 841.68);

        let a3 = resolve_page_size(PageSizePreset::A3, None, None, None, None).unwrap();
        assert_size(a3, 841.68, 1190.88);

        let letter = resolve_page_size(PageSizePreset::Letter, None, None, None, None).unwrap();
        assert_size(letter, 612.0, 792.0);

        let legal = resolve_page_size(PageSizePreset::Legal, None, None, None, None).unwrap();
        assert_size(legal, 612.0, 1008.0);
    }

    #[test]
    fn test_custom_size() {
        let size =
            resolve_page_size(PageSizePreset::Custom, Some(254.0), Some(127.0), None, None)
                .unwrap();
        assert_size(size, 720.0, 360.0);

        // Missing dimensions fall back to A4
        let size = resolve_page_size(PageSizePreset::Custom, None, None, None, None).unwrap();
        assert_size(size, 595.44, 841.68);

        let size =
            resolve_page_size(PageSizePreset::Custom, Some(254.0), None, None, None).unwrap();
        assert_size(size, 720.0, 841.68);
    }

    #[test]
    fn test_custom_size_rejects_non_positive() {
        assert!(resolve_page_size(PageSizePreset::Custom, Some(0.0), None, None, None).is_err());
        assert!(
            resolve_page_size(PageSizePreset::Custom, None, Some(-10.0), None, None).is_err()
        );
    }

    #[test]
    fn test_original_size() {
        let size = resolve_page_size(
            PageSizePreset::Original,
            None,
            None,
            Some((3000, 2000)),
            Some(300.0),
        )
        .unwrap();
        assert_size(size, 720.0, 480.0);
    }

    #[test]
    fn test_original_requires_image_and_resolution() {
        assert!(
            resolve_page_size(PageSizePreset::Original, None, None, None, Some(300.0)).is_err()
        );
        assert!(
            resolve_page_size(PageSizePreset::Original, None, None, Some((10, 10)), None).is_err()
        );
        assert!(
            resolve_page_size(PageSizePreset::Original, None, None, Some((10, 10)), Some(0.0))
                .is_err()
        );
    }

    #[test]
    fn test_page_size_for_uses_fallback_resolution() {
        let options = ConversionOptions {
            page_size: PageSizePreset::Original,
            ..Default::default()
        };
        let image = SourceImage::new(600, 300, None);
        let size = page_size_for(&options, &image).unwrap();
        // 300 ppi fallback: 2in x 1in
        assert_size(size, 144.0, 72.0);
    }
}
