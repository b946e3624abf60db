//! Downsampling decisions made before layout
//!
//! Planning works against the full grid of the configured layout: the final
//! page grouping is not known while images are being processed.

use crate::layout::{Size, fixed_page_size, resolve_grid};
use crate::options::ConversionOptions;
use crate::types::{PageSizePreset, Result, SourceImage};
use crate::units::{in_to_px, pt_to_in, px_to_in};

/// What to do with an image's pixels before embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplePlan {
    /// Embed at the current pixel size
    Keep,
    /// Shrink to fit inside `max_width` x `max_height` pixels
    Resize { max_width: u32, max_height: u32 },
}

impl ResamplePlan {
    pub fn should_resize(&self) -> bool {
        matches!(self, ResamplePlan::Resize { .. })
    }

    /// Pixel size after applying the plan to a `width` x `height` image.
    ///
    /// The aspect ratio is preserved and the image is never enlarged.
    pub fn apply(&self, width: u32, height: u32) -> (u32, u32) {
        match *self {
            ResamplePlan::Keep => (width, height),
            ResamplePlan::Resize {
                max_width,
                max_height,
            } => {
                if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
                    return (width, height);
                }
                let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
                let new_width = ((width as f64 * ratio).round() as u32).clamp(1, width);
                let new_height = ((height as f64 * ratio).round() as u32).clamp(1, height);
                (new_width, new_height)
            }
        }
    }
}

/// Decide whether `image` must be downsampled before embedding.
///
/// Images are left alone for "Original" pages and when no target resolution
/// is configured. Otherwise an image measured (at its native resolution, the
/// source override, or 72 ppi) larger than a full-grid slot in either
/// direction is shrunk to the slot size at the target resolution.
pub fn plan_resample(image: &SourceImage, options: &ConversionOptions) -> Result<ResamplePlan> {
    if options.page_size == PageSizePreset::Original {
        return Ok(ResamplePlan::Keep);
    }
    let Some(target_dpi) = options.target_dpi else {
        return Ok(ResamplePlan::Keep);
    };

    let slot = slot_size_in(options)?;

    let measure_dpi = options.measure_resolution(image);
    let width_in = px_to_in(image.width, measure_dpi)?;
    let height_in = px_to_in(image.height, measure_dpi)?;

    if width_in <= slot.width && height_in <= slot.height {
        return Ok(ResamplePlan::Keep);
    }

    let plan = ResamplePlan::Resize {
        max_width: in_to_px(slot.width, target_dpi)?.max(1),
        max_height: in_to_px(slot.height, target_dpi)?.max(1),
    };
    log::debug!(
        "Image {}x{}px ({:.2}x{:.2}in) exceeds slot {:.2}x{:.2}in: {:?}",
        image.width,
        image.height,
        width_in,
        height_in,
        slot.width,
        slot.height,
        plan
    );
    Ok(plan)
}

/// Size of one full-grid slot, in inches
fn slot_size_in(options: &ConversionOptions) -> Result<Size> {
    let page = fixed_page_size(options)?;
    let grid = resolve_grid(options.page_layout, options.margin_in)?;
    let slot = grid.slot_size(page);
    Ok(Size::new(pt_to_in(slot.width), pt_to_in(slot.height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayoutPreset;

    fn letter_options() -> ConversionOptions {
        ConversionOptions {
            page_size: PageSizePreset::Letter,
            page_layout: LayoutPreset::One,
            margin_in: 0.25,
            target_dpi: Some(150.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_skip_without_target_dpi() {
        let options = ConversionOptions {
            target_dpi: None,
            ..letter_options()
        };
        let image = SourceImage::new(10_000, 10_000, Some(72.0));
        assert_eq!(plan_resample(&image, &options).unwrap(), ResamplePlan::Keep);
    }

    #[test]
    fn test_skip_for_original_pages() {
        let options = ConversionOptions {
            page_size: PageSizePreset::Original,
            ..letter_options()
        };
        let image = SourceImage::new(10_000, 10_000, Some(72.0));
        assert_eq!(plan_resample(&image, &options).unwrap(), ResamplePlan::Keep);
    }

    #[test]
    fn test_small_image_kept() {
        // 8x10in at 300ppi fits in the 8x10.5in slot
        let image = SourceImage::new(2400, 3000, Some(300.0));
        assert_eq!(
            plan_resample(&image, &letter_options()).unwrap(),
            ResamplePlan::Keep
        );
    }

    #[test]
    fn test_large_image_resized_to_slot() {
        // 3000px at 72ppi is ~41.7in wide
        let image = SourceImage::new(3000, 2000, None);
        let plan = plan_resample(&image, &letter_options()).unwrap();
        // Slot is 8x10.5in; at 150ppi that is 1200x1575px
        assert_eq!(
            plan,
            ResamplePlan::Resize {
                max_width: 1200,
                max_height: 1575
            }
        );
        assert!(plan.should_resize());
        assert_eq!(plan.apply(3000, 2000), (1200, 800));
    }

    #[test]
    fn test_source_dpi_override_used_for_measurement() {
        let options = ConversionOptions {
            source_dpi: Some(600.0),
            ..letter_options()
        };
        // 3000px at 600ppi is 5in wide: fits
        let image = SourceImage::new(3000, 2000, None);
        assert_eq!(plan_resample(&image, &options).unwrap(), ResamplePlan::Keep);
    }

    #[test]
    fn test_plan_is_idempotent() {
        let image = SourceImage::new(5000, 4000, Some(96.0));
        let options = letter_options();
        let first = plan_resample(&image, &options).unwrap();
        let second = plan_resample(&image, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(image, SourceImage::new(5000, 4000, Some(96.0)));
    }

    #[test]
    fn test_apply_never_enlarges() {
        let plan = ResamplePlan::Resize {
            max_width: 4000,
            max_height: 100,
        };
        assert_eq!(plan.apply(500, 400), (125, 100));

        let plan = ResamplePlan::Resize {
            max_width: 4000,
            max_height: 4000,
        };
        assert_eq!(plan.apply(500, 400), (500, 400));
        assert_eq!(ResamplePlan::Keep.apply(7, 9), (7, 9));
    }

    #[test]
    fn test_target_box_at_least_one_pixel() {
        let options = ConversionOptions {
            margin_in: 10.0,
            ..letter_options()
        };
        let image = SourceImage::new(3000, 2000, None);
        assert_eq!(
            plan_resample(&image, &options).unwrap(),
            ResamplePlan::Resize {
                max_width: 1,
                max_height: 1
            }
        );
    }
}
