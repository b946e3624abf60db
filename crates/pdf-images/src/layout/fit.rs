//! Image placement within slots
//!
//! Images are scaled uniformly (aspect ratio is always preserved) and
//! centered in their slot. One image pixel maps to one point at scale 1.

use crate::types::ScalingMode;

use super::Rect;

/// Scale and drawn rectangle for one image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFit {
    pub scale: f32,
    pub rect: Rect,
}

/// Fit an image of `image_width` x `image_height` pixels into `slot`.
///
/// The drawn rectangle is centered in the slot. With `FitWidth` it may extend
/// above and below the slot.
pub fn fit_image(slot: &Rect, image_width: u32, image_height: u32, mode: ScalingMode) -> ImageFit {
    let image_width = image_width.max(1) as f32;
    let image_height = image_height.max(1) as f32;

    let scale = calculate_scale(image_width, image_height, slot.width, slot.height, mode);

    let draw_width = image_width * scale;
    let draw_height = image_height * scale;

    ImageFit {
        scale,
        rect: Rect::new(
            slot.x + (slot.width - draw_width) / 2.0,
            slot.y + (slot.height - draw_height) / 2.0,
            draw_width,
            draw_height,
        ),
    }
}

/// Calculate scale factor for fitting an image into a slot.
pub fn calculate_scale(
    image_width: f32,
    image_height: f32,
    slot_width: f32,
    slot_height: f32,
    mode: ScalingMode,
) -> f32 {
    let scale_w = slot_width / image_width;
    let scale_h = slot_height / image_height;

    match mode {
        ScalingMode::FitPage => scale_w.min(scale_h),
        ScalingMode::FitWidth => scale_w.min(1.0),
        ScalingMode::OriginalSize => 1.0_f32.min(scale_w).min(scale_h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn test_fit_page() {
        let fit = fit_image(&slot(), 800, 300, ScalingMode::FitPage);
        assert!((fit.scale - 0.5).abs() < 1e-6);

        // Small images are enlarged until one side fills the slot
        let fit = fit_image(&slot(), 100, 50, ScalingMode::FitPage);
        assert!((fit.scale - 4.0).abs() < 1e-6);
        assert!((fit.rect.width - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_width() {
        let fit = fit_image(&slot(), 800, 300, ScalingMode::FitWidth);
        assert!((fit.scale - 0.5).abs() < 1e-6);

        // Never upscales
        let fit = fit_image(&slot(), 200, 300, ScalingMode::FitWidth);
        assert_eq!(fit.scale, 1.0);

        // Only the width is constrained; tall images overflow the slot
        let fit = fit_image(&slot(), 400, 1200, ScalingMode::FitWidth);
        assert_eq!(fit.scale, 1.0);
        assert!(fit.rect.height > slot().height);
    }

    #[test]
    fn test_original_size() {
        let fit = fit_image(&slot(), 200, 100, ScalingMode::OriginalSize);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.rect.width, 200.0);

        let fit = fit_image(&slot(), 800, 800, ScalingMode::OriginalSize);
        assert!((fit.scale - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        for mode in [
            ScalingMode::FitPage,
            ScalingMode::FitWidth,
            ScalingMode::OriginalSize,
        ] {
            for (w, h) in [(800, 300), (200, 300), (1234, 987), (1, 1000)] {
                let fit = fit_image(&slot(), w, h, mode);
                let expected = w as f32 / h as f32;
                let actual = fit.rect.width / fit.rect.height;
                assert!(
                    (actual - expected).abs() / expected < 1e-4,
                    "{:?} {}x{}: {} != {}",
                    mode,
                    w,
                    h,
                    actual,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_centered_in_slot() {
        let slot = Rect::new(50.0, 20.0, 400.0, 300.0);
        let fit = fit_image(&slot, 200, 100, ScalingMode::OriginalSize);
        assert!(((fit.rect.x - slot.x) - (slot.right() - fit.rect.right())).abs() < 1e-4);
        assert!(((fit.rect.y - slot.y) - (slot.top() - fit.rect.top())).abs() < 1e-4);
        assert_eq!(fit.rect.x, 150.0);
        assert_eq!(fit.rect.y, 120.0);
    }
}
