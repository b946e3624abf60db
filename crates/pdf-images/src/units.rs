//! Unit conversions between millimeters, inches, points and pixels

use crate::types::{ConvertError, Result};

pub const MM_PER_INCH: f32 = 25.4;
pub const POINTS_PER_INCH: f32 = 72.0;

pub fn mm_to_in(mm: f32) -> f32 {
    mm / MM_PER_INCH
}

pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

pub fn pt_to_in(points: f32) -> f32 {
    points / POINTS_PER_INCH
}

pub fn mm_to_pt(mm: f32) -> f32 {
    in_to_pt(mm_to_in(mm))
}

/// Physical length of `pixels` at `ppi`
pub fn px_to_in(pixels: u32, ppi: f32) -> Result<f32> {
    let ppi = check_resolution(ppi)?;
    Ok(pixels as f32 / ppi)
}

/// Pixel count covering `inches` at `ppi`, rounded down
pub fn in_to_px(inches: f32, ppi: f32) -> Result<u32> {
    let ppi = check_resolution(ppi)?;
    Ok((inches * ppi).floor().max(0.0) as u32)
}

/// Reject resolutions that cannot be divided by
pub fn check_resolution(ppi: f32) -> Result<f32> {
    if !ppi.is_finite() || ppi <= 0.0 {
        return Err(ConvertError::Config(format!(
            "Resolution must be a positive number, got {}",
            ppi
        )));
    }
    Ok(ppi)
}
