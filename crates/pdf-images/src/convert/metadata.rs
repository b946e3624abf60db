//! Resolution metadata from JPEG (JFIF, EXIF) and PNG headers

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const CM_PER_INCH: f32 = 2.54;
const METERS_PER_INCH: f32 = 0.0254;
const EXIF_X_RESOLUTION: u16 = 0x011A;
const EXIF_RESOLUTION_UNIT: u16 = 0x0128;

/// Declared horizontal resolution in pixels per inch, if any
pub fn read_resolution(data: &[u8]) -> Option<f32> {
    if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
        return jpeg_density(data);
    }
    if data.len() >= 8 && data[..8] == PNG_SIGNATURE {
        return png_physical_density(data);
    }
    None
}

/// Walk JPEG markers up to the first scan.
///
/// A JFIF APP0 density with real units wins; otherwise the EXIF XResolution
/// from APP1 is used.
fn jpeg_density(data: &[u8]) -> Option<f32> {
    let mut exif = None;
    let mut pos = 2;
    while pos + 4 < data.len() {
        if data[pos] != 0xFF {
            break;
        }
        let marker = data[pos + 1];
        // skip padding 0xFF bytes
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // standalone markers have no length field
        if marker == 0x01 || (0xD0..=0xD8).contains(&marker) {
            pos += 2;
            continue;
        }
        // start of scan or end of image: no headers past this point
        if marker == 0xDA || marker == 0xD9 {
            break;
        }

        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let Some(segment) = data.get(pos + 4..pos + 2 + len) else {
            break;
        };

        if marker == 0xE0 && segment.len() >= 12 && &segment[..5] == b"JFIF\0" {
            if let Some(dpi) = jfif_density(segment) {
                return Some(dpi);
            }
        } else if marker == 0xE1 && segment.starts_with(b"Exif\0\0") && exif.is_none() {
            exif = exif_resolution(&segment[6..]);
        }

        pos += 2 + len;
    }
    exif
}

fn jfif_density(segment: &[u8]) -> Option<f32> {
    let units = segment[7];
    let x_density = u16::from_be_bytes([segment[8], segment[9]]) as f32;
    if x_density <= 0.0 {
        return None;
    }
    match units {
        1 => Some(x_density),
        2 => Some(x_density * CM_PER_INCH),
        // 0 = aspect ratio only
        _ => None,
    }
}

/// XResolution and ResolutionUnit from IFD0 of a TIFF-structured EXIF block
fn exif_resolution(tiff: &[u8]) -> Option<f32> {
    let big_endian = match tiff.get(..2)? {
        b"II" => false,
        b"MM" => true,
        _ => return None,
    };
    let u16_at = |at: usize| -> Option<u16> {
        let bytes: [u8; 2] = tiff.get(at..at + 2)?.try_into().ok()?;
        Some(if big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    };
    let u32_at = |at: usize| -> Option<u32> {
        let bytes: [u8; 4] = tiff.get(at..at + 4)?.try_into().ok()?;
        Some(if big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    };

    if u16_at(2)? != 42 {
        return None;
    }
    let ifd = u32_at(4)? as usize;
    let entries = u16_at(ifd)? as usize;

    let mut resolution = None;
    // 2 = inch when the tag is absent
    let mut unit = 2;
    for i in 0..entries {
        let entry = ifd + 2 + i * 12;
        match u16_at(entry)? {
            EXIF_X_RESOLUTION => {
                // RATIONAL: offset to numerator and denominator
                let offset = u32_at(entry + 8)? as usize;
                let (num, den) = (u32_at(offset)?, u32_at(offset + 4)?);
                if den != 0 {
                    resolution = Some(num as f32 / den as f32);
                }
            }
            EXIF_RESOLUTION_UNIT => unit = u16_at(entry + 8)?,
            _ => {}
        }
    }

    let resolution = resolution.filter(|r| r.is_finite() && *r > 0.0)?;
    match unit {
        2 => Some(resolution),
        3 => Some(resolution * CM_PER_INCH),
        // 1 = no absolute unit
        _ => None,
    }
}

/// Read the pHYs chunk of a PNG file
fn png_physical_density(data: &[u8]) -> Option<f32> {
    let mut pos = 8;
    while pos + 8 <= data.len() {
        let chunk_len =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let chunk_type = &data[pos + 4..pos + 8];
        let chunk_data = data.get(pos + 8..pos + 8 + chunk_len)?;

        if chunk_type == b"pHYs" {
            if chunk_len < 9 {
                return None;
            }
            let x_ppu = u32::from_be_bytes([chunk_data[0], chunk_data[1], chunk_data[2], chunk_data[3]]);
            let unit = chunk_data[8];
            // unit 1 = meter; 0 = aspect ratio only
            if unit != 1 || x_ppu == 0 {
                return None;
            }
            return Some(x_ppu as f32 * METERS_PER_INCH);
        }
        // pHYs must precede the image data
        if chunk_type == b"IDAT" || chunk_type == b"IEND" {
            return None;
        }

        // +12 for length, type and CRC
        pos += chunk_len + 12;
    }
    None
}
