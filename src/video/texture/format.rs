use crate::errors::*;

use super::types::{PixelFormat, Target};

/// Deduces the pixel format from the shape of the data and the target. The
/// trailing dimension, if there is one beyond the spatial dimensions of the
/// target, is the channel count. `PixelFormat::Alpha` is never inferred.
pub fn infer_format(shape: &[usize], target: Target) -> Result<PixelFormat> {
    let ndim = target
        .dimensions()
        .ok_or_else(|| Error::UnsupportedTarget(format!("{}", target)))?;

    if shape.len() == ndim {
        return Ok(PixelFormat::Luminance);
    }

    if shape.len() == ndim + 1 {
        match shape[ndim] {
            1 => return Ok(PixelFormat::Luminance),
            2 => return Ok(PixelFormat::LuminanceAlpha),
            3 => return Ok(PixelFormat::Rgb),
            4 => return Ok(PixelFormat::Rgba),
            _ => {}
        }
    }

    Err(Error::UndeterminedFormat(shape.to_vec()))
}

/// The number of channels a shape describes, 1 if there is no channel axis.
pub(crate) fn channels(shape: &[usize], ndim: usize) -> usize {
    if shape.len() > ndim {
        shape[ndim]
    } else {
        1
    }
}

/// Determines the unpack alignment for rows of `row_bytes` bytes. The valid
/// alignments are 1, 2, 4 and 8; 4 is tried first since it's the default.
///
/// The row length is measured in bytes, not in trailing elements: the driver
/// aligns every row start, so the element count alone picks wrong values.
pub(crate) fn unpack_alignment(row_bytes: usize) -> u32 {
    for &alignment in &[4, 8, 2] {
        if row_bytes % alignment == 0 {
            return alignment as u32;
        }
    }

    1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn infer_2d() {
        let target = Target::Texture2D;
        assert_eq!(infer_format(&[4, 4], target).unwrap(), PixelFormat::Luminance);
        assert_eq!(infer_format(&[4, 4, 1], target).unwrap(), PixelFormat::Luminance);
        assert_eq!(
            infer_format(&[4, 4, 2], target).unwrap(),
            PixelFormat::LuminanceAlpha
        );
        assert_eq!(infer_format(&[4, 4, 3], target).unwrap(), PixelFormat::Rgb);
        assert_eq!(infer_format(&[4, 4, 4], target).unwrap(), PixelFormat::Rgba);

        assert!(infer_format(&[4, 4, 5], target).is_err());
        assert!(infer_format(&[4], target).is_err());
        assert!(infer_format(&[4, 4, 4, 4], target).is_err());
    }

    #[test]
    fn infer_3d() {
        let target = Target::Texture3D;
        assert_eq!(infer_format(&[2, 4, 4], target).unwrap(), PixelFormat::Luminance);
        assert_eq!(infer_format(&[2, 4, 4, 3], target).unwrap(), PixelFormat::Rgb);
        assert!(infer_format(&[4, 4], target).is_err());
        assert!(infer_format(&[2, 4, 4, 0], target).is_err());
    }

    #[test]
    fn infer_cube_map() {
        assert!(infer_format(&[4, 4], Target::CubeMap).is_err());
    }

    #[test]
    fn alignment() {
        assert_eq!(unpack_alignment(12), 4);
        assert_eq!(unpack_alignment(16), 4);
        assert_eq!(unpack_alignment(24), 4);
        assert_eq!(unpack_alignment(6), 2);
        assert_eq!(unpack_alignment(3), 1);
        assert_eq!(unpack_alignment(10), 2);
    }
}
