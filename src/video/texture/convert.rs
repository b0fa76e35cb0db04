//! Conversion of arbitrary numeric arrays into element kinds that can be
//! uploaded as pixel data.

use std::borrow::Cow;

use half::f16;

use crate::errors::*;

use super::data::{ElementKind, Elements, TextureData};
use super::types::ContrastLimits;

/// Which float element kinds the driver accepts directly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FloatSupport {
    pub half: bool,
    pub float: bool,
}

impl FloatSupport {
    pub fn all() -> Self {
        FloatSupport {
            half: true,
            float: true,
        }
    }
}

/// The contrast limits integer data is mapped with when none are given.
///
/// Signed kinds use their full range `(-2^(bits-1), 2^(bits-1) - 1)`. Unsigned
/// kinds use `(0, 2^(bits-1))`, which only spans the lower half of the range
/// of the kind; callers depend on this scaling.
pub fn default_contrast_limits(kind: ElementKind) -> Option<ContrastLimits> {
    let half = 2f64.powi(kind.bits() as i32 - 1);
    if kind.is_signed_integer() {
        Some((-half, half - 1.0))
    } else if kind.is_unsigned_integer() {
        Some((0.0, half))
    } else {
        None
    }
}

enum Converted {
    Unchanged,
    U8(Vec<u8>),
    F16(Vec<f16>),
    F32(Vec<f32>),
}

fn to_f32<T: Copy, F: Fn(T) -> f32>(v: &[T], f: F) -> Converted {
    Converted::F32(v.iter().map(|&x| f(x)).collect())
}

/// Converts `data` into one of `u8`, `f16` (if `support.half`) or `f32` (if
/// `support.float`), applying `limits` so that `min` ends up as 0 and `max`
/// as 1.
///
/// Data that is already uploadable and needs no rescaling is borrowed, never
/// copied. Floats the driver can not read are scaled by 256, clipped and
/// stored as `u8`.
pub fn convert_for_upload<'a>(
    data: &'a TextureData,
    limits: Option<ContrastLimits>,
    support: FloatSupport,
) -> Result<Cow<'a, TextureData>> {
    let kind = data.kind();

    let (converted, limits) = match *data.elements() {
        // Contrast limits make no sense for booleans.
        Elements::Bool(ref v) => (Converted::U8(v.iter().map(|&b| b as u8).collect()), None),
        Elements::U8(ref v) => match limits {
            None => (Converted::Unchanged, None),
            Some(_) => (to_f32(&v[..], |x| f32::from(x)), limits),
        },
        Elements::F16(ref v) => {
            if limits.is_some() || !support.half {
                (Converted::F16(v.clone()), limits)
            } else {
                (Converted::Unchanged, None)
            }
        }
        Elements::F32(ref v) => {
            if limits.is_some() || !support.float {
                (Converted::F32(v.clone()), limits)
            } else {
                (Converted::Unchanged, None)
            }
        }
        Elements::F64(ref v) => (to_f32(&v[..], |x| x as f32), limits),
        Elements::I8(ref v) => (to_f32(&v[..], |x| f32::from(x)), limits),
        Elements::I16(ref v) => (to_f32(&v[..], |x| f32::from(x)), limits),
        Elements::I32(ref v) => (to_f32(&v[..], |x| x as f32), limits),
        Elements::I64(ref v) => (to_f32(&v[..], |x| x as f32), limits),
        Elements::U16(ref v) => (to_f32(&v[..], |x| f32::from(x)), limits),
        Elements::U32(ref v) => (to_f32(&v[..], |x| x as f32), limits),
        Elements::U64(ref v) => (to_f32(&v[..], |x| x as f32), limits),
    };

    let limits = if kind.is_signed_integer() || (kind.is_unsigned_integer() && kind != ElementKind::U8)
    {
        limits.or_else(|| default_contrast_limits(kind))
    } else {
        limits
    };

    let converted = match limits {
        Some(limits) => apply_limits(converted, limits),
        None => converted,
    };

    let elements = match converted {
        Converted::Unchanged => return Ok(Cow::Borrowed(data)),
        Converted::U8(v) => Elements::U8(v),
        Converted::F16(v) => {
            if support.half {
                Elements::F16(v)
            } else {
                Elements::U8(v.iter().map(|x| quantize(x.to_f32())).collect())
            }
        }
        Converted::F32(v) => {
            if support.float {
                Elements::F32(v)
            } else {
                Elements::U8(v.iter().map(|&x| quantize(x)).collect())
            }
        }
    };

    TextureData::new(data.shape(), elements).map(Cow::Owned)
}

fn apply_limits(converted: Converted, (min, max): ContrastLimits) -> Converted {
    let span = max - min;
    let offset = if min != 0.0 { Some(min) } else { None };
    let scale = if span != 1.0 { Some(1.0 / span) } else { None };

    let rescale = |x: f32| -> f32 {
        let mut x = f64::from(x);
        if let Some(min) = offset {
            x -= min;
        }
        if let Some(scale) = scale {
            x *= scale;
        }
        x as f32
    };

    match converted {
        Converted::F32(mut v) => {
            for x in &mut v {
                *x = rescale(*x);
            }
            Converted::F32(v)
        }
        Converted::F16(mut v) => {
            for x in &mut v {
                *x = f16::from_f32(rescale(x.to_f32()));
            }
            Converted::F16(v)
        }
        other => other,
    }
}

#[inline]
fn quantize(x: f32) -> u8 {
    (x * 256.0).max(0.0).min(256.0) as u8
}
