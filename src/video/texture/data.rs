//! N-dimensional numeric arrays that can be handed to a texture.

use half::f16;
use smallvec::SmallVec;

use crate::errors::*;

use super::types::PixelType;

/// Ordered dimension sizes, `(rows, cols, [depth], [channels])`.
pub type Shape = SmallVec<[usize; 4]>;

/// The element kinds a `TextureData` can hold.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ElementKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
}

impl ElementKind {
    /// Width of one element in bits.
    pub fn bits(self) -> u32 {
        match self {
            ElementKind::Bool | ElementKind::U8 | ElementKind::I8 => 8,
            ElementKind::U16 | ElementKind::I16 | ElementKind::F16 => 16,
            ElementKind::U32 | ElementKind::I32 | ElementKind::F32 => 32,
            ElementKind::U64 | ElementKind::I64 | ElementKind::F64 => 64,
        }
    }

    pub fn is_float(self) -> bool {
        match self {
            ElementKind::F16 | ElementKind::F32 | ElementKind::F64 => true,
            _ => false,
        }
    }

    pub fn is_signed_integer(self) -> bool {
        match self {
            ElementKind::I8 | ElementKind::I16 | ElementKind::I32 | ElementKind::I64 => true,
            _ => false,
        }
    }

    pub fn is_unsigned_integer(self) -> bool {
        match self {
            ElementKind::U8 | ElementKind::U16 | ElementKind::U32 | ElementKind::U64 => true,
            _ => false,
        }
    }

    /// The pixel type a driver reads this kind as, if any.
    pub fn pixel_type(self) -> Option<PixelType> {
        match self {
            ElementKind::U8 => Some(PixelType::UnsignedByte),
            ElementKind::F16 => Some(PixelType::HalfFloat),
            ElementKind::F32 => Some(PixelType::Float),
            _ => None,
        }
    }
}

/// A typed, row-major element buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F16(Vec<f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! elements_dispatch {
    ($elements:expr, $v:ident => $body:expr) => {
        match $elements {
            Elements::Bool($v) => $body,
            Elements::U8($v) => $body,
            Elements::U16($v) => $body,
            Elements::U32($v) => $body,
            Elements::U64($v) => $body,
            Elements::I8($v) => $body,
            Elements::I16($v) => $body,
            Elements::I32($v) => $body,
            Elements::I64($v) => $body,
            Elements::F16($v) => $body,
            Elements::F32($v) => $body,
            Elements::F64($v) => $body,
        }
    };
}

impl Elements {
    pub fn kind(&self) -> ElementKind {
        match *self {
            Elements::Bool(_) => ElementKind::Bool,
            Elements::U8(_) => ElementKind::U8,
            Elements::U16(_) => ElementKind::U16,
            Elements::U32(_) => ElementKind::U32,
            Elements::U64(_) => ElementKind::U64,
            Elements::I8(_) => ElementKind::I8,
            Elements::I16(_) => ElementKind::I16,
            Elements::I32(_) => ElementKind::I32,
            Elements::I64(_) => ElementKind::I64,
            Elements::F16(_) => ElementKind::F16,
            Elements::F32(_) => ElementKind::F32,
            Elements::F64(_) => ElementKind::F64,
        }
    }

    pub fn len(&self) -> usize {
        elements_dispatch!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Primitive types that can be stored in a `TextureData`.
pub trait Element: Sized {
    fn into_elements(vec: Vec<Self>) -> Elements;
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident,)+) => {
        $(
            impl Element for $t {
                fn into_elements(vec: Vec<Self>) -> Elements {
                    Elements::$variant(vec)
                }
            }
        )+
    };
}

impl_element! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f16 => F16,
    f32 => F32,
    f64 => F64,
}

/// A shaped numeric array.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    shape: Shape,
    elements: Elements,
}

impl TextureData {
    /// Wraps a row-major buffer. The product of `shape` must equal the number
    /// of elements.
    pub fn new(shape: &[usize], elements: Elements) -> Result<Self> {
        if shape.is_empty() {
            return Err(Error::InvalidShape(shape.to_vec(), "empty shape".into()));
        }

        let len: usize = shape.iter().product();
        if len != elements.len() {
            return Err(Error::InvalidShape(
                shape.to_vec(),
                format!("expected {} elements, got {}", len, elements.len()),
            ));
        }

        Ok(TextureData {
            shape: Shape::from_slice(shape),
            elements,
        })
    }

    /// Wraps a typed vector, see `TextureData::new`.
    pub fn from_vec<T: Element>(shape: &[usize], vec: Vec<T>) -> Result<Self> {
        TextureData::new(shape, T::into_elements(vec))
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.elements.kind()
    }

    #[inline]
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The raw bytes of the buffer, available for the kinds a driver reads
    /// directly.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self.elements {
            Elements::U8(ref v) => Ok(&v[..]),
            Elements::F16(ref v) => Ok(bytemuck::cast_slice(&v[..])),
            Elements::F32(ref v) => Ok(bytemuck::cast_slice(&v[..])),
            ref other => Err(Error::UnsupportedElementKind(other.kind())),
        }
    }
}
