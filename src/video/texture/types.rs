use std::fmt;
use std::str::FromStr;

use crate::errors::*;
use crate::video::backends::Capability;

/// A `(min, max)` window that is mapped onto `[0, 1]` when converting data.
pub type ContrastLimits = (f64, f64);

/// The structural kind of a texture. Fixed at construction.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Target {
    Texture2D,
    Texture3D,
    /// Reserved, textures can not be created with this target yet.
    CubeMap,
}

impl Target {
    /// The number of spatial dimensions, `None` for unsupported targets.
    pub fn dimensions(self) -> Option<usize> {
        match self {
            Target::Texture2D => Some(2),
            Target::Texture3D => Some(3),
            Target::CubeMap => None,
        }
    }

    /// The optional driver capability this target depends on.
    pub fn requirement(self) -> Option<Capability> {
        match self {
            Target::Texture3D => Some(Capability::Texture3D),
            _ => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The pixel formats a texture can be described with. Compressed formats are
/// not supported.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PixelFormat {
    Luminance,
    LuminanceAlpha,
    /// Single channel, never inferred from a shape.
    Alpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Luminance | PixelFormat::Alpha => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The element types a driver accepts for pixel data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PixelType {
    UnsignedByte,
    /// Needs `Capability::HalfFloatTexture`.
    HalfFloat,
    /// Needs `Capability::FloatTexture`.
    Float,
}

impl PixelType {
    pub fn size(self) -> usize {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::HalfFloat => 2,
            PixelType::Float => 4,
        }
    }

    pub fn requirement(self) -> Option<Capability> {
        match self {
            PixelType::UnsignedByte => None,
            PixelType::HalfFloat => Some(Capability::HalfFloatTexture),
            PixelType::Float => Some(Capability::FloatTexture),
        }
    }
}

/// Sampling parameters of a texture object.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum TextureParameter {
    MinFilter,
    MagFilter,
    WrapS,
    WrapT,
    /// Only meaningful for 3D textures.
    WrapR,
}

impl TextureParameter {
    /// Checks whether `value` can be assigned to this parameter.
    pub fn accepts(self, value: TextureParameterValue) -> bool {
        use self::TextureParameterValue as V;

        match self {
            TextureParameter::MinFilter => value.is_filter(),
            TextureParameter::MagFilter => value == V::Nearest || value == V::Linear,
            TextureParameter::WrapS | TextureParameter::WrapT | TextureParameter::WrapR => {
                !value.is_filter()
            }
        }
    }
}

impl FromStr for TextureParameter {
    type Err = Error;

    /// Parses names like `min_filter`, `TEXTURE_WRAP_S` or `GL_TEXTURE_MAG_FILTER`,
    /// ignoring case. Names are prefixed with `GL_TEXTURE_` unless they already
    /// start with `GL`.
    fn from_str(s: &str) -> Result<Self> {
        let name = canonicalize(s, "GL_TEXTURE_");
        match name.as_str() {
            "GL_TEXTURE_MIN_FILTER" => Ok(TextureParameter::MinFilter),
            "GL_TEXTURE_MAG_FILTER" => Ok(TextureParameter::MagFilter),
            "GL_TEXTURE_WRAP_S" => Ok(TextureParameter::WrapS),
            "GL_TEXTURE_WRAP_T" => Ok(TextureParameter::WrapT),
            "GL_TEXTURE_WRAP_R" => Ok(TextureParameter::WrapR),
            _ => Err(Error::UnknownParameter(s.to_owned())),
        }
    }
}

impl fmt::Display for TextureParameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Values of the sampling parameters.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TextureParameterValue {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl TextureParameterValue {
    pub fn is_filter(self) -> bool {
        match self {
            TextureParameterValue::Repeat
            | TextureParameterValue::MirroredRepeat
            | TextureParameterValue::ClampToEdge => false,
            _ => true,
        }
    }
}

impl FromStr for TextureParameterValue {
    type Err = Error;

    /// Parses names like `linear` or `GL_CLAMP_TO_EDGE`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        use self::TextureParameterValue as V;

        let name = canonicalize(s, "GL_");
        match name.as_str() {
            "GL_NEAREST" => Ok(V::Nearest),
            "GL_LINEAR" => Ok(V::Linear),
            "GL_NEAREST_MIPMAP_NEAREST" => Ok(V::NearestMipmapNearest),
            "GL_LINEAR_MIPMAP_NEAREST" => Ok(V::LinearMipmapNearest),
            "GL_NEAREST_MIPMAP_LINEAR" => Ok(V::NearestMipmapLinear),
            "GL_LINEAR_MIPMAP_LINEAR" => Ok(V::LinearMipmapLinear),
            "GL_REPEAT" => Ok(V::Repeat),
            "GL_MIRRORED_REPEAT" => Ok(V::MirroredRepeat),
            "GL_CLAMP_TO_EDGE" => Ok(V::ClampToEdge),
            _ => Err(Error::UnknownParameterValue(s.to_owned())),
        }
    }
}

impl fmt::Display for TextureParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn canonicalize(s: &str, prefix: &str) -> String {
    let name = s.trim().to_uppercase();
    if name.starts_with("GL") {
        name
    } else {
        format!("{}{}", prefix, name)
    }
}

/// Anything that names a texture parameter, either symbolically or by a
/// string spelling.
pub trait IntoTextureParameter {
    fn into_texture_parameter(self) -> Result<TextureParameter>;
}

impl IntoTextureParameter for TextureParameter {
    fn into_texture_parameter(self) -> Result<TextureParameter> {
        Ok(self)
    }
}

impl<'a> IntoTextureParameter for &'a str {
    fn into_texture_parameter(self) -> Result<TextureParameter> {
        self.parse()
    }
}

impl IntoTextureParameter for String {
    fn into_texture_parameter(self) -> Result<TextureParameter> {
        self.parse()
    }
}

/// Anything that names a texture parameter value.
pub trait IntoTextureParameterValue {
    fn into_texture_parameter_value(self) -> Result<TextureParameterValue>;
}

impl IntoTextureParameterValue for TextureParameterValue {
    fn into_texture_parameter_value(self) -> Result<TextureParameterValue> {
        Ok(self)
    }
}

impl<'a> IntoTextureParameterValue for &'a str {
    fn into_texture_parameter_value(self) -> Result<TextureParameterValue> {
        self.parse()
    }
}

impl IntoTextureParameterValue for String {
    fn into_texture_parameter_value(self) -> Result<TextureParameterValue> {
        self.parse()
    }
}
