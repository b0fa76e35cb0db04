use gl;
use gl::types::*;

use crate::errors::*;
use crate::video::texture::{PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue};

// Legacy unsized formats, absent from core profile bindings.
const ALPHA: GLenum = 0x1906;
const LUMINANCE: GLenum = 0x1909;
const LUMINANCE_ALPHA: GLenum = 0x190A;

impl From<Target> for GLenum {
    fn from(target: Target) -> Self {
        match target {
            Target::Texture2D => gl::TEXTURE_2D,
            Target::Texture3D => gl::TEXTURE_3D,
            Target::CubeMap => gl::TEXTURE_CUBE_MAP,
        }
    }
}

impl From<PixelFormat> for GLenum {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Luminance => LUMINANCE,
            PixelFormat::LuminanceAlpha => LUMINANCE_ALPHA,
            PixelFormat::Alpha => ALPHA,
            PixelFormat::Rgb => gl::RGB,
            PixelFormat::Rgba => gl::RGBA,
        }
    }
}

impl From<PixelType> for GLenum {
    fn from(pixel_type: PixelType) -> Self {
        match pixel_type {
            PixelType::UnsignedByte => gl::UNSIGNED_BYTE,
            PixelType::HalfFloat => gl::HALF_FLOAT,
            PixelType::Float => gl::FLOAT,
        }
    }
}

impl From<TextureParameter> for GLenum {
    fn from(param: TextureParameter) -> Self {
        match param {
            TextureParameter::MinFilter => gl::TEXTURE_MIN_FILTER,
            TextureParameter::MagFilter => gl::TEXTURE_MAG_FILTER,
            TextureParameter::WrapS => gl::TEXTURE_WRAP_S,
            TextureParameter::WrapT => gl::TEXTURE_WRAP_T,
            TextureParameter::WrapR => gl::TEXTURE_WRAP_R,
        }
    }
}

impl From<TextureParameterValue> for GLenum {
    fn from(value: TextureParameterValue) -> Self {
        match value {
            TextureParameterValue::Nearest => gl::NEAREST,
            TextureParameterValue::Linear => gl::LINEAR,
            TextureParameterValue::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
            TextureParameterValue::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
            TextureParameterValue::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
            TextureParameterValue::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
            TextureParameterValue::Repeat => gl::REPEAT,
            TextureParameterValue::MirroredRepeat => gl::MIRRORED_REPEAT,
            TextureParameterValue::ClampToEdge => gl::CLAMP_TO_EDGE,
        }
    }
}

/// Maps a value read back with `glGetTexParameteriv`.
pub fn texture_parameter_value(value: GLenum) -> Result<TextureParameterValue> {
    use crate::video::texture::TextureParameterValue as V;

    let v = match value {
        gl::NEAREST => V::Nearest,
        gl::LINEAR => V::Linear,
        gl::NEAREST_MIPMAP_NEAREST => V::NearestMipmapNearest,
        gl::LINEAR_MIPMAP_NEAREST => V::LinearMipmapNearest,
        gl::NEAREST_MIPMAP_LINEAR => V::NearestMipmapLinear,
        gl::LINEAR_MIPMAP_LINEAR => V::LinearMipmapLinear,
        gl::REPEAT => V::Repeat,
        gl::MIRRORED_REPEAT => V::MirroredRepeat,
        gl::CLAMP_TO_EDGE => V::ClampToEdge,
        _ => {
            return Err(Error::Backend(format!(
                "[GL] Unrecognized texture parameter value {:#x}.",
                value
            )))
        }
    };

    Ok(v)
}
