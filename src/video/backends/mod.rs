//! The backend of textures, which should be responsible for only one thing:
//! issuing the low-level driver calls of an immediate-mode graphics API.
//!
//! Every call operates on whatever context is current, there is no explicit
//! context handle threaded through.

pub mod headless;

use std::str::FromStr;

use crate::errors::*;
use crate::video::texture::{PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue};

/// Optional driver features.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Capability {
    Texture3D,
    HalfFloatTexture,
    FloatTexture,
}

impl FromStr for Capability {
    type Err = Error;

    /// Parses extension style names like `texture_3D`, `GL_texture_3D`,
    /// `GL_OES_texture_half_float` or `texture_float`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        if name.ends_with("texture_3d") || name.ends_with("texture3d") {
            Ok(Capability::Texture3D)
        } else if name.ends_with("texture_half_float") {
            Ok(Capability::HalfFloatTexture)
        } else if name.ends_with("texture_float") {
            Ok(Capability::FloatTexture)
        } else {
            Err(Error::UnknownCapability(s.to_owned()))
        }
    }
}

/// The driver call surface used by textures.
///
/// # Safety
///
/// Implementations talk to a graphics driver directly. Callers must make
/// sure the context the visitor was created for is current on this thread.
pub trait Visitor {
    /// Returns true if the optional `capability` is supported.
    unsafe fn capability(&self, capability: Capability) -> bool;

    /// Generates a new texture name, 0 if the driver refused.
    unsafe fn create_texture(&mut self) -> Result<u32>;

    unsafe fn delete_texture(&mut self, id: u32) -> Result<()>;

    /// Returns true if `id` names a live texture object.
    unsafe fn is_texture(&mut self, id: u32) -> bool;

    /// Selects the active texture unit.
    unsafe fn active_texture(&mut self, unit: u32) -> Result<()>;

    /// Binds texture `id` to `target` on the active unit, 0 unbinds.
    unsafe fn bind_texture(&mut self, target: Target, id: u32) -> Result<()>;

    /// Sets the row alignment used when reading pixel data from client memory.
    unsafe fn set_unpack_alignment(&mut self, alignment: u32) -> Result<()>;

    /// (Re)allocates the image of `level` with `size` (x, y[, z]). Uploads
    /// `data` if some, otherwise the image content is undefined.
    unsafe fn tex_image(
        &mut self,
        target: Target,
        level: u32,
        format: PixelFormat,
        size: &[u32],
        pixel_type: PixelType,
        data: Option<&[u8]>,
    ) -> Result<()>;

    /// Writes `data` into the sub-region at `offset` (x, y[, z]) with `size`.
    unsafe fn tex_sub_image(
        &mut self,
        target: Target,
        level: u32,
        offset: &[u32],
        size: &[u32],
        format: PixelFormat,
        pixel_type: PixelType,
        data: &[u8],
    ) -> Result<()>;

    unsafe fn tex_parameter(
        &mut self,
        target: Target,
        param: TextureParameter,
        value: TextureParameterValue,
    ) -> Result<()>;

    unsafe fn get_tex_parameter(
        &mut self,
        target: Target,
        param: TextureParameter,
    ) -> Result<TextureParameterValue>;

    /// Asserts the enable toggle of `target`.
    unsafe fn enable(&mut self, target: Target) -> Result<()>;

    /// Clears the enable toggle of `target`.
    unsafe fn disable(&mut self, target: Target) -> Result<()>;
}

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

/// Creates a visitor for the OpenGL context current on this thread, loading
/// function pointers with `loader`.
///
/// # Safety
///
/// The context must stay current on this thread while the visitor is in use.
#[cfg(not(target_arch = "wasm32"))]
pub unsafe fn new<F>(loader: F) -> Result<Box<dyn Visitor>>
where
    F: FnMut(&str) -> *const ::std::os::raw::c_void,
{
    let visitor = self::gl::visitor::GLVisitor::load_with(loader)?;
    Ok(Box::new(visitor))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capability_names() {
        assert_eq!("texture_3D".parse::<Capability>().unwrap(), Capability::Texture3D);
        assert_eq!("GL_texture_3D".parse::<Capability>().unwrap(), Capability::Texture3D);
        assert_eq!("GL_EXT_texture3D".parse::<Capability>().unwrap(), Capability::Texture3D);
        assert_eq!(
            "GL_OES_texture_half_float".parse::<Capability>().unwrap(),
            Capability::HalfFloatTexture
        );
        assert_eq!(
            "texture_float".parse::<Capability>().unwrap(),
            Capability::FloatTexture
        );
        assert!("texture_compression_s3tc".parse::<Capability>().is_err());
    }
}
