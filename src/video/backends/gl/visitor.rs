use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use crate::errors::*;
use crate::video::backends::{Capability, Visitor};
use crate::video::texture::{PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue};

use super::capabilities::Capabilities;
use super::types;

pub struct GLVisitor {
    capabilities: Capabilities,
}

impl GLVisitor {
    /// Creates a visitor for the context that is current on this thread, whose
    /// function pointers have already been loaded.
    ///
    /// # Safety
    ///
    /// The context must stay current on this thread while the visitor is in use.
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        info!("GLVisitor {:#?}", capabilities);
        Ok(GLVisitor { capabilities })
    }

    /// Loads the function pointers with `loader` before creating the visitor.
    ///
    /// # Safety
    ///
    /// See `GLVisitor::new`.
    pub unsafe fn load_with<F>(mut loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        gl::load_with(|symbol| loader(symbol));
        GLVisitor::new()
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

impl Visitor for GLVisitor {
    unsafe fn capability(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }

    unsafe fn create_texture(&mut self) -> Result<u32> {
        let mut id = 0;
        gl::GenTextures(1, &mut id);
        check()?;
        Ok(id)
    }

    unsafe fn delete_texture(&mut self, id: u32) -> Result<()> {
        gl::DeleteTextures(1, &id);
        check()
    }

    unsafe fn is_texture(&mut self, id: u32) -> bool {
        gl::IsTexture(id) == gl::TRUE
    }

    unsafe fn active_texture(&mut self, unit: u32) -> Result<()> {
        if unit >= self.capabilities.max_combined_texture_image_units {
            return Err(Error::Backend(format!(
                "[GL] Texture unit {} exceeds the {} available units.",
                unit, self.capabilities.max_combined_texture_image_units
            )));
        }

        gl::ActiveTexture(gl::TEXTURE0 + unit);
        check()
    }

    unsafe fn bind_texture(&mut self, target: Target, id: u32) -> Result<()> {
        gl::BindTexture(target.into(), id);
        check()
    }

    unsafe fn set_unpack_alignment(&mut self, alignment: u32) -> Result<()> {
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, alignment as GLint);
        check()
    }

    unsafe fn tex_image(
        &mut self,
        target: Target,
        level: u32,
        format: PixelFormat,
        size: &[u32],
        pixel_type: PixelType,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let format: GLenum = format.into();
        let pixel_type: GLenum = pixel_type.into();
        let data = data.map_or(ptr::null(), |v| v.as_ptr() as *const c_void);

        match (target, size) {
            (Target::Texture2D, &[width, height]) => gl::TexImage2D(
                gl::TEXTURE_2D,
                level as GLint,
                format as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                format,
                pixel_type,
                data,
            ),
            (Target::Texture3D, &[width, height, depth]) => gl::TexImage3D(
                gl::TEXTURE_3D,
                level as GLint,
                format as GLint,
                width as GLsizei,
                height as GLsizei,
                depth as GLsizei,
                0,
                format,
                pixel_type,
                data,
            ),
            _ => {
                return Err(Error::Backend(format!(
                    "[GL] Can not allocate {:?} with size {:?}.",
                    target, size
                )))
            }
        }

        check()
    }

    unsafe fn tex_sub_image(
        &mut self,
        target: Target,
        level: u32,
        offset: &[u32],
        size: &[u32],
        format: PixelFormat,
        pixel_type: PixelType,
        data: &[u8],
    ) -> Result<()> {
        let format: GLenum = format.into();
        let pixel_type: GLenum = pixel_type.into();
        let data = data.as_ptr() as *const c_void;

        match (target, offset, size) {
            (Target::Texture2D, &[x, y], &[width, height]) => gl::TexSubImage2D(
                gl::TEXTURE_2D,
                level as GLint,
                x as GLint,
                y as GLint,
                width as GLsizei,
                height as GLsizei,
                format,
                pixel_type,
                data,
            ),
            (Target::Texture3D, &[x, y, z], &[width, height, depth]) => gl::TexSubImage3D(
                gl::TEXTURE_3D,
                level as GLint,
                x as GLint,
                y as GLint,
                z as GLint,
                width as GLsizei,
                height as GLsizei,
                depth as GLsizei,
                format,
                pixel_type,
                data,
            ),
            _ => {
                return Err(Error::Backend(format!(
                    "[GL] Can not update {:?} at {:?} with size {:?}.",
                    target, offset, size
                )))
            }
        }

        check()
    }

    unsafe fn tex_parameter(
        &mut self,
        target: Target,
        param: TextureParameter,
        value: TextureParameterValue,
    ) -> Result<()> {
        let value: GLenum = value.into();
        gl::TexParameteri(target.into(), param.into(), value as GLint);
        check()
    }

    unsafe fn get_tex_parameter(
        &mut self,
        target: Target,
        param: TextureParameter,
    ) -> Result<TextureParameterValue> {
        let mut value = 0;
        gl::GetTexParameteriv(target.into(), param.into(), &mut value);
        check()?;
        types::texture_parameter_value(value as GLenum)
    }

    unsafe fn enable(&mut self, target: Target) -> Result<()> {
        if self.capabilities.has_target_toggles() {
            gl::Enable(target.into());
            check()?;
        }

        Ok(())
    }

    unsafe fn disable(&mut self, target: Target) -> Result<()> {
        if self.capabilities.has_target_toggles() {
            gl::Disable(target.into());
            check()?;
        }

        Ok(())
    }
}

unsafe fn check() -> Result<()> {
    let msg = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "[GL] An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "[GL] A numeric argument is out of range.",
        gl::INVALID_OPERATION => {
            "[GL] The specified operation is not allowed in the current state."
        }
        gl::OUT_OF_MEMORY => "[GL] There is not enough memory left to execute the command.",
        _ => "[GL] Oops, Unknown OpenGL error.",
    };

    Err(Error::Backend(msg.to_owned()))
}
