//! Textures and the rendering context they are realized against.
//!
//! A `Context` owns the driver `Visitor` of one rendering context, the
//! reference counts of the enabled texture targets, and every texture name
//! created through it. Dropping the context releases the names that are
//! still alive.
//!
//! Textures are not tied to a context by lifetime. A texture that outlives
//! its context notices at the next activation that its name is gone and
//! starts over from its description. Names the next context happens to
//! reuse can not be told apart, so textures should be deleted or described
//! again when their context is replaced.

pub mod backends;
pub mod enable;
pub mod texture;

use std::cell::RefCell;
use std::collections::HashSet;

use crate::errors::*;
use crate::settings::ContextSettings;

use self::backends::headless::HeadlessVisitor;
use self::backends::{Capability, Visitor};
use self::enable::EnableCounter;
use self::texture::{FloatSupport, PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue};

pub struct Context {
    visitor: RefCell<Box<dyn Visitor>>,
    enables: RefCell<EnableCounter>,
    textures: RefCell<HashSet<u32>>,
    settings: ContextSettings,
}

impl Context {
    /// Creates a context on top of `visitor`.
    ///
    /// # Safety
    ///
    /// The safety contract of `visitor` must hold for the whole lifetime of the
    /// context, e.g. the OpenGL context it talks to must stay current.
    pub unsafe fn new(visitor: Box<dyn Visitor>, settings: ContextSettings) -> Self {
        Context {
            visitor: RefCell::new(visitor),
            enables: RefCell::new(EnableCounter::new()),
            textures: RefCell::new(HashSet::new()),
            settings,
        }
    }

    /// Creates a context without any graphics driver behind it.
    pub fn headless(visitor: HeadlessVisitor, settings: ContextSettings) -> Self {
        unsafe { Context::new(Box::new(visitor), settings) }
    }

    #[inline]
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Returns true if the driver supports `capability` and the settings do not
    /// switch it off.
    pub fn capability_available(&self, capability: Capability) -> bool {
        !self.settings.is_disabled(capability)
            && unsafe { self.visitor.borrow().capability(capability) }
    }

    /// Like `capability_available`, but with an extension style name such as
    /// `GL_texture_3D`. Unknown names are reported as unavailable.
    pub fn extension_available(&self, name: &str) -> bool {
        match name.parse() {
            Ok(capability) => self.capability_available(capability),
            Err(_) => false,
        }
    }

    /// The float element kinds that can be uploaded without conversion.
    pub fn float_support(&self) -> FloatSupport {
        FloatSupport {
            half: self.capability_available(Capability::HalfFloatTexture),
            float: self.capability_available(Capability::FloatTexture),
        }
    }

    /// How many active bindings currently hold the toggle of `target`.
    pub fn enable_count(&self, target: Target) -> u32 {
        self.enables.borrow().count(target)
    }

    /// The number of texture names created through this context that have not
    /// been deleted yet.
    pub fn live_textures(&self) -> usize {
        self.textures.borrow().len()
    }

    /// Returns true if `id` was created through this context and is still
    /// alive. Handles that fail this check belong to a context that is gone.
    pub(crate) fn owns_texture(&self, id: u32) -> bool {
        self.textures.borrow().contains(&id)
    }

    pub(crate) fn create_texture(&self) -> Result<u32> {
        let id = unsafe { self.visitor.borrow_mut().create_texture()? };
        if id > 0 {
            self.textures.borrow_mut().insert(id);
        }

        Ok(id)
    }

    /// Forgets `id` even if the driver fails to delete it.
    pub(crate) fn delete_texture(&self, id: u32) -> Result<()> {
        self.textures.borrow_mut().remove(&id);
        unsafe { self.visitor.borrow_mut().delete_texture(id) }
    }

    pub(crate) fn is_texture(&self, id: u32) -> bool {
        unsafe { self.visitor.borrow_mut().is_texture(id) }
    }

    pub(crate) fn active_texture(&self, unit: u32) -> Result<()> {
        unsafe { self.visitor.borrow_mut().active_texture(unit) }
    }

    pub(crate) fn bind_texture(&self, target: Target, id: u32) -> Result<()> {
        unsafe { self.visitor.borrow_mut().bind_texture(target, id) }
    }

    pub(crate) fn set_unpack_alignment(&self, alignment: u32) -> Result<()> {
        unsafe { self.visitor.borrow_mut().set_unpack_alignment(alignment) }
    }

    pub(crate) fn tex_image(
        &self,
        target: Target,
        level: u32,
        format: PixelFormat,
        size: &[u32],
        pixel_type: PixelType,
        data: Option<&[u8]>,
    ) -> Result<()> {
        unsafe {
            self.visitor
                .borrow_mut()
                .tex_image(target, level, format, size, pixel_type, data)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn tex_sub_image(
        &self,
        target: Target,
        level: u32,
        offset: &[u32],
        size: &[u32],
        format: PixelFormat,
        pixel_type: PixelType,
        data: &[u8],
    ) -> Result<()> {
        unsafe {
            self.visitor
                .borrow_mut()
                .tex_sub_image(target, level, offset, size, format, pixel_type, data)
        }
    }

    pub(crate) fn tex_parameter(
        &self,
        target: Target,
        param: TextureParameter,
        value: TextureParameterValue,
    ) -> Result<()> {
        unsafe { self.visitor.borrow_mut().tex_parameter(target, param, value) }
    }

    pub(crate) fn get_tex_parameter(
        &self,
        target: Target,
        param: TextureParameter,
    ) -> Result<TextureParameterValue> {
        unsafe { self.visitor.borrow_mut().get_tex_parameter(target, param) }
    }

    pub(crate) fn acquire(&self, target: Target) -> Result<()> {
        let mut visitor = self.visitor.borrow_mut();
        unsafe { self.enables.borrow_mut().acquire(&mut **visitor, target) }
    }

    pub(crate) fn release(&self, target: Target) -> Result<()> {
        let mut visitor = self.visitor.borrow_mut();
        unsafe { self.enables.borrow_mut().release(&mut **visitor, target) }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let textures: Vec<_> = self.textures.borrow_mut().drain().collect();
        if !textures.is_empty() {
            debug!("[Context] releases {} texture(s) on teardown.", textures.len());
        }

        for id in textures {
            // The driver might be gone already, at least we tried.
            if let Err(err) = unsafe { self.visitor.borrow_mut().delete_texture(id) } {
                debug!("[Context] failed to delete texture {}: {}", id, err);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::video::backends::headless::Call;

    #[test]
    fn capabilities() {
        let visitor = HeadlessVisitor::new().without(Capability::Texture3D);
        let settings = ContextSettings {
            disable_float: true,
            ..ContextSettings::default()
        };

        let ctx = Context::headless(visitor, settings);
        assert!(!ctx.capability_available(Capability::Texture3D));
        assert!(!ctx.capability_available(Capability::FloatTexture));
        assert!(ctx.capability_available(Capability::HalfFloatTexture));
        assert!(ctx.extension_available("texture_half_float"));
        assert!(!ctx.extension_available("GL_texture_3D"));
        assert!(!ctx.extension_available("bogus"));

        assert_eq!(
            ctx.float_support(),
            FloatSupport {
                half: true,
                float: false
            }
        );
    }

    #[test]
    fn teardown_releases_names() {
        let visitor = HeadlessVisitor::new();
        let log = visitor.log();

        let ctx = Context::headless(visitor, ContextSettings::default());
        let a = ctx.create_texture().unwrap();
        let b = ctx.create_texture().unwrap();
        ctx.delete_texture(a).unwrap();
        assert_eq!(ctx.live_textures(), 1);

        log.clear();
        drop(ctx);
        assert_eq!(log.take(), vec![Call::DeleteTexture(b)]);
    }

    #[test]
    fn teardown_swallows_errors() {
        let visitor = HeadlessVisitor::new().lost_on_delete();
        let log = visitor.log();

        let ctx = Context::headless(visitor, ContextSettings::default());
        ctx.create_texture().unwrap();
        ctx.create_texture().unwrap();
        drop(ctx);

        assert_eq!(log.count(|v| match *v {
            Call::DeleteTexture(_) => true,
            _ => false,
        }), 2);
    }
}
