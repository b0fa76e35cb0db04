//! The thin layer right above the driver. A `RawTexture` owns one texture
//! name and knows how to bind it and how to push pixels into it, nothing
//! more. All the bookkeeping of what should be uploaded lives in `Texture`.

use crate::errors::*;
use crate::utils::finally;
use crate::video::Context;

use super::data::TextureData;
use super::format;
use super::types::{PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue};

/// The driver name of a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuHandle {
    /// No texture object has been created yet.
    Uninitialized,
    Live(u32),
    /// Something went wrong, no driver calls are issued until the texture is
    /// described again.
    Errored,
}

impl Default for GpuHandle {
    fn default() -> Self {
        GpuHandle::Uninitialized
    }
}

impl GpuHandle {
    #[inline]
    pub fn id(self) -> Option<u32> {
        match self {
            GpuHandle::Live(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_live(self) -> bool {
        self.id().is_some()
    }

    #[inline]
    pub fn is_errored(self) -> bool {
        self == GpuHandle::Errored
    }
}

#[derive(Debug)]
pub struct RawTexture {
    target: Target,
    handle: GpuHandle,
    unit: Option<u32>,
    bound: bool,
}

impl RawTexture {
    pub fn new(target: Target) -> Self {
        RawTexture {
            target,
            handle: GpuHandle::Uninitialized,
            unit: None,
            bound: false,
        }
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.target
    }

    #[inline]
    pub fn handle(&self) -> GpuHandle {
        self.handle
    }

    /// Returns true between a successful `bind` and the matching `unbind`.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub(crate) fn set_errored(&mut self) {
        self.handle = GpuHandle::Errored;
    }

    pub(crate) fn reset(&mut self) {
        self.handle = GpuHandle::Uninitialized;
    }

    /// Returns true if the handle names a texture that `ctx` does not track,
    /// i.e. one released together with the context that created it.
    pub(crate) fn is_stale(&self, ctx: &Context) -> bool {
        match self.handle {
            GpuHandle::Live(id) => !ctx.owns_texture(id),
            _ => false,
        }
    }

    /// Drops a stale handle and binding without any driver calls.
    pub(crate) fn forget(&mut self) {
        self.handle = GpuHandle::Uninitialized;
        self.unit = None;
        self.bound = false;
    }

    /// Generates a new texture name. If the driver hands out no name, the
    /// handle stays `Uninitialized`.
    pub fn create(&mut self, ctx: &Context) -> Result<()> {
        let id = ctx.create_texture()?;
        self.handle = if id > 0 {
            debug!("[RawTexture] created {} texture {}.", self.target, id);
            GpuHandle::Live(id)
        } else {
            GpuHandle::Uninitialized
        };

        Ok(())
    }

    /// Releases the texture name. Failures are swallowed, the handle is
    /// `Uninitialized` afterwards in any case. Calling it twice is fine.
    pub fn destroy(&mut self, ctx: &Context) {
        if let Err(err) = self.unbind(ctx) {
            debug!("[RawTexture] failed to unbind before deletion: {}", err);
        }

        if let GpuHandle::Live(id) = self.handle {
            if ctx.owns_texture(id) {
                debug!("[RawTexture] deletes {} texture {}.", self.target, id);
                if let Err(err) = ctx.delete_texture(id) {
                    debug!("[RawTexture] failed to delete texture {}: {}", id, err);
                }
            } else {
                debug!("[RawTexture] texture {} went away with its context.", id);
            }
        }

        self.handle = GpuHandle::Uninitialized;
    }

    /// Makes this texture the current one of its target, on `unit` if some or
    /// on whatever unit is active otherwise. The enable toggle of the target
    /// is held until `unbind`.
    pub fn bind(&mut self, ctx: &Context, unit: Option<u32>) -> Result<()> {
        let id = self.live_id(ctx)?;

        if !self.bound {
            ctx.acquire(self.target)?;
            self.bound = true;
        }

        self.unit = unit;
        let result = unit
            .map_or(Ok(()), |unit| ctx.active_texture(unit))
            .and_then(|_| ctx.bind_texture(self.target, id));

        if let Err(err) = result {
            self.unbind(ctx).ok();
            return Err(err);
        }

        trace!("[RawTexture] binds texture {} on unit {:?}.", id, unit);
        Ok(())
    }

    /// Undoes `bind`: unbinds the target on the unit it was bound to, selects
    /// unit 0 and releases the enable toggle. Does nothing if the texture is
    /// not bound.
    pub fn unbind(&mut self, ctx: &Context) -> Result<()> {
        if !self.bound {
            return Ok(());
        }

        // The toggle was acquired on a context that is gone.
        if self.is_stale(ctx) {
            self.bound = false;
            self.unit = None;
            return Ok(());
        }

        self.bound = false;
        let unit = self.unit.take();

        let result = unit
            .map_or(Ok(()), |unit| ctx.active_texture(unit))
            .and_then(|_| ctx.bind_texture(self.target, 0))
            .and_then(|_| ctx.active_texture(0));

        let released = ctx.release(self.target);
        trace!("[RawTexture] unbinds {} from unit {:?}.", self.target, unit);
        result.and(released)
    }

    /// Binds the name on the active unit without any bookkeeping, so the
    /// following allocate, upload or update calls hit this texture.
    pub(crate) fn attach(&self, ctx: &Context) -> Result<()> {
        let id = self.live_id(ctx)?;
        ctx.bind_texture(self.target, id)
    }

    fn live_id(&self, ctx: &Context) -> Result<u32> {
        match self.handle {
            GpuHandle::Live(id) if ctx.owns_texture(id) => Ok(id),
            _ => Err(Error::NoTexture),
        }
    }

    /// Returns true if the handle names a texture object the driver knows.
    pub(crate) fn is_valid(&self, ctx: &Context) -> bool {
        match self.handle {
            GpuHandle::Live(id) => ctx.owns_texture(id) && ctx.is_texture(id),
            _ => false,
        }
    }

    /// Allocates an image of `shape` at `level` without content. The texture
    /// must be attached.
    pub fn allocate(
        &self,
        ctx: &Context,
        shape: &[usize],
        format: PixelFormat,
        level: u32,
    ) -> Result<()> {
        let ndim = self.dimensions(shape)?;
        let size = reversed(&shape[..ndim]);

        debug!(
            "[RawTexture] allocates {:?} {} of {} at level {}.",
            size, format, self.target, level
        );

        ctx.tex_image(
            self.target,
            level,
            format,
            &size,
            PixelType::UnsignedByte,
            None,
        )
    }

    /// Replaces the image at `level` with `data`. The texture must be
    /// attached.
    pub fn upload(
        &self,
        ctx: &Context,
        data: &TextureData,
        format: PixelFormat,
        level: u32,
    ) -> Result<()> {
        let (size, pixel_type, bytes, row_bytes) = self.layout(ctx, data, format)?;

        debug!(
            "[RawTexture] uploads {:?} {} ({:?}) to {} at level {}.",
            size, format, pixel_type, self.target, level
        );

        with_alignment(ctx, row_bytes, || {
            ctx.tex_image(self.target, level, format, &size, pixel_type, Some(bytes))
        })
    }

    /// Writes `data` into the existing image at `level`, starting at `offset`
    /// which is given in the same axis order as the shape of `data`. The
    /// texture must be attached.
    pub fn update(
        &self,
        ctx: &Context,
        data: &TextureData,
        offset: &[usize],
        format: PixelFormat,
        level: u32,
    ) -> Result<()> {
        let (size, pixel_type, bytes, row_bytes) = self.layout(ctx, data, format)?;
        if offset.len() != size.len() {
            return Err(Error::InvalidOffset(
                offset.to_vec(),
                format!("expected {} dimensions", size.len()),
            ));
        }

        let offset = reversed(offset);

        debug!(
            "[RawTexture] updates {:?} {} at {:?} of {} at level {}.",
            size, format, offset, self.target, level
        );

        with_alignment(ctx, row_bytes, || {
            ctx.tex_sub_image(
                self.target,
                level,
                &offset,
                &size,
                format,
                pixel_type,
                bytes,
            )
        })
    }

    /// Reads the current value of `param` back from the driver.
    pub fn query_parameter(
        &self,
        ctx: &Context,
        param: TextureParameter,
    ) -> Result<TextureParameterValue> {
        self.attach(ctx)?;
        let value = ctx.get_tex_parameter(self.target, param);

        if !self.bound {
            ctx.bind_texture(self.target, 0)?;
        }

        value
    }

    fn dimensions(&self, shape: &[usize]) -> Result<usize> {
        let ndim = self
            .target
            .dimensions()
            .ok_or_else(|| Error::UnsupportedTarget(format!("{}", self.target)))?;

        if shape.len() != ndim && shape.len() != ndim + 1 {
            return Err(Error::InvalidShape(
                shape.to_vec(),
                format!("expected {} or {} dimensions", ndim, ndim + 1),
            ));
        }

        Ok(ndim)
    }

    /// Checks `data` against `format` and the driver, returning the size in
    /// driver order, the pixel type, the bytes and the length of a row in
    /// bytes.
    fn layout<'a>(
        &self,
        ctx: &Context,
        data: &'a TextureData,
        format: PixelFormat,
    ) -> Result<(Vec<u32>, PixelType, &'a [u8], usize)> {
        let shape = data.shape();
        let ndim = self.dimensions(shape)?;

        let pixel_type = data
            .kind()
            .pixel_type()
            .ok_or_else(|| Error::UnsupportedElementKind(data.kind()))?;

        if let Some(capability) = pixel_type.requirement() {
            if !ctx.capability_available(capability) {
                return Err(Error::Requirement(capability));
            }
        }

        let channels = format::channels(shape, ndim);
        if channels != format.channels() {
            return Err(Error::FormatMismatch(format!("{}", format), channels));
        }

        let bytes = data.as_bytes()?;
        let pixels: usize = shape[..ndim].iter().product();
        let expected = pixels * channels * pixel_type.size();
        if bytes.len() != expected {
            return Err(Error::InvalidShape(
                shape.to_vec(),
                format!("expected {} bytes, got {}", expected, bytes.len()),
            ));
        }

        let row_bytes = shape[ndim - 1] * channels * pixel_type.size();
        Ok((reversed(&shape[..ndim]), pixel_type, bytes, row_bytes))
    }
}

fn reversed(v: &[usize]) -> Vec<u32> {
    v.iter().rev().map(|&v| v as u32).collect()
}

/// Runs `func` with the unpack alignment suited for rows of `row_bytes`,
/// restoring the default of 4 afterwards even if `func` fails.
fn with_alignment<F>(ctx: &Context, row_bytes: usize, func: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let alignment = format::unpack_alignment(row_bytes);
    if alignment == 4 {
        return func();
    }

    ctx.set_unpack_alignment(alignment)?;
    let _restore = finally(ctx, |ctx| {
        if let Err(err) = ctx.set_unpack_alignment(4) {
            debug!("[RawTexture] failed to restore the unpack alignment: {}", err);
        }
    });

    func()
}
