//! Textures with deferred loading.
//!
//! A `Texture` can be described at any time, even when there is no
//! rendering context around. Content, storage and parameters are only
//! recorded; the pending description is reconciled with the driver at the
//! next activation, which also decides between a full reallocation and the
//! much cheaper partial update.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::mem;
use std::ops::Deref;

use crate::errors::*;
use crate::video::Context;

use super::convert;
use super::data::{Shape, TextureData};
use super::format;
use super::raw::{GpuHandle, RawTexture};
use super::types::*;

/// Optional arguments of `Texture::set_data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadParams {
    /// Writes the data into a sub-region starting at this offset, given in
    /// the axis order of the data. Requires an existing image.
    pub offset: Option<Vec<usize>>,
    /// The mipmap level.
    pub level: u32,
    /// Deduced from the shape of the data if none.
    pub format: Option<PixelFormat>,
    /// The window of values mapped onto `[0, 1]`. Integer data defaults to
    /// the range of its element kind.
    pub contrast_limits: Option<ContrastLimits>,
}

#[derive(Debug)]
struct PendingUpload {
    /// None for storage-only descriptions.
    data: Option<TextureData>,
    shape: Shape,
    offset: Option<Shape>,
    /// The offset was not asked for, the data just matched the current shape.
    in_place: bool,
    level: u32,
    format: Option<PixelFormat>,
    contrast_limits: Option<ContrastLimits>,
}

#[derive(Debug)]
pub struct Texture {
    raw: RawTexture,
    pending: Option<PendingUpload>,
    shape: Option<Shape>,
    params: BTreeMap<TextureParameter, TextureParameterValue>,
    pending_params: BTreeMap<TextureParameter, TextureParameterValue>,
    unit: Option<u32>,
}

impl Texture {
    /// Creates an empty texture of `target`.
    pub fn new(target: Target) -> Result<Self> {
        if target.dimensions().is_none() {
            return Err(Error::UnsupportedTarget(format!("{}", target)));
        }

        Ok(Texture::construct(target))
    }

    pub fn new_2d() -> Self {
        Texture::construct(Target::Texture2D)
    }

    pub fn new_3d() -> Self {
        Texture::construct(Target::Texture3D)
    }

    fn construct(target: Target) -> Self {
        let mut texture = Texture {
            raw: RawTexture::new(target),
            pending: None,
            shape: None,
            params: BTreeMap::new(),
            pending_params: BTreeMap::new(),
            unit: None,
        };

        // The driver defaults to a mipmapped minification filter, which
        // would render textures without mipmaps black.
        for &param in &[TextureParameter::MinFilter, TextureParameter::MagFilter] {
            texture.params.insert(param, TextureParameterValue::Linear);
            texture.pending_params.insert(param, TextureParameterValue::Linear);
        }

        texture
    }

    /// Creates a texture of `target` with `data` as its initial content.
    pub fn with_data(target: Target, data: TextureData, params: UploadParams) -> Result<Self> {
        let mut texture = Texture::new(target)?;
        texture.set_data(data, params)?;
        Ok(texture)
    }

    /// Creates a texture of `target` with storage of `shape` but no content.
    pub fn with_storage(
        target: Target,
        shape: &[usize],
        format: Option<PixelFormat>,
    ) -> Result<Self> {
        let mut texture = Texture::new(target)?;
        texture.set_storage(shape, 0, format)?;
        Ok(texture)
    }

    #[inline]
    pub fn target(&self) -> Target {
        self.raw.target()
    }

    /// The shape of the last full description, if any.
    #[inline]
    pub fn shape(&self) -> Option<&[usize]> {
        self.shape.as_ref().map(|v| &v[..])
    }

    #[inline]
    pub fn handle(&self) -> GpuHandle {
        self.raw.handle()
    }

    #[inline]
    pub fn raw(&self) -> &RawTexture {
        &self.raw
    }

    /// Returns true if content or storage waits for the next activation.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn is_errored(&self) -> bool {
        self.raw.handle().is_errored()
    }

    /// The value most recently set for `param`.
    pub fn parameter(&self, param: TextureParameter) -> Option<TextureParameterValue> {
        self.params.get(&param).cloned()
    }

    /// Sets a sampling parameter, which can be done at any time. Both `param`
    /// and `value` can be given symbolically or by name, e.g.
    /// `set_parameter("wrap_s", "clamp_to_edge")`.
    pub fn set_parameter<P, V>(&mut self, param: P, value: V) -> Result<()>
    where
        P: IntoTextureParameter,
        V: IntoTextureParameterValue,
    {
        let param = param.into_texture_parameter()?;
        let value = value.into_texture_parameter_value()?;

        if !param.accepts(value) {
            return Err(Error::InvalidParameterValue(
                format!("{}", value),
                format!("{}", param),
            ));
        }

        // Everything ever set is kept, since a reallocation resets the
        // parameters on the driver side.
        self.params.insert(param, value);
        self.pending_params.insert(param, value);
        Ok(())
    }

    /// Sets the content of this texture, which can be done at any time.
    ///
    /// Without an explicit offset, data of the same shape as the current
    /// content of a live texture is written with a partial update instead of
    /// a reallocation.
    pub fn set_data(&mut self, data: TextureData, params: UploadParams) -> Result<()> {
        let ndim = self.dimensions()?;
        let shape = Shape::from_slice(data.shape());
        check_rank(&shape, ndim)?;

        if let Some(ref offset) = params.offset {
            if offset.len() != ndim {
                return Err(Error::InvalidOffset(
                    offset.clone(),
                    format!("expected {} dimensions", ndim),
                ));
            }
        }

        match params.format {
            Some(format) => check_format(&shape, ndim, format)?,
            None => {
                format::infer_format(&shape, self.target())?;
            }
        }

        if let Some((min, max)) = params.contrast_limits {
            if !min.is_finite() || !max.is_finite() || min == max {
                return Err(Error::InvalidContrastLimits(min, max));
            }
        }

        self.recover();

        let mut in_place = false;
        let offset = match params.offset {
            Some(offset) => Some(Shape::from_vec(offset)),
            None => {
                in_place = self.raw.handle().is_live() && self.shape.as_ref() == Some(&shape);
                self.shape = Some(shape.clone());

                if in_place {
                    Some(Shape::from_elem(0, ndim))
                } else {
                    None
                }
            }
        };

        self.pending = Some(PendingUpload {
            data: Some(data),
            shape,
            offset,
            in_place,
            level: params.level,
            format: params.format,
            contrast_limits: params.contrast_limits,
        });

        Ok(())
    }

    /// Allocates storage of `shape` without content, e.g. for textures that
    /// are rendered into. Does nothing if only the shape is given and the
    /// spatial dimensions already match the current ones.
    pub fn set_storage(
        &mut self,
        shape: &[usize],
        level: u32,
        format: Option<PixelFormat>,
    ) -> Result<()> {
        let ndim = self.dimensions()?;
        check_rank(shape, ndim)?;

        if shape.iter().any(|&v| v == 0) {
            return Err(Error::InvalidShape(
                shape.to_vec(),
                "dimensions must be positive".into(),
            ));
        }

        match format {
            Some(format) => check_format(shape, ndim, format)?,
            None => {
                format::infer_format(shape, self.target())?;
            }
        }

        self.recover();

        if level == 0 && format.is_none() {
            if let Some(ref current) = self.shape {
                if current[..ndim] == shape[..ndim] {
                    return Ok(());
                }
            }
        }

        let shape = Shape::from_slice(shape);
        self.shape = Some(shape.clone());
        self.pending = Some(PendingUpload {
            data: None,
            shape,
            offset: None,
            in_place: false,
            level,
            format,
            contrast_limits: None,
        });

        Ok(())
    }

    /// Selects the texture unit used by the next activation only.
    pub fn unit(&mut self, unit: u32) -> &mut Self {
        self.unit = Some(unit);
        self
    }

    /// Reconciles the pending description with the driver and binds the
    /// texture.
    ///
    /// Malformed descriptions are reported as errors. Missing capabilities
    /// and driver failures put the texture into the errored state instead,
    /// which makes every further activation a no-op until the texture is
    /// described again. A texture that never got any content is not bound.
    pub fn activate(&mut self, ctx: &Context) -> Result<()> {
        let unit = self.unit.take();

        if self.raw.handle().is_errored() {
            return Ok(());
        }

        if self.raw.is_stale(ctx) {
            self.forget_stale();
        }

        if let Some(capability) = self.target().requirement() {
            if !ctx.capability_available(capability) {
                self.fail(ctx, &Error::Requirement(capability));
                return Ok(());
            }
        }

        if let Some(pending) = self.pending.take() {
            if let Err(err) = self.reconcile(ctx, pending) {
                if err.is_configuration() {
                    return Err(err);
                }

                self.fail(ctx, &err);
                return Ok(());
            }

            if !self.raw.is_valid(ctx) {
                let err = Error::Backend("the texture is not valid".into());
                self.fail(ctx, &err);
                return Ok(());
            }
        }

        if !self.raw.handle().is_live() {
            return Ok(());
        }

        if let Err(err) = self.bind_and_flush(ctx, unit) {
            self.fail(ctx, &err);
        }

        Ok(())
    }

    /// Undoes the binding of `activate`.
    pub fn deactivate(&mut self, ctx: &Context) -> Result<()> {
        self.raw.unbind(ctx)
    }

    /// Activates the texture for the lifetime of the returned guard.
    pub fn bind<'a>(&'a mut self, ctx: &'a Context) -> Result<TextureGuard<'a>> {
        self.activate(ctx)?;
        Ok(TextureGuard { texture: self, ctx })
    }

    /// Releases the texture object. The description is kept except for the
    /// content, which has to be set again before the next upload.
    pub fn delete(&mut self, ctx: &Context) {
        self.raw.destroy(ctx);
    }

    /// Reads the current value of `param` back from the driver.
    pub fn query_parameter(
        &self,
        ctx: &Context,
        param: TextureParameter,
    ) -> Result<TextureParameterValue> {
        self.raw.query_parameter(ctx, param)
    }

    fn dimensions(&self) -> Result<usize> {
        let target = self.target();
        target
            .dimensions()
            .ok_or_else(|| Error::UnsupportedTarget(format!("{}", target)))
    }

    /// Leaves the errored state, forgetting everything known about the
    /// content.
    fn recover(&mut self) {
        if self.raw.handle().is_errored() {
            self.raw.reset();
            self.shape = None;
        }
    }

    /// Starts over from the description after the name went away with its
    /// context. Content that was not pending is lost.
    fn forget_stale(&mut self) {
        debug!(
            "[Texture] {} texture {:?} was released with its context.",
            self.target(),
            self.raw.handle()
        );

        self.raw.forget();
        self.shape = None;

        if let Some(ref mut pending) = self.pending {
            if pending.in_place {
                pending.offset = None;
                pending.in_place = false;
            }

            if pending.offset.is_none() {
                self.shape = Some(pending.shape.clone());
            }
        }
    }

    fn fail(&mut self, ctx: &Context, err: &Error) {
        warn!(
            "[Texture] {} texture is disabled until it gets new content: {}",
            self.target(),
            err
        );

        self.raw.destroy(ctx);
        self.raw.set_errored();
    }

    fn reconcile(&mut self, ctx: &Context, pending: PendingUpload) -> Result<()> {
        let target = self.target();
        let data = match pending.data {
            Some(ref data) => Some(convert_data(ctx, data, pending.contrast_limits)?),
            None => None,
        };

        let shape = data.as_ref().map_or(&pending.shape[..], |v| v.shape());
        let format = match pending.format {
            Some(format) => format,
            None => format::infer_format(shape, target)?,
        };

        match (pending.offset.as_ref(), data.as_ref()) {
            (Some(offset), Some(data)) => {
                self.raw.attach(ctx)?;
                if !self.raw.is_valid(ctx) {
                    return Err(Error::NoTexture);
                }

                self.raw.update(ctx, &**data, offset, format, pending.level)
            }
            (_, data) => {
                // Some drivers leak memory when an existing texture is
                // reallocated in place.
                self.raw.destroy(ctx);
                self.raw.create(ctx)?;
                if !self.raw.handle().is_live() {
                    return Err(Error::Backend(
                        "the driver did not create a texture object".into(),
                    ));
                }

                self.raw.attach(ctx)?;
                match data {
                    Some(data) => self.raw.upload(ctx, &**data, format, pending.level)?,
                    None => self.raw.allocate(ctx, shape, format, pending.level)?,
                }

                for (&param, &value) in &self.params {
                    ctx.tex_parameter(target, param, value)?;
                }

                self.pending_params.clear();
                Ok(())
            }
        }
    }

    fn bind_and_flush(&mut self, ctx: &Context, unit: Option<u32>) -> Result<()> {
        self.raw.bind(ctx, unit)?;

        let target = self.target();
        let params = mem::replace(&mut self.pending_params, BTreeMap::new());
        for (param, value) in params {
            trace!("[Texture] sets {} of {} to {}.", param, target, value);
            ctx.tex_parameter(target, param, value)?;
        }

        Ok(())
    }
}

/// Keeps a `Texture` activated, deactivating it when dropped.
pub struct TextureGuard<'a> {
    texture: &'a mut Texture,
    ctx: &'a Context,
}

impl<'a> Deref for TextureGuard<'a> {
    type Target = Texture;

    fn deref(&self) -> &Self::Target {
        &*self.texture
    }
}

impl<'a> Drop for TextureGuard<'a> {
    fn drop(&mut self) {
        if let Err(err) = self.texture.deactivate(self.ctx) {
            warn!("[Texture] failed to deactivate: {}", err);
        }
    }
}

fn convert_data<'a>(
    ctx: &Context,
    data: &'a TextureData,
    limits: Option<ContrastLimits>,
) -> Result<Cow<'a, TextureData>> {
    let converted = convert::convert_for_upload(data, limits, ctx.float_support())?;

    if ctx.settings().log_conversions {
        if let Cow::Owned(ref v) = converted {
            debug!(
                "[Texture] converted {:?} data of shape {:?} to {:?}.",
                data.kind(),
                data.shape(),
                v.kind()
            );
        }
    }

    Ok(converted)
}

fn check_rank(shape: &[usize], ndim: usize) -> Result<()> {
    if shape.len() == ndim || shape.len() == ndim + 1 {
        Ok(())
    } else {
        Err(Error::InvalidShape(
            shape.to_vec(),
            format!("expected {} or {} dimensions", ndim, ndim + 1),
        ))
    }
}

fn check_format(shape: &[usize], ndim: usize, format: PixelFormat) -> Result<()> {
    let channels = format::channels(shape, ndim);
    if channels == format.channels() {
        Ok(())
    } else {
        Err(Error::FormatMismatch(format!("{}", format), channels))
    }
}
