//! A visitor without any graphics driver behind it. It simulates texture
//! objects in memory and records every call, which makes it the backend of
//! choice for headless runs and tests.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::errors::*;
use crate::video::texture::{PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue};

use super::{Capability, Visitor};

/// A driver call as seen by the `HeadlessVisitor`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTexture(u32),
    DeleteTexture(u32),
    IsTexture(u32),
    ActiveTexture(u32),
    BindTexture(Target, u32),
    UnpackAlignment(u32),
    TexImage {
        target: Target,
        level: u32,
        format: PixelFormat,
        size: Vec<u32>,
        pixel_type: PixelType,
        data: Option<Vec<u8>>,
    },
    TexSubImage {
        target: Target,
        level: u32,
        offset: Vec<u32>,
        size: Vec<u32>,
        format: PixelFormat,
        pixel_type: PixelType,
        data: Vec<u8>,
    },
    TexParameter(Target, TextureParameter, TextureParameterValue),
    GetTexParameter(Target, TextureParameter),
    Enable(Target),
    Disable(Target),
}

impl Call {
    pub fn is_tex_image(&self) -> bool {
        match *self {
            Call::TexImage { .. } => true,
            _ => false,
        }
    }

    pub fn is_tex_sub_image(&self) -> bool {
        match *self {
            Call::TexSubImage { .. } => true,
            _ => false,
        }
    }
}

/// A shared handle to the calls recorded by a `HeadlessVisitor`. It stays
/// readable after the visitor has been boxed into a `Context`.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Ref<Vec<Call>> {
        self.0.borrow()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Counts the recorded calls matching `predicate`.
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.0.borrow().iter().filter(|v| predicate(v)).count()
    }

    /// Returns the recorded calls and starts over.
    pub fn take(&self) -> Vec<Call> {
        ::std::mem::replace(&mut *self.0.borrow_mut(), Vec::new())
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

pub struct HeadlessVisitor {
    log: CallLog,
    capabilities: HashSet<Capability>,
    textures: HashMap<u32, HashMap<TextureParameter, TextureParameterValue>>,
    bindings: HashMap<(u32, Target), u32>,
    active_unit: u32,
    next_id: u32,
    refuse_creation: bool,
    lost: bool,
}

impl Default for HeadlessVisitor {
    fn default() -> Self {
        HeadlessVisitor::new()
    }
}

impl HeadlessVisitor {
    /// Creates a visitor supporting every optional capability.
    pub fn new() -> Self {
        let capabilities = [
            Capability::Texture3D,
            Capability::HalfFloatTexture,
            Capability::FloatTexture,
        ]
        .iter()
        .cloned()
        .collect();

        HeadlessVisitor {
            log: CallLog::default(),
            capabilities,
            textures: HashMap::new(),
            bindings: HashMap::new(),
            active_unit: 0,
            next_id: 1,
            refuse_creation: false,
            lost: false,
        }
    }

    /// Reports `capability` as unavailable.
    pub fn without(mut self, capability: Capability) -> Self {
        self.capabilities.remove(&capability);
        self
    }

    /// Makes texture creation hand out the name 0, like a driver that ran out
    /// of resources.
    pub fn refuse_creation(mut self) -> Self {
        self.refuse_creation = true;
        self
    }

    /// Makes deletions fail, like a context that has already been destroyed.
    pub fn lost_on_delete(mut self) -> Self {
        self.lost = true;
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn bound(&self, target: Target) -> Result<u32> {
        match self.bindings.get(&(self.active_unit, target)) {
            Some(&id) if id != 0 => Ok(id),
            _ => Err(Error::Backend(format!(
                "No texture bound to {} on unit {}.",
                target, self.active_unit
            ))),
        }
    }
}

impl Visitor for HeadlessVisitor {
    unsafe fn capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    unsafe fn create_texture(&mut self) -> Result<u32> {
        let id = if self.refuse_creation {
            0
        } else {
            let id = self.next_id;
            self.next_id += 1;
            self.textures.insert(id, HashMap::new());
            id
        };

        self.log.push(Call::CreateTexture(id));
        Ok(id)
    }

    unsafe fn delete_texture(&mut self, id: u32) -> Result<()> {
        self.log.push(Call::DeleteTexture(id));

        if self.lost {
            bail_backend("The context has been destroyed.")
        } else {
            self.textures.remove(&id);
            self.bindings.retain(|_, v| *v != id);
            Ok(())
        }
    }

    unsafe fn is_texture(&mut self, id: u32) -> bool {
        self.log.push(Call::IsTexture(id));
        self.textures.contains_key(&id)
    }

    unsafe fn active_texture(&mut self, unit: u32) -> Result<()> {
        self.log.push(Call::ActiveTexture(unit));
        self.active_unit = unit;
        Ok(())
    }

    unsafe fn bind_texture(&mut self, target: Target, id: u32) -> Result<()> {
        self.log.push(Call::BindTexture(target, id));

        if id != 0 && !self.textures.contains_key(&id) {
            return bail_backend("Binding an invalid texture name.");
        }

        self.bindings.insert((self.active_unit, target), id);
        Ok(())
    }

    unsafe fn set_unpack_alignment(&mut self, alignment: u32) -> Result<()> {
        self.log.push(Call::UnpackAlignment(alignment));
        Ok(())
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
        self.log.push(Call::TexImage {
            target,
            level,
            format,
            size: size.to_vec(),
            pixel_type,
            data: data.map(|v| v.to_vec()),
        });

        self.bound(target).map(|_| ())
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
        self.log.push(Call::TexSubImage {
            target,
            level,
            offset: offset.to_vec(),
            size: size.to_vec(),
            format,
            pixel_type,
            data: data.to_vec(),
        });

        self.bound(target).map(|_| ())
    }

    unsafe fn tex_parameter(
        &mut self,
        target: Target,
        param: TextureParameter,
        value: TextureParameterValue,
    ) -> Result<()> {
        self.log.push(Call::TexParameter(target, param, value));

        let id = self.bound(target)?;
        if let Some(params) = self.textures.get_mut(&id) {
            params.insert(param, value);
        }

        Ok(())
    }

    unsafe fn get_tex_parameter(
        &mut self,
        target: Target,
        param: TextureParameter,
    ) -> Result<TextureParameterValue> {
        self.log.push(Call::GetTexParameter(target, param));

        let id = self.bound(target)?;
        let value = self.textures.get(&id).and_then(|v| v.get(&param)).cloned();
        Ok(value.unwrap_or_else(|| match param {
            TextureParameter::MinFilter => TextureParameterValue::NearestMipmapLinear,
            TextureParameter::MagFilter => TextureParameterValue::Linear,
            _ => TextureParameterValue::Repeat,
        }))
    }

    unsafe fn enable(&mut self, target: Target) -> Result<()> {
        self.log.push(Call::Enable(target));
        Ok(())
    }

    unsafe fn disable(&mut self, target: Target) -> Result<()> {
        self.log.push(Call::Disable(target));
        Ok(())
    }
}

fn bail_backend<T>(msg: &str) -> Result<T> {
    Err(Error::Backend(msg.to_owned()))
}
