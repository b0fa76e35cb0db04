//! # What is This?
//!
//! lazytex wraps GPU texture objects of an immediate-mode, OpenGL style
//! renderer with deferred (a.k.a. lazy) loading. Textures can be created and
//! handed data, storage and sampling parameters at any time, even before any
//! rendering context exists. The description is only turned into driver
//! calls when the texture is activated against a `Context`.
//!
//! ```rust,ignore
//! use lazytex::prelude::*;
//!
//! let mut texture = Texture::new_2d();
//! texture.set_data(TextureData::from_vec(&[4, 4, 3], pixels)?, UploadParams::default())?;
//! texture.set_parameter("wrap_s", "clamp_to_edge")?;
//!
//! // Later on, with a current rendering context.
//! let visitor = unsafe { lazytex::video::backends::new(loader)? };
//! let ctx = unsafe { Context::new(visitor, ContextSettings::default()) };
//! {
//!     let guard = texture.unit(0).bind(&ctx)?;
//!     // issue draw calls ...
//! }
//! ```
//!
//! Numeric arrays of any element kind are accepted; they are converted into
//! one of the kinds the driver can consume (`u8`, `f16`, `f32`) right before
//! uploading, optionally rescaled through contrast limits.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate bytemuck;
extern crate half;
extern crate serde;
extern crate serde_json;
extern crate smallvec;

#[cfg(not(target_arch = "wasm32"))]
extern crate gl;

pub mod errors;
pub mod settings;
pub mod utils;
pub mod video;

pub mod prelude;
