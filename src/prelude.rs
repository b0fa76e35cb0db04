pub use crate::errors::{Error, Result};
pub use crate::settings::ContextSettings;

pub use crate::video::backends::headless::{Call, CallLog, HeadlessVisitor};
pub use crate::video::backends::{Capability, Visitor};
pub use crate::video::texture::prelude::*;
pub use crate::video::Context;
