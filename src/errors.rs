use crate::video::backends::Capability;
use crate::video::texture::ElementKind;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Unsupported texture target {}.", _0)]
    UnsupportedTarget(String),
    #[fail(display = "Invalid shape {:?}: {}.", _0, _1)]
    InvalidShape(Vec<usize>, String),
    #[fail(display = "Invalid offset {:?}: {}.", _0, _1)]
    InvalidOffset(Vec<usize>, String),
    #[fail(display = "Pixel format {} does not match data with {} channel(s).", _0, _1)]
    FormatMismatch(String, usize),
    #[fail(display = "Cannot determine format: data of invalid shape {:?}.", _0)]
    UndeterminedFormat(Vec<usize>),
    #[fail(display = "Unknown texture parameter \'{}\'.", _0)]
    UnknownParameter(String),
    #[fail(display = "Unknown texture parameter value \'{}\'.", _0)]
    UnknownParameterValue(String),
    #[fail(display = "{} is not a valid value for {}.", _0, _1)]
    InvalidParameterValue(String, String),
    #[fail(display = "Invalid contrast limits ({}, {}).", _0, _1)]
    InvalidContrastLimits(f64, f64),
    #[fail(display = "Cannot translate element kind {:?} to a GPU pixel type.", _0)]
    UnsupportedElementKind(ElementKind),
    #[fail(display = "Cannot update texture if there is no texture.")]
    NoTexture,
    #[fail(display = "Graphics implementation doesn\'t support {:?}.", _0)]
    Requirement(Capability),
    #[fail(display = "Unknown capability \'{}\'.", _0)]
    UnknownCapability(String),
    #[fail(display = "Malformed settings: {}", _0)]
    Settings(String),
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
}

impl Error {
    /// Configuration errors are caused by a malformed description and are
    /// always reported to the caller that introduced them.
    pub fn is_configuration(&self) -> bool {
        match *self {
            Error::Requirement(_) | Error::Backend(_) => false,
            _ => true,
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
