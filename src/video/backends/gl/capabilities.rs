use std::cmp;
use std::ffi;

use gl;
use gl::types::*;

use crate::errors::*;
use crate::video::backends::Capability;

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Parses a `GL_VERSION` string, e.g. `4.5.0 NVIDIA 390.77` or
    /// `OpenGL ES 3.0 Mesa 18.0.5`.
    pub fn parse_str(desc: &str) -> Result<Version> {
        let malformed = || Error::Backend(format!("[GL] Version string \'{}\' is malformed.", desc));

        // ES 1.x profiles look like `OpenGL ES-CM 1.1`.
        let (es, version) = if desc.starts_with("OpenGL ES ") {
            (true, desc.get(10..))
        } else if desc.starts_with("OpenGL ES-") {
            (true, desc.splitn(2, ' ').nth(1))
        } else {
            (false, Some(desc))
        };

        let version = version.ok_or_else(malformed)?;
        let version = version.split(' ').next().ok_or_else(malformed)?;
        let mut iter = version.split('.');
        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Version::parse_str(&parse_str(gl::VERSION)?)
    }
}

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Default, Clone, Copy)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            pub fn from_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Extensions {
                let mut extensions = Extensions::default();

                for extension in names {
                    match extension {
                        $(
                            $string => extensions.$field = true,
                        )+
                        _ => ()
                    }
                }

                extensions
            }

            /// Returns the list of extensions supported by the backend.
            ///
            /// *Safety*: the OpenGL context must be current in the thread.
            pub unsafe fn parse(version: Version) -> Result<Extensions> {
                let strings: Vec<String> = if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let mut num_extensions = 0;
                    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

                    let mut strings = Vec::with_capacity(num_extensions as usize);
                    for i in 0..num_extensions {
                        let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                        if !ext.is_null() {
                            strings.push(c_str(ext)?);
                        }
                    }
                    strings
                } else {
                    parse_str(gl::EXTENSIONS)?
                        .split(' ')
                        .map(|e| e.to_owned())
                        .collect()
                };

                Ok(Extensions::from_names(strings.iter().map(|v| v.as_str())))
            }
        }
    }
}

extensions! {
    "GL_EXT_texture3D" => gl_ext_texture_3d,
    "GL_OES_texture_3D" => gl_oes_texture_3d,
    "GL_ARB_half_float_pixel" => gl_arb_half_float_pixel,
    "GL_OES_texture_half_float" => gl_oes_texture_half_float,
    "GL_ARB_texture_float" => gl_arb_texture_float,
    "GL_OES_texture_float" => gl_oes_texture_float,
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,

    /// The company responsible for this GL implementation.
    pub vendor: String,

    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,

    /// The list of OpenGL extensions support by this implementation.
    pub extensions: Extensions,

    /// The OpenGL context profile if available.
    ///
    /// The context profile is available from OpenGL 3.2 onwards. `None` if not supported.
    pub profile: Option<Profile>,

    /// Maximum number of textures that can be bound to a program.
    ///
    /// `glActiveTexture` must be between `GL_TEXTURE0` and `GL_TEXTURE0` + this value - 1.
    pub max_combined_texture_image_units: u32,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = Extensions::parse(version)?;

        Ok(Capabilities {
            version,
            extensions,
            vendor: parse_str(gl::VENDOR)?,
            renderer: parse_str(gl::RENDERER)?,
            profile: Capabilities::parse_profile(version),
            max_combined_texture_image_units: Capabilities::parse_texture_image_units(),
        })
    }

    /// Returns true if the optional `capability` is supported.
    pub fn has(&self, capability: Capability) -> bool {
        let v = self.version;
        let exts = &self.extensions;

        match capability {
            Capability::Texture3D => {
                v >= Version::GL(1, 2)
                    || v >= Version::ES(3, 0)
                    || exts.gl_ext_texture_3d
                    || exts.gl_oes_texture_3d
            }
            Capability::HalfFloatTexture => {
                v >= Version::GL(3, 0)
                    || v >= Version::ES(3, 0)
                    || exts.gl_arb_half_float_pixel
                    || exts.gl_oes_texture_half_float
            }
            Capability::FloatTexture => {
                v >= Version::GL(3, 0)
                    || v >= Version::ES(3, 0)
                    || exts.gl_arb_texture_float
                    || exts.gl_oes_texture_float
            }
        }
    }

    /// Texture targets can only be toggled with `glEnable` by fixed-function
    /// pipelines, core profiles and ES reject it.
    pub fn has_target_toggles(&self) -> bool {
        match self.version {
            Version::ES(_, _) => false,
            Version::GL(_, _) => self.profile != Some(Profile::Core),
        }
    }

    #[inline]
    unsafe fn parse_profile(version: Version) -> Option<Profile> {
        if version >= Version::GL(3, 2) {
            let mut val = 0;
            gl::GetIntegerv(gl::CONTEXT_PROFILE_MASK, &mut val);
            let val = val as GLenum;
            if (val & gl::CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
                Some(Profile::Compatibility)
            } else if (val & gl::CONTEXT_CORE_PROFILE_BIT) != 0 {
                Some(Profile::Core)
            } else {
                None
            }
        } else {
            None
        }
    }

    #[inline]
    unsafe fn parse_texture_image_units() -> u32 {
        let mut val = 2;
        gl::GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut val);
        val as u32
    }
}

#[inline]
unsafe fn parse_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    if s.is_null() {
        return Err(Error::Backend(format!("[GL] String of {} is null.", id)));
    }

    c_str(s)
}

#[inline]
unsafe fn c_str(s: *const GLubyte) -> Result<String> {
    String::from_utf8(ffi::CStr::from_ptr(s as *const _).to_bytes().to_vec())
        .map_err(|_| Error::Backend("[GL] String is malformed.".to_owned()))
}
