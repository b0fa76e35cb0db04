//! Functions for loading context settings.

use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::video::backends::Capability;

/// Configuration of a `Context`. Capabilities reported by the driver can be
/// switched off here, which is handy to exercise the conversion paths of
/// low-end hardware on a desktop GPU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Treats 3D textures as unavailable.
    pub disable_texture_3d: bool,
    /// Treats half-float textures as unavailable.
    pub disable_half_float: bool,
    /// Treats float textures as unavailable.
    pub disable_float: bool,
    /// Logs every element kind conversion performed before an upload.
    pub log_conversions: bool,
}

impl ContextSettings {
    /// Parses settings from a JSON document. Missing fields keep their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Settings(format!("{}", err)))
    }

    /// Returns true if `capability` has been switched off.
    pub fn is_disabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Texture3D => self.disable_texture_3d,
            Capability::HalfFloatTexture => self.disable_half_float,
            Capability::FloatTexture => self.disable_float,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_json() {
        let settings = ContextSettings::from_json(r#"{ "disable_float": true }"#).unwrap();
        assert!(settings.disable_float);
        assert!(!settings.disable_half_float);
        assert!(settings.is_disabled(Capability::FloatTexture));
        assert!(!settings.is_disabled(Capability::Texture3D));

        assert_eq!(
            ContextSettings::from_json("{}").unwrap(),
            ContextSettings::default()
        );
    }

    #[test]
    fn malformed_json() {
        assert!(ContextSettings::from_json("{ disable_float").is_err());
    }
}
