pub mod convert;
pub mod data;
pub mod deferred;
pub mod format;
pub mod raw;
pub mod types;

pub use self::convert::{convert_for_upload, default_contrast_limits, FloatSupport};
pub use self::data::{Element, ElementKind, Elements, Shape, TextureData};
pub use self::deferred::{Texture, TextureGuard, UploadParams};
pub use self::format::infer_format;
pub use self::raw::{GpuHandle, RawTexture};
pub use self::types::{
    ContrastLimits, IntoTextureParameter, IntoTextureParameterValue, PixelFormat, PixelType,
    Target, TextureParameter, TextureParameterValue,
};

pub mod prelude {
    pub use super::convert::{convert_for_upload, default_contrast_limits, FloatSupport};
    pub use super::data::{ElementKind, Elements, TextureData};
    pub use super::deferred::{Texture, TextureGuard, UploadParams};
    pub use super::format::infer_format;
    pub use super::raw::{GpuHandle, RawTexture};
    pub use super::types::{
        ContrastLimits, PixelFormat, PixelType, Target, TextureParameter, TextureParameterValue,
    };
}
