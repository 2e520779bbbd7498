pub mod f32;
pub mod io;
pub mod rgb;

pub use self::f32::ImageF32;
pub use self::rgb::{ImageMeta, ImageRgb8, RgbPlanes};
