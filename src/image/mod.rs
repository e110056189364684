pub mod f32;
pub mod io;
pub mod rgba;
pub mod traits;

pub use self::f32::{ImageF32, MAX_INTENSITY};
pub use self::rgba::{ImageRgba8, RgbaBuffer};
pub use self::traits::{ImageView, ImageViewMut, Rows};
