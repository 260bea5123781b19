pub mod face;
pub mod hsv;

pub use face::{CubeScan, FaceColor, FaceScan};
pub use hsv::{HsvPixel, HsvRegion};
