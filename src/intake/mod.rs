pub mod roi;
pub mod source;

pub use roi::{RoiLayout, RoiRect};
pub use source::{
    FrameSource, RegionSample, RegionSampler, SyntheticColorHandle, SyntheticFrameSource,
};
