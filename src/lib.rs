pub mod classifier;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod intake;
pub mod session;

pub use error::{ClassifyError, IntakeError, ScanError, SessionError};

pub use classifier::{ClassifierConfig, ColorClassifier};
pub use common::{CubeScan, FaceColor, FaceScan, HsvPixel, HsvRegion};
pub use config::Configuration;
pub use coordinator::{Coordinator, CoordinatorBuilder, SignalHandle};
pub use intake::{FrameSource, RegionSample, RegionSampler, SyntheticFrameSource};
pub use session::{ScanOrientation, ScanSession, ScanState, SessionSnapshot};
