use crate::common::face::FaceColor;
use crate::session::event::Signal;
use crate::session::ScanState;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Classification Error: {0}")]
    Classify(#[from] ClassifyError),
    #[error("Session Error: {0}")]
    Session(#[from] SessionError),
    #[error("Intake Error: {0}")]
    Intake(#[from] IntakeError),
    #[error("Coordinator Error: {0}")]
    Coordinator(String),
}

// Classifier Error Type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("region contains no pixels")]
    EmptyRegion,
}

// Scan session Error Type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("signal '{signal}' is not valid in state {state}")]
    InvalidTransition { signal: Signal, state: ScanState },
    #[error("cannot confirm {face} face: {unresolved} facelets unresolved")]
    IncompleteCapture { face: FaceColor, unresolved: usize },
}

// Frame source Error Type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntakeError {
    #[error("no frame available from source")]
    NoFrame,
    #[error("frame {width}x{height} is too small for the facelet layout")]
    FrameTooSmall { width: u32, height: u32 },
}
