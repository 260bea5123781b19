use crate::common::face::FaceColor;
use std::fmt;
use uuid::Uuid;

/// One entry in the serialized session queue. Ticks and user intents flow
/// through the same channel so they are processed strictly one at a time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Tick(TickUpdate),
    Capture,
    Confirm,
    Redo,
}

impl SessionEvent {
    pub fn signal(&self) -> Signal {
        match self {
            SessionEvent::Tick(_) => Signal::Tick,
            SessionEvent::Capture => Signal::Capture,
            SessionEvent::Confirm => Signal::Confirm,
            SessionEvent::Redo => Signal::Redo,
        }
    }
}

/// Classification outcomes for the nine facelet regions of one frame,
/// row-major. `None` marks a cell the classifier could not resolve.
#[derive(Debug, Clone)]
pub struct TickUpdate {
    pub labels: [Option<FaceColor>; 9],
    pub frame_id: Uuid,
}

/// Names a session input, for rejection reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Tick,
    Capture,
    Confirm,
    Redo,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Tick => "tick",
            Signal::Capture => "capture",
            Signal::Confirm => "confirm",
            Signal::Redo => "redo",
        };
        f.write_str(name)
    }
}
