use crate::common::face::{CubeScan, FaceColor, FaceScan};
use crate::error::SessionError;
use crate::session::event::{SessionEvent, Signal};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Scanning,
    AwaitingConfirmation,
    Done,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Scanning => "Scanning",
            ScanState::AwaitingConfirmation => "AwaitingConfirmation",
            ScanState::Done => "Done",
        };
        f.write_str(name)
    }
}

/// Which face the user holds on top while scanning. The first four faces are
/// scanned with white up, the last two with green up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrientation {
    WhiteUp,
    GreenUp,
}

impl ScanOrientation {
    pub fn up_color(&self) -> FaceColor {
        match self {
            ScanOrientation::WhiteUp => FaceColor::White,
            ScanOrientation::GreenUp => FaceColor::Green,
        }
    }
}

/// Read-only view of the session for the presentation layer.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: ScanState,
    pub face_index: usize,
    pub face: Option<FaceColor>,
    pub orientation: Option<ScanOrientation>,
    pub preview: [Option<FaceColor>; 9],
    pub committed_faces: usize,
}

/// The face-scan state machine.
///
/// Faces are presented in `FaceColor::SCAN_ORDER`; the face index only ever
/// increases. A face's committed result exists exactly when its index is
/// below the current face index, and each result is written once, on
/// confirm.
#[derive(Debug, Default)]
pub struct ScanSession {
    state: ScanState,
    face_index: usize,
    preview: [Option<FaceColor>; 9],
    frozen: [Option<FaceColor>; 9],
    committed: CubeScan,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn face_index(&self) -> usize {
        self.face_index
    }

    /// The face currently being scanned; `None` once the session is done.
    pub fn current_face(&self) -> Option<FaceColor> {
        FaceColor::SCAN_ORDER.get(self.face_index).copied()
    }

    /// Holding orientation for the current face; `None` once done.
    pub fn orientation(&self) -> Option<ScanOrientation> {
        match self.face_index {
            0..=3 => Some(ScanOrientation::WhiteUp),
            4..=5 => Some(ScanOrientation::GreenUp),
            _ => None,
        }
    }

    /// The nine labels the presentation layer should show: the live preview
    /// while scanning, the frozen capture while awaiting confirmation.
    pub fn preview(&self) -> &[Option<FaceColor>; 9] {
        match self.state {
            ScanState::AwaitingConfirmation => &self.frozen,
            _ => &self.preview,
        }
    }

    pub fn committed(&self) -> &CubeScan {
        &self.committed
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, ScanState::Done)
    }

    /// The complete cube, once all six faces are committed.
    pub fn into_result(self) -> Option<CubeScan> {
        match self.state {
            ScanState::Done => Some(self.committed),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            face_index: self.face_index,
            face: self.current_face(),
            orientation: self.orientation(),
            preview: *self.preview(),
            committed_faces: self.committed.len(),
        }
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Tick(update) => self.tick(update.labels),
            SessionEvent::Capture => self.capture(),
            SessionEvent::Confirm => self.confirm(),
            SessionEvent::Redo => self.redo(),
        }
    }

    /// Overwrite the live preview with one frame's classification outcomes.
    /// The center cell is always forced to the current face's own name: the
    /// cube's centers define face identity and are never classified.
    pub fn tick(&mut self, labels: [Option<FaceColor>; 9]) -> Result<(), SessionError> {
        match self.state {
            ScanState::Scanning => {
                self.preview = labels;
                self.preview[4] = self.current_face();
                Ok(())
            }
            _ => Err(self.rejected(Signal::Tick)),
        }
    }

    /// Freeze the live preview verbatim and wait for the user's verdict.
    pub fn capture(&mut self) -> Result<(), SessionError> {
        match self.state {
            ScanState::Scanning => {
                self.frozen = self.preview;
                self.state = ScanState::AwaitingConfirmation;
                Ok(())
            }
            _ => Err(self.rejected(Signal::Capture)),
        }
    }

    /// Commit the frozen labels as the current face's result and advance.
    /// Rejected if any frozen cell is still unresolved.
    pub fn confirm(&mut self) -> Result<(), SessionError> {
        match self.state {
            ScanState::AwaitingConfirmation => {
                let face = FaceColor::SCAN_ORDER[self.face_index];
                let unresolved = self.frozen.iter().filter(|cell| cell.is_none()).count();
                if unresolved > 0 {
                    return Err(SessionError::IncompleteCapture { face, unresolved });
                }

                let mut facelets = [face; 9];
                for (slot, label) in facelets.iter_mut().zip(self.frozen.iter()) {
                    if let Some(color) = label {
                        *slot = *color;
                    }
                }
                self.committed.insert(FaceScan::new(face, facelets));

                self.face_index += 1;
                self.preview = [None; 9];
                self.frozen = [None; 9];
                self.state = if self.face_index < FaceColor::SCAN_ORDER.len() {
                    ScanState::Scanning
                } else {
                    ScanState::Done
                };
                Ok(())
            }
            _ => Err(self.rejected(Signal::Confirm)),
        }
    }

    /// Discard the frozen capture and resume scanning the same face.
    pub fn redo(&mut self) -> Result<(), SessionError> {
        match self.state {
            ScanState::AwaitingConfirmation => {
                self.frozen = [None; 9];
                self.state = ScanState::Scanning;
                Ok(())
            }
            _ => Err(self.rejected(Signal::Redo)),
        }
    }

    fn rejected(&self, signal: Signal) -> SessionError {
        SessionError::InvalidTransition {
            signal,
            state: self.state(),
        }
    }
}
