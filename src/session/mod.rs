pub mod event;
pub mod scan_session;

pub use event::{SessionEvent, Signal, TickUpdate};
pub use scan_session::{ScanOrientation, ScanSession, ScanState, SessionSnapshot};
