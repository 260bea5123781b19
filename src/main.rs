use cubescan::coordinator::{Coordinator, CoordinatorBuilder};
use cubescan::intake::{SyntheticColorHandle, SyntheticFrameSource};
use cubescan::session::{ScanState, SessionSnapshot};
use cubescan::{Configuration, FaceColor, ScanError};
use tokio::sync::watch;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

async fn wait_for(
    snapshots: &mut watch::Receiver<SessionSnapshot>,
    pred: impl Fn(&SessionSnapshot) -> bool,
) -> Result<SessionSnapshot, ScanError> {
    loop {
        {
            let snapshot = snapshots.borrow();
            if pred(&snapshot) {
                return Ok(snapshot.clone());
            }
        }
        snapshots
            .changed()
            .await
            .map_err(|_| ScanError::Coordinator("snapshot channel closed".to_string()))?;
    }
}

/// Drive one full scan over the synthetic feed: show each face's own solid
/// color, capture once the preview settles on it, confirm.
async fn run_demo_scan(
    coordinator: &Coordinator,
    palette: &SyntheticColorHandle,
) -> Result<(), ScanError> {
    let signals = coordinator.signals();
    let mut snapshots = coordinator.snapshots();

    for face in FaceColor::SCAN_ORDER {
        palette.set(face.reference_rgb());
        wait_for(&mut snapshots, |s| {
            s.state == ScanState::Scanning
                && s.face == Some(face)
                && s.preview.iter().all(|cell| *cell == Some(face))
        })
        .await?;
        signals.capture().await?;

        wait_for(&mut snapshots, |s| s.state == ScanState::AwaitingConfirmation).await?;
        signals.confirm().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ScanError> {
    init_logging();
    let configuration = Configuration::default();

    let source = SyntheticFrameSource::new(640, 480, FaceColor::SCAN_ORDER[0].reference_rgb());
    let palette = source.color_handle();
    let coordinator = CoordinatorBuilder::new(configuration)
        .source(Box::new(source))
        .build()?;

    run_demo_scan(&coordinator, &palette).await?;

    let cube = coordinator.wait().await?;
    let json = serde_json::to_string_pretty(&cube)
        .map_err(|e| ScanError::Coordinator(e.to_string()))?;
    println!("{json}");
    Ok(())
}
