use crate::classifier::ColorClassifier;
use crate::common::face::CubeScan;
use crate::config::Configuration;
use crate::error::{ScanError, SessionError};
use crate::intake::{FrameSource, RegionSampler};
use crate::session::{ScanSession, SessionEvent, SessionSnapshot, Signal, TickUpdate};
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Wires the frame source, the classifier, and the scan session together.
///
/// Ticks and user signals share one queue, so the session processes events
/// strictly one at a time. Snapshots for the presentation layer are
/// published on a watch channel after every applied event.
pub struct Coordinator {
    event_tx: mpsc::Sender<SessionEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    session_task: JoinHandle<Option<CubeScan>>,
    intake_task: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Coordinator {
    fn new(configuration: Configuration, source: Box<dyn FrameSource>) -> Self {
        let cancel_token = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel(configuration.event_buffer_size);

        let session = ScanSession::new();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let intake_task = Self::start_intake_task(
            RegionSampler::new(source),
            event_tx.clone(),
            configuration.tick_interval,
            cancel_token.clone(),
        );
        let session_task =
            Self::start_session_task(session, event_rx, snapshot_tx, cancel_token.clone());

        Self {
            event_tx,
            snapshot_rx,
            session_task,
            intake_task,
            cancel_token,
        }
    }

    fn start_intake_task(
        mut sampler: RegionSampler<Box<dyn FrameSource>>,
        event_tx: mpsc::Sender<SessionEvent>,
        tick_interval: Duration,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let classifier = ColorClassifier::new();
            let mut ticker = tokio::time::interval(tick_interval);

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let sample = match sampler.sample() {
                            Ok(sample) => sample,
                            Err(e) => {
                                tracing::warn!("skipping tick: {}", e);
                                continue;
                            }
                        };

                        let mut labels = [None; 9];
                        for (cell, region) in labels.iter_mut().zip(sample.regions.iter()) {
                            *cell = match classifier.classify(region) {
                                Ok(label) => label,
                                Err(e) => {
                                    tracing::debug!("facelet unresolved: {}", e);
                                    None
                                }
                            };
                        }

                        let update = TickUpdate {
                            labels,
                            frame_id: sample.frame_id,
                        };
                        match event_tx.try_send(SessionEvent::Tick(update)) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                tracing::debug!("event queue full, dropping frame");
                            }
                            Err(TrySendError::Closed(_)) => break,
                        }
                    }
                }
            }
        })
    }

    fn start_session_task(
        mut session: ScanSession,
        mut event_rx: mpsc::Receiver<SessionEvent>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<Option<CubeScan>> {
        tokio::spawn(async move {
            Self::log_prompt(&session);

            loop {
                let event = tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    event = event_rx.recv() => match event {
                        Some(event) => event,
                        None => break,
                    },
                };

                let signal = event.signal();
                let face = session.current_face();
                match session.apply(event) {
                    Ok(()) => match signal {
                        Signal::Tick => {}
                        Signal::Capture => {
                            tracing::info!("waiting for user to confirm facelet colors");
                        }
                        Signal::Confirm => {
                            if let Some(face) = face {
                                tracing::info!(face = %face, "captured face");
                            }
                            Self::log_prompt(&session);
                        }
                        Signal::Redo => {
                            tracing::info!("capture discarded, rescanning");
                        }
                    },
                    // Frames race user signals by design; a tick that lands
                    // outside Scanning is dropped quietly.
                    Err(SessionError::InvalidTransition {
                        signal: Signal::Tick,
                        ..
                    }) => {
                        tracing::trace!("dropping tick outside scanning");
                    }
                    Err(e) => tracing::warn!("rejected signal: {}", e),
                }

                let _ = snapshot_tx.send(session.snapshot());
                if session.is_done() {
                    break;
                }
            }

            cancel_token.cancel();
            session.into_result()
        })
    }

    fn log_prompt(session: &ScanSession) {
        if let (Some(orientation), Some(face)) = (session.orientation(), session.current_face()) {
            tracing::info!(
                "with {} facing up, scan the {} face",
                orientation.up_color(),
                face
            );
        }
    }

    /// Sender for the user intent signals.
    pub fn signals(&self) -> SignalHandle {
        SignalHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Read-only session snapshots for the presentation layer.
    pub fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    /// Wait for the session to finish and return the completed cube.
    ///
    /// Dropping the coordinator instead closes the event queue, which winds
    /// both tasks down on their own.
    pub async fn wait(self) -> Result<CubeScan, ScanError> {
        let result = self
            .session_task
            .await
            .map_err(|e| ScanError::Coordinator(e.to_string()))?;
        self.cancel_token.cancel();
        let _ = self.intake_task.await;
        result.ok_or_else(|| ScanError::Coordinator("session ended before completing".to_string()))
    }
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    source: Option<Box<dyn FrameSource>>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            source: None,
        }
    }

    // Sets the frame source. Required.
    pub fn source(mut self, source: Box<dyn FrameSource>) -> Self {
        self.source = Some(source);
        self
    }

    // Adjusts the tick cadence, this will override the default configuration.
    pub fn tick_interval(mut self, tick_interval: Duration) -> Self {
        self.configuration.tick_interval = tick_interval;
        self
    }

    // Adjusts the event queue capacity, this will override the default configuration.
    pub fn event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.configuration.event_buffer_size = event_buffer_size;
        self
    }

    pub fn build(self) -> Result<Coordinator, ScanError> {
        let source = self
            .source
            .ok_or(ScanError::Coordinator("Frame source not set".to_string()))?;
        Ok(Coordinator::new(self.configuration, source))
    }
}

/// Clonable sender for capture/confirm/redo, feeding the session queue.
#[derive(Clone)]
pub struct SignalHandle {
    event_tx: mpsc::Sender<SessionEvent>,
}

impl SignalHandle {
    pub async fn capture(&self) -> Result<(), ScanError> {
        self.send(SessionEvent::Capture).await
    }

    pub async fn confirm(&self) -> Result<(), ScanError> {
        self.send(SessionEvent::Confirm).await
    }

    pub async fn redo(&self) -> Result<(), ScanError> {
        self.send(SessionEvent::Redo).await
    }

    async fn send(&self, event: SessionEvent) -> Result<(), ScanError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| ScanError::Coordinator("session queue closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::face::FaceColor;
    use crate::intake::SyntheticFrameSource;
    use crate::session::ScanState;
    use tokio::time::timeout;

    async fn wait_for(
        snapshots: &mut watch::Receiver<SessionSnapshot>,
        pred: impl Fn(&SessionSnapshot) -> bool,
    ) -> SessionSnapshot {
        loop {
            {
                let snapshot = snapshots.borrow();
                if pred(&snapshot) {
                    return snapshot.clone();
                }
            }
            snapshots
                .changed()
                .await
                .expect("snapshot channel closed early");
        }
    }

    #[tokio::test]
    async fn build_without_source_fails() {
        let result = CoordinatorBuilder::new(Configuration::default()).build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn full_scan_over_a_synthetic_feed() {
        let source =
            SyntheticFrameSource::new(640, 480, FaceColor::SCAN_ORDER[0].reference_rgb());
        let palette = source.color_handle();

        let coordinator = CoordinatorBuilder::new(Configuration::default())
            .source(Box::new(source))
            .tick_interval(Duration::from_millis(5))
            .build()
            .expect("Failed to build coordinator");
        let signals = coordinator.signals();
        let mut snapshots = coordinator.snapshots();

        let scan = async {
            for face in FaceColor::SCAN_ORDER {
                palette.set(face.reference_rgb());
                wait_for(&mut snapshots, |s| {
                    s.state == ScanState::Scanning
                        && s.face == Some(face)
                        && s.preview.iter().all(|cell| *cell == Some(face))
                })
                .await;
                signals.capture().await.unwrap();

                wait_for(&mut snapshots, |s| {
                    s.state == ScanState::AwaitingConfirmation
                })
                .await;
                signals.confirm().await.unwrap();
            }
        };
        timeout(Duration::from_secs(10), scan)
            .await
            .expect("scan timed out");

        let cube = timeout(Duration::from_secs(5), coordinator.wait())
            .await
            .expect("wait timed out")
            .unwrap();
        assert!(cube.is_complete());
        for face in FaceColor::SCAN_ORDER {
            assert_eq!(cube.get(face).unwrap().facelets(), &[face; 9]);
        }
    }

    #[tokio::test]
    async fn stop_releases_the_tasks() {
        let source = SyntheticFrameSource::new(640, 480, FaceColor::Green.reference_rgb());
        let coordinator = CoordinatorBuilder::new(Configuration::default())
            .source(Box::new(source))
            .build()
            .expect("Failed to build coordinator");

        coordinator.stop();
        let result = timeout(Duration::from_secs(5), coordinator.wait()).await;
        assert!(result.expect("tasks did not stop").is_err());
    }
}
