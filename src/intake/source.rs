use crate::common::hsv::HsvRegion;
use crate::error::IntakeError;
use crate::intake::roi::RoiLayout;
use chrono::{DateTime, Utc};
use image::{Rgb, RgbImage};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// External collaborator that produces raw frames on demand. A camera in
/// production; a synthetic generator in tests and the demo binary.
pub trait FrameSource: Send {
    /// Grab the next frame. `IntakeError::NoFrame` means nothing was
    /// available this tick; callers must not advance any state on it.
    fn grab(&mut self) -> Result<RgbImage, IntakeError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn grab(&mut self) -> Result<RgbImage, IntakeError> {
        (**self).grab()
    }
}

/// Nine HSV facelet regions cut from one frame.
#[derive(Debug, Clone)]
pub struct RegionSample {
    pub regions: [HsvRegion; 9],
    pub frame_id: Uuid,
    pub captured_at: DateTime<Utc>,
}

/// Turns raw frames into stamped facelet-region samples.
pub struct RegionSampler<S> {
    source: S,
}

impl<S: FrameSource> RegionSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn sample(&mut self) -> Result<RegionSample, IntakeError> {
        let frame = self.source.grab()?;
        let layout = RoiLayout::for_frame(frame.width(), frame.height())?;
        let regions = layout.extract(&frame)?;
        Ok(RegionSample {
            regions,
            frame_id: Uuid::new_v4(),
            captured_at: Utc::now(),
        })
    }
}

/// Solid-color frame generator standing in for a camera. The displayed
/// color can be swapped from outside through a [`SyntheticColorHandle`].
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    color: Arc<Mutex<Rgb<u8>>>,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32, color: Rgb<u8>) -> Self {
        Self {
            width,
            height,
            color: Arc::new(Mutex::new(color)),
        }
    }

    pub fn color_handle(&self) -> SyntheticColorHandle {
        SyntheticColorHandle {
            color: Arc::clone(&self.color),
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn grab(&mut self) -> Result<RgbImage, IntakeError> {
        let color = *self.color.lock().unwrap();
        Ok(RgbImage::from_pixel(self.width, self.height, color))
    }
}

#[derive(Clone)]
pub struct SyntheticColorHandle {
    color: Arc<Mutex<Rgb<u8>>>,
}

impl SyntheticColorHandle {
    pub fn set(&self, color: Rgb<u8>) {
        *self.color.lock().unwrap() = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColorClassifier;
    use crate::common::face::FaceColor;

    #[test]
    fn sampler_produces_classifiable_regions() {
        let source = SyntheticFrameSource::new(640, 480, FaceColor::Green.reference_rgb());
        let mut sampler = RegionSampler::new(source);
        let classifier = ColorClassifier::new();

        let sample = sampler.sample().unwrap();
        for region in &sample.regions {
            assert_eq!(
                classifier.classify(region).unwrap(),
                Some(FaceColor::Green)
            );
        }
    }

    #[test]
    fn color_handle_swaps_the_feed() {
        let source = SyntheticFrameSource::new(640, 480, FaceColor::Green.reference_rgb());
        let handle = source.color_handle();
        let mut sampler = RegionSampler::new(source);
        let classifier = ColorClassifier::new();

        handle.set(FaceColor::Orange.reference_rgb());
        let sample = sampler.sample().unwrap();
        assert_eq!(
            classifier.classify(&sample.regions[0]).unwrap(),
            Some(FaceColor::Orange)
        );
    }

    #[test]
    fn undersized_source_cannot_be_sampled() {
        let source = SyntheticFrameSource::new(16, 16, Rgb([0, 0, 0]));
        let mut sampler = RegionSampler::new(source);
        assert!(sampler.sample().is_err());
    }

    #[test]
    fn every_reference_color_classifies_to_its_face() {
        let classifier = ColorClassifier::new();
        for face in FaceColor::SCAN_ORDER {
            let source = SyntheticFrameSource::new(640, 480, face.reference_rgb());
            let mut sampler = RegionSampler::new(source);
            let sample = sampler.sample().unwrap();
            assert_eq!(
                classifier.classify(&sample.regions[4]).unwrap(),
                Some(face),
                "reference color for {face} did not classify back to itself"
            );
        }
    }
}
