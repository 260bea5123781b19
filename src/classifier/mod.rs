use crate::common::face::FaceColor;
use crate::common::hsv::HsvRegion;
use crate::error::ClassifyError;
use indexmap::IndexMap;

/// Half-open hue interval `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueRange {
    lo: u8,
    hi: u8,
}

impl HueRange {
    pub const fn new(lo: u8, hi: u8) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, h: u8) -> bool {
        self.lo <= h && h < self.hi
    }
}

/// Hue buckets in evaluation order. Red appears twice because hue is
/// circular and pure red straddles the wrap point.
const HUE_BUCKETS: [(HueRange, FaceColor); 6] = [
    (HueRange::new(0, 5), FaceColor::Red),
    (HueRange::new(5, 20), FaceColor::Orange),
    (HueRange::new(20, 45), FaceColor::Yellow),
    (HueRange::new(45, 90), FaceColor::Green),
    (HueRange::new(90, 120), FaceColor::Blue),
    (HueRange::new(120, 180), FaceColor::Red),
];

/// Tunable thresholds for the achromatic check.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub white_max_saturation: f32,
    pub white_min_value: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            white_max_saturation: 0.3 * 255.0, // hue is too noisy below this
            white_min_value: 0.3 * 255.0,      // anything darker is shadow, not sticker
        }
    }
}

impl ClassifierConfig {
    pub fn with_white_max_saturation(mut self, threshold: f32) -> Self {
        self.white_max_saturation = threshold;
        self
    }

    pub fn with_white_min_value(mut self, threshold: f32) -> Self {
        self.white_min_value = threshold;
        self
    }
}

/// Labels one facelet region with a sticker color.
///
/// Low-saturation, reasonably bright samples are white regardless of hue.
/// Everything else is bucketed by its mode hue: reflections and shadows skew
/// the mean far more than they shift the dominant value.
#[derive(Debug, Default)]
pub struct ColorClassifier {
    config: ClassifierConfig,
}

impl ColorClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a region. `Ok(None)` means no bucket matched (hue outside
    /// [0, 180)); callers must treat the cell as unresolved rather than
    /// reuse a stale label.
    pub fn classify(&self, region: &HsvRegion) -> Result<Option<FaceColor>, ClassifyError> {
        if region.is_empty() {
            return Err(ClassifyError::EmptyRegion);
        }

        let (mean_saturation, mean_value) = Self::channel_means(region);
        if mean_saturation < self.config.white_max_saturation
            && mean_value > self.config.white_min_value
        {
            return Ok(Some(FaceColor::White));
        }

        let mode = Self::mode_hue(region);
        Ok(HUE_BUCKETS
            .iter()
            .find(|(range, _)| range.contains(mode))
            .map(|(_, color)| *color))
    }

    fn channel_means(region: &HsvRegion) -> (f32, f32) {
        let mut saturation = 0.0f32;
        let mut value = 0.0f32;
        for px in region.pixels() {
            saturation += px.s as f32;
            value += px.v as f32;
        }
        let n = region.len() as f32;
        (saturation / n, value / n)
    }

    /// The most frequent hue value, ties broken by first appearance in the
    /// pixel scan.
    fn mode_hue(region: &HsvRegion) -> u8 {
        let mut counts: IndexMap<u8, u32> = IndexMap::new();
        for px in region.pixels() {
            *counts.entry(px.h).or_insert(0) += 1;
        }

        let mut mode = (0u8, 0u32);
        for (hue, count) in counts {
            if count > mode.1 {
                mode = (hue, count);
            }
        }
        mode.0
    }
}
