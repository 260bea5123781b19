use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six sticker colors. Also names the six faces, since the cube's own
/// centers define face identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FaceColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    White,
}

impl FaceColor {
    /// Fixed order in which the faces are presented for scanning.
    pub const SCAN_ORDER: [FaceColor; 6] = [
        FaceColor::Green,
        FaceColor::Red,
        FaceColor::Blue,
        FaceColor::Orange,
        FaceColor::White,
        FaceColor::Yellow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FaceColor::Red => "red",
            FaceColor::Orange => "orange",
            FaceColor::Yellow => "yellow",
            FaceColor::Green => "green",
            FaceColor::Blue => "blue",
            FaceColor::White => "white",
        }
    }

    /// Nominal sticker color, used by synthetic frame sources and previews.
    /// Blue leans toward cyan so its hue lands inside the blue bucket the
    /// way real stickers photograph.
    pub fn reference_rgb(&self) -> image::Rgb<u8> {
        let (r, g, b) = match self {
            FaceColor::Red => (255, 0, 0),
            FaceColor::Orange => (255, 165, 0),
            FaceColor::Yellow => (255, 255, 0),
            FaceColor::Green => (0, 255, 0),
            FaceColor::Blue => (0, 102, 255),
            FaceColor::White => (255, 255, 255),
        };
        image::Rgb([r, g, b])
    }
}

impl fmt::Display for FaceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The committed result for one face: nine labels, row-major over the 3x3
/// grid, center at index 4. Written once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct FaceScan {
    face: FaceColor,
    facelets: [FaceColor; 9],
    captured_at: DateTime<Utc>,
}

impl FaceScan {
    pub fn new(face: FaceColor, facelets: [FaceColor; 9]) -> Self {
        Self {
            face,
            facelets,
            captured_at: Utc::now(),
        }
    }

    pub fn face(&self) -> FaceColor {
        self.face
    }

    pub fn facelets(&self) -> &[FaceColor; 9] {
        &self.facelets
    }

    pub fn center(&self) -> FaceColor {
        self.facelets[4]
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Committed face results accumulated over a scanning session, kept in scan
/// order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CubeScan {
    faces: IndexMap<FaceColor, FaceScan>,
}

impl CubeScan {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, scan: FaceScan) {
        self.faces.insert(scan.face(), scan);
    }

    pub fn get(&self, face: FaceColor) -> Option<&FaceScan> {
        self.faces.get(&face)
    }

    pub fn contains(&self, face: FaceColor) -> bool {
        self.faces.contains_key(&face)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// All six faces committed.
    pub fn is_complete(&self) -> bool {
        self.faces.len() == FaceColor::SCAN_ORDER.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FaceColor, &FaceScan)> {
        self.faces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order_starts_green_ends_yellow() {
        assert_eq!(FaceColor::SCAN_ORDER[0], FaceColor::Green);
        assert_eq!(FaceColor::SCAN_ORDER[5], FaceColor::Yellow);
        assert_eq!(FaceColor::SCAN_ORDER.len(), 6);
    }

    #[test]
    fn cube_scan_preserves_insertion_order() {
        let mut cube = CubeScan::new();
        for face in FaceColor::SCAN_ORDER {
            cube.insert(FaceScan::new(face, [face; 9]));
        }
        assert!(cube.is_complete());
        let order: Vec<FaceColor> = cube.iter().map(|(f, _)| *f).collect();
        assert_eq!(order.as_slice(), &FaceColor::SCAN_ORDER);
    }

    #[test]
    fn face_labels_serialize_lowercase() {
        let json = serde_json::to_string(&FaceColor::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
    }
}
