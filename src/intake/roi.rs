use crate::common::hsv::{HsvPixel, HsvRegion};
use crate::error::IntakeError;
use image::RgbImage;

/// Pixel rectangle of one facelet region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The nine fixed facelet regions for a frame size.
///
/// The 3x3 grid is centered on the frame. Neighboring region centers sit
/// `2 * (height / 10)` pixels apart and each region is a square of
/// half-extent `3/4 * (height / 10)`, so the sampled squares stay inside the
/// on-screen alignment guides.
#[derive(Debug, Clone, Copy)]
pub struct RoiLayout {
    frame_width: u32,
    frame_height: u32,
    center_x: i64,
    center_y: i64,
    pitch: i64,
    half: i64,
}

impl RoiLayout {
    pub fn for_frame(width: u32, height: u32) -> Result<Self, IntakeError> {
        let cell = (height / 10) as i64;
        let half = cell * 3 / 4;
        let layout = Self {
            frame_width: width,
            frame_height: height,
            center_x: (width / 2) as i64,
            center_y: (height / 2) as i64,
            pitch: cell * 2,
            half,
        };

        let reach = layout.pitch + half;
        let fits = half >= 1
            && layout.center_x - reach >= 0
            && layout.center_y - reach >= 0
            && layout.center_x + reach <= width as i64
            && layout.center_y + reach <= height as i64;
        if !fits {
            return Err(IntakeError::FrameTooSmall { width, height });
        }
        Ok(layout)
    }

    /// Region rectangles, row-major with the center facelet at index 4.
    pub fn rects(&self) -> [RoiRect; 9] {
        let mut rects = [RoiRect {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }; 9];

        for row in 0..3i64 {
            for col in 0..3i64 {
                let cx = self.center_x + (col - 1) * self.pitch;
                let cy = self.center_y + (row - 1) * self.pitch;
                rects[(row * 3 + col) as usize] = RoiRect {
                    x: (cx - self.half) as u32,
                    y: (cy - self.half) as u32,
                    width: (self.half * 2) as u32,
                    height: (self.half * 2) as u32,
                };
            }
        }
        rects
    }

    /// Cut the nine regions out of a frame and convert them to HSV.
    ///
    /// The frame must have the dimensions this layout was built for.
    pub fn extract(&self, frame: &RgbImage) -> Result<[HsvRegion; 9], IntakeError> {
        if frame.dimensions() != (self.frame_width, self.frame_height) {
            return Err(IntakeError::FrameTooSmall {
                width: frame.width(),
                height: frame.height(),
            });
        }

        Ok(self.rects().map(|rect| {
            let mut pixels = Vec::with_capacity((rect.width * rect.height) as usize);
            for y in rect.y..rect.y + rect.height {
                for x in rect.x..rect.x + rect.width {
                    pixels.push(HsvPixel::from_rgb(frame.get_pixel(x, y)));
                }
            }
            HsvRegion::from_pixels(rect.width, rect.height, pixels)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn layout_is_centered_and_row_major() {
        let layout = RoiLayout::for_frame(640, 480).unwrap();
        let rects = layout.rects();

        // height/10 = 48: pitch 96, half-extent 36.
        assert_eq!(
            rects[4],
            RoiRect {
                x: 284,
                y: 204,
                width: 72,
                height: 72
            }
        );
        assert_eq!(rects[0], RoiRect { x: 188, y: 108, width: 72, height: 72 });

        // Rows top to bottom, columns left to right.
        assert!(rects[0].x < rects[1].x && rects[1].x < rects[2].x);
        assert_eq!(rects[0].y, rects[2].y);
        assert!(rects[0].y < rects[3].y && rects[3].y < rects[6].y);
    }

    #[test]
    fn tiny_frame_is_rejected() {
        assert_eq!(
            RoiLayout::for_frame(16, 16).unwrap_err(),
            IntakeError::FrameTooSmall {
                width: 16,
                height: 16
            }
        );
    }

    #[test]
    fn narrow_portrait_frame_is_rejected() {
        // Tall but too narrow for the horizontal reach of the grid.
        assert!(RoiLayout::for_frame(200, 480).is_err());
    }

    #[test]
    fn extraction_converts_to_hsv() {
        let frame = RgbImage::from_pixel(640, 480, Rgb([0, 255, 0]));
        let layout = RoiLayout::for_frame(640, 480).unwrap();
        let regions = layout.extract(&frame).unwrap();

        assert_eq!(regions.len(), 9);
        for region in &regions {
            assert_eq!(region.width(), 72);
            assert_eq!(region.height(), 72);
            assert!(region.pixels().all(|px| px.h == 60 && px.s == 255));
        }
    }

    #[test]
    fn extraction_rejects_mismatched_frame() {
        let layout = RoiLayout::for_frame(640, 480).unwrap();
        let frame = RgbImage::from_pixel(320, 240, Rgb([0, 255, 0]));
        assert!(layout.extract(&frame).is_err());
    }
}
