//! Face-detection capability.
//!
//! Detection is an injected, optional capability: the scorer works against
//! the [`FaceDetect`] trait and the pipeline defaults to the no-op
//! implementation, so environments without any detector still produce
//! covers (the face term is simply zero). The bundled heuristic detector
//! clusters skin-tone pixels on a coarse grid; it is deterministic and has
//! no model or native dependencies.

use image::RgbImage;
use tracing::debug;

/// A detected face region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    /// Create a new box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Box area in square pixels.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Area as a fraction of the frame.
    pub fn area_fraction(&self, frame_width: u32, frame_height: u32) -> f64 {
        let frame_area = frame_width as f64 * frame_height as f64;
        if frame_area <= 0.0 {
            return 0.0;
        }
        (self.area() as f64 / frame_area).clamp(0.0, 1.0)
    }
}

/// Face detection provider.
pub trait FaceDetect: Send + Sync {
    /// Detect faces in a decoded frame. Must be deterministic for a given
    /// frame, or bounded/seeded if the backing model is not.
    fn detect(&self, image: &RgbImage) -> Vec<FaceBox>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Default detector when no capability is available: finds nothing.
pub struct NoopFaceDetector;

impl FaceDetect for NoopFaceDetector {
    fn detect(&self, _image: &RgbImage) -> Vec<FaceBox> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Grid resolution for skin-tone clustering.
const SKIN_GRID: usize = 16;
/// Minimum fraction of skin pixels for a cell to count.
const SKIN_CELL_THRESHOLD: f64 = 0.35;

/// Bundled heuristic detector: skin-tone density clustering.
///
/// Classifies pixels with a classic RGB skin rule, marks grid cells whose
/// skin fraction clears a threshold, and returns the bounding boxes of
/// connected marked regions, largest first.
pub struct SkinToneFaceDetector {
    /// Minimum face area as a fraction of the frame (default: 0.02).
    min_face_fraction: f64,
}

impl SkinToneFaceDetector {
    /// Create a detector with the default minimum face size.
    pub fn new() -> Self {
        Self {
            min_face_fraction: 0.02,
        }
    }

    /// Set the minimum face area fraction.
    pub fn with_min_face_fraction(mut self, fraction: f64) -> Self {
        self.min_face_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    fn is_skin(r: u8, g: u8, b: u8) -> bool {
        let (r, g, b) = (r as i32, g as i32, b as i32);
        r > 95 && g > 40 && b > 20 && r > g && r > b && (r - g.min(b)) > 15
    }
}

impl Default for SkinToneFaceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceDetect for SkinToneFaceDetector {
    fn detect(&self, image: &RgbImage) -> Vec<FaceBox> {
        let (w, h) = (image.width() as usize, image.height() as usize);
        if w < SKIN_GRID || h < SKIN_GRID {
            return Vec::new();
        }

        // Skin density per grid cell
        let cell_w = w / SKIN_GRID;
        let cell_h = h / SKIN_GRID;
        let mut marked = [[false; SKIN_GRID]; SKIN_GRID];
        for cy in 0..SKIN_GRID {
            for cx in 0..SKIN_GRID {
                let mut skin = 0u32;
                let mut total = 0u32;
                for y in (cy * cell_h)..((cy + 1) * cell_h) {
                    for x in (cx * cell_w)..((cx + 1) * cell_w) {
                        let p = image.get_pixel(x as u32, y as u32);
                        if Self::is_skin(p.0[0], p.0[1], p.0[2]) {
                            skin += 1;
                        }
                        total += 1;
                    }
                }
                marked[cy][cx] = total > 0 && skin as f64 / total as f64 >= SKIN_CELL_THRESHOLD;
            }
        }

        // Connected components over marked cells (4-neighbour flood fill)
        let mut visited = [[false; SKIN_GRID]; SKIN_GRID];
        let mut boxes = Vec::new();
        for cy in 0..SKIN_GRID {
            for cx in 0..SKIN_GRID {
                if !marked[cy][cx] || visited[cy][cx] {
                    continue;
                }
                let (mut min_x, mut max_x, mut min_y, mut max_y) = (cx, cx, cy, cy);
                let mut stack = vec![(cx, cy)];
                visited[cy][cx] = true;
                while let Some((x, y)) = stack.pop() {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                    let mut push = |nx: usize, ny: usize, stack: &mut Vec<(usize, usize)>| {
                        if marked[ny][nx] && !visited[ny][nx] {
                            visited[ny][nx] = true;
                            stack.push((nx, ny));
                        }
                    };
                    if x > 0 {
                        push(x - 1, y, &mut stack);
                    }
                    if x + 1 < SKIN_GRID {
                        push(x + 1, y, &mut stack);
                    }
                    if y > 0 {
                        push(x, y - 1, &mut stack);
                    }
                    if y + 1 < SKIN_GRID {
                        push(x, y + 1, &mut stack);
                    }
                }

                let bbox = FaceBox::new(
                    (min_x * cell_w) as f32,
                    (min_y * cell_h) as f32,
                    ((max_x - min_x + 1) * cell_w) as f32,
                    ((max_y - min_y + 1) * cell_h) as f32,
                );
                if bbox.area_fraction(image.width(), image.height()) >= self.min_face_fraction {
                    boxes.push(bbox);
                }
            }
        }

        boxes.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap_or(std::cmp::Ordering::Equal));
        debug!(faces = boxes.len(), "Skin-tone detection complete");
        boxes
    }

    fn name(&self) -> &'static str {
        "skin_tone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_noop_finds_nothing() {
        let image = RgbImage::from_pixel(64, 64, Rgb([200, 150, 120]));
        assert!(NoopFaceDetector.detect(&image).is_empty());
        assert_eq!(NoopFaceDetector.name(), "noop");
    }

    #[test]
    fn test_skin_patch_detected() {
        // Skin-tone square in the upper-center of a dark frame
        let image = RgbImage::from_fn(160, 160, |x, y| {
            if (50..110).contains(&x) && (30..90).contains(&y) {
                Rgb([210, 150, 120])
            } else {
                Rgb([20, 20, 60])
            }
        });
        let boxes = SkinToneFaceDetector::new().detect(&image);
        assert!(!boxes.is_empty());
        let face = &boxes[0];
        // Detected box covers the patch region
        assert!(face.x <= 50.0 && face.x + face.width >= 100.0);
        assert!(face.area_fraction(160, 160) > 0.05);
    }

    #[test]
    fn test_no_skin_no_faces() {
        let image = RgbImage::from_pixel(160, 160, Rgb([30, 80, 160]));
        assert!(SkinToneFaceDetector::new().detect(&image).is_empty());
    }

    #[test]
    fn test_small_patches_filtered() {
        // A 10x10 skin patch in 160x160 is under the 2% minimum
        let image = RgbImage::from_fn(160, 160, |x, y| {
            if x < 10 && y < 10 {
                Rgb([210, 150, 120])
            } else {
                Rgb([20, 20, 60])
            }
        });
        let boxes = SkinToneFaceDetector::new().detect(&image);
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let image = RgbImage::from_fn(160, 160, |x, y| {
            if (40..120).contains(&x) && (40..100).contains(&y) {
                Rgb([200, 140, 110])
            } else {
                Rgb([10, 10, 10])
            }
        });
        let detector = SkinToneFaceDetector::new();
        assert_eq!(detector.detect(&image), detector.detect(&image));
    }
}
