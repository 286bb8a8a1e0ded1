//! Output geometry for image derivatives.

use anyhow::{bail, Result};

/// Pixel dimensions of one output variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.width <= width && self.height <= height
    }
}

/// Planned output dimensions for the main variant and the thumbnail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizePlan {
    pub main: Dimensions,
    pub thumb: Dimensions,
}

/// Computes output dimensions preserving aspect ratio.
pub struct GeometryPlanner;

impl GeometryPlanner {
    /// Plan main and thumbnail dimensions for a source image.
    ///
    /// The main variant keeps the source dimensions when they already fit the
    /// bounding box (no upscaling); otherwise the longer side is clamped and the
    /// other derived from the aspect ratio. The thumbnail is fit entirely inside
    /// its box by comparing aspect ratios. All results are rounded to the
    /// nearest pixel and never reach zero.
    ///
    /// Zero source dimensions are a fatal input error, not coerced.
    pub fn plan(
        src_width: u32,
        src_height: u32,
        max_width: u32,
        max_height: u32,
        thumb_width: u32,
        thumb_height: u32,
    ) -> Result<ResizePlan> {
        if src_width == 0 || src_height == 0 {
            bail!(
                "Source image reports zero dimensions: {}x{}",
                src_width,
                src_height
            );
        }
        if max_width == 0 || max_height == 0 || thumb_width == 0 || thumb_height == 0 {
            bail!("Target bounding boxes must be positive");
        }

        let aspect = src_width as f64 / src_height as f64;

        let main = if src_width > max_width || src_height > max_height {
            if src_width > src_height {
                let height = (max_width as f64 / aspect).round() as u32;
                Dimensions::new(max_width, height.max(1))
            } else {
                let width = (max_height as f64 * aspect).round() as u32;
                Dimensions::new(width.max(1), max_height)
            }
        } else {
            Dimensions::new(src_width, src_height)
        };

        let thumb_aspect = thumb_width as f64 / thumb_height as f64;
        let thumb = if aspect > thumb_aspect {
            let height = (thumb_width as f64 / aspect).round() as u32;
            Dimensions::new(thumb_width, height.max(1))
        } else {
            let width = (thumb_height as f64 * aspect).round() as u32;
            Dimensions::new(width.max(1), thumb_height)
        };

        Ok(ResizePlan { main, thumb })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_image_clamped_by_width() {
        // 4000x2000 into 1920x1080: aspect 2.0 > 1.78, clamp width.
        let plan = GeometryPlanner::plan(4000, 2000, 1920, 1080, 400, 300).unwrap();
        assert_eq!(plan.main, Dimensions::new(1920, 960));
    }

    #[test]
    fn test_tall_image_clamped_by_height() {
        let plan = GeometryPlanner::plan(2000, 4000, 1920, 1080, 400, 300).unwrap();
        assert_eq!(plan.main, Dimensions::new(540, 1080));
    }

    #[test]
    fn test_source_within_bounds_unchanged() {
        let plan = GeometryPlanner::plan(800, 600, 1920, 1080, 400, 300).unwrap();
        assert_eq!(plan.main, Dimensions::new(800, 600));
    }

    #[test]
    fn test_thumbnail_fits_inside_box() {
        let plan = GeometryPlanner::plan(4000, 2000, 1920, 1080, 400, 300).unwrap();
        assert!(plan.thumb.fits_within(400, 300));
        assert_eq!(plan.thumb, Dimensions::new(400, 200));
    }

    #[test]
    fn test_tall_thumbnail_clamped_by_height() {
        let plan = GeometryPlanner::plan(2000, 4000, 1920, 1080, 400, 300).unwrap();
        assert_eq!(plan.thumb, Dimensions::new(150, 300));
    }

    #[test]
    fn test_extreme_aspect_never_produces_zero() {
        let plan = GeometryPlanner::plan(10000, 10, 1920, 1080, 400, 300).unwrap();
        assert!(plan.main.height >= 1);
        assert!(plan.thumb.height >= 1);
    }

    #[test]
    fn test_zero_source_is_fatal() {
        assert!(GeometryPlanner::plan(0, 100, 1920, 1080, 400, 300).is_err());
        assert!(GeometryPlanner::plan(100, 0, 1920, 1080, 400, 300).is_err());
    }

    #[test]
    fn test_zero_bounds_are_fatal() {
        assert!(GeometryPlanner::plan(100, 100, 0, 1080, 400, 300).is_err());
        assert!(GeometryPlanner::plan(100, 100, 1920, 1080, 400, 0).is_err());
    }
}
