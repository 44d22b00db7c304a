use geo::{AffineTransform, Coord};
use shrinkwraprs::Shrinkwrap;

/// Pixel space to geo space transform of a raster.
///
/// Pixel coordinates are `x = col`, `y = row`.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct RasterTransform(AffineTransform);

impl RasterTransform {
    /// Coefficients in the same order as [AffineTransform::new].
    pub fn new(a: f64, b: f64, xoff: f64, d: f64, e: f64, yoff: f64) -> Self {
        Self(AffineTransform::new(a, b, xoff, d, e, yoff))
    }

    /// From a GDAL style geo transform
    /// `[xoff, a, b, yoff, d, e]`.
    pub fn from_gdal(gdal_transform: [f64; 6]) -> Self {
        Self::new(
            gdal_transform[1],
            gdal_transform[2],
            gdal_transform[0],
            gdal_transform[4],
            gdal_transform[5],
            gdal_transform[3],
        )
    }

    /// Transform of a grid whose cells span `step` (rows, cols) pixels.
    pub fn scaled(&self, step: (usize, usize)) -> Self {
        let scale = AffineTransform::scale(step.1 as f64, step.0 as f64, Coord { x: 0., y: 0. });
        Self(scale.compose(&self.0))
    }
}

impl Default for RasterTransform {
    fn default() -> Self {
        Self(AffineTransform::identity())
    }
}
