use std::ops::Range;

use crate::{
    components::{BlockBounds, Padding, Window},
    errors::{Result, WindowError},
};

/// Tiling of a raster into cells of `step` (rows, cols) pixels.
///
/// `offset` and `shape` are counted in cells, so a grid can cover a
/// part of the raster only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Grid {
    pub step: (usize, usize),
    pub offset: (usize, usize),
    pub shape: (usize, usize),
}

impl Grid {
    /// Grid covering the whole raster, the last cell on each axis
    /// possibly hanging over its edge.
    pub fn new(raster_shape: (usize, usize), step: (usize, usize)) -> Result<Self> {
        let grid = Self {
            step,
            offset: (0, 0),
            shape: (
                raster_shape.0.div_ceil(step.0.max(1)),
                raster_shape.1.div_ceil(step.1.max(1)),
            ),
        };
        grid.validate()
    }

    pub(crate) fn validate(self) -> Result<Self> {
        if self.step.0 == 0 || self.step.1 == 0 {
            Err(WindowError::InvalidStep(self.step))?
        }
        Ok(self)
    }
}

/// How a logical index maps onto the raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indexing {
    /// Indexes are pixels of the raster.
    Pixel,
    /// Indexes are cells of a [Grid], windows centered on the cell center.
    Grid(Grid),
}

fn axis_block(start: usize, length: usize, pad: usize) -> Range<isize> {
    let (start, length, pad) = (start as isize, length as isize, pad as isize);
    start - pad..start + length + pad
}

fn axis_slice(mid: usize, extent: usize) -> Range<isize> {
    let start = mid as isize - (extent / 2) as isize;
    start..start + extent as isize
}

/// floor((index + 0.5) * step)
fn cell_center(index: usize, step: usize) -> usize {
    (2 * index + 1) * step / 2
}

impl Indexing {
    /// Raster range to materialize so that any window no larger than
    /// twice `padding` fits around every index.
    pub fn block(&self, padding: Padding, raster_shape: (usize, usize)) -> BlockBounds {
        match self {
            Indexing::Pixel => BlockBounds::new(
                axis_block(0, raster_shape.0, padding.rows),
                axis_block(0, raster_shape.1, padding.cols),
            ),
            Indexing::Grid(Grid {
                step,
                offset,
                shape,
            }) => BlockBounds::new(
                axis_block(offset.0 * step.0, shape.0 * step.0, padding.rows),
                axis_block(offset.1 * step.1, shape.1 * step.1, padding.cols),
            ),
        }
    }

    /// Row and column ranges of `window` around `index`, relative to
    /// the start of the block computed with the same `padding`.
    ///
    /// Ranges are not checked against the block.
    pub fn slices(
        &self,
        index: (usize, usize),
        window: &Window,
        padding: Padding,
    ) -> (Range<isize>, Range<isize>) {
        let mid = match self {
            Indexing::Pixel => (padding.rows + index.0, padding.cols + index.1),
            Indexing::Grid(Grid { step, .. }) => (
                padding.rows + cell_center(index.0, step.0),
                padding.cols + cell_center(index.1, step.1),
            ),
        };
        (axis_slice(mid.0, window.rows), axis_slice(mid.1, window.cols))
    }
}
