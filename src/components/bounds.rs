use geo::{Coord, Rect};
use shrinkwraprs::Shrinkwrap;
use std::ops::Range;

use crate::{errors::Result, intersection::Intersection};

/// Shape (rows, cols) of a sub-array requested around an index.
///
/// Ordering is lexicographic on `(rows, cols)`, which is the order
/// generators use to hand out windows (largest first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Window {
    pub rows: usize,
    pub cols: usize,
}

impl Window {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Offset from the window center to its first row and column.
    /// Even extents lean towards the lower index.
    pub fn half(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }
}

impl From<(usize, usize)> for Window {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// Margin materialized around the logical area on each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    pub rows: usize,
    pub cols: usize,
}

impl Padding {
    /// Smallest symmetric padding that keeps every window in bounds
    /// when centered on any index of the logical area.
    pub fn from_windows<'a>(windows: impl IntoIterator<Item = &'a Window>) -> Self {
        windows
            .into_iter()
            .fold(Padding::default(), |padding, window| Padding {
                rows: padding.rows.max(window.rows.div_ceil(2)),
                cols: padding.cols.max(window.cols.div_ceil(2)),
            })
    }
}

/// Absolute raster range materialized for a load.
///
/// Coordinates are `x = col`, `y = row`; bounds are half-open and may
/// extend past the raster on any side.
#[derive(Shrinkwrap, Clone, Copy, Debug, PartialEq)]
pub struct BlockBounds(Rect<isize>);

impl BlockBounds {
    pub fn new(rows: Range<isize>, cols: Range<isize>) -> Self {
        Self(Rect::new(
            Coord {
                x: cols.start,
                y: rows.start,
            },
            Coord {
                x: cols.end,
                y: rows.end,
            },
        ))
    }

    /// Bounds covering the whole raster of `shape` (rows, cols).
    pub fn from_shape(shape: (usize, usize)) -> Self {
        Self::new(0..shape.0 as isize, 0..shape.1 as isize)
    }

    pub fn rows(&self) -> Range<isize> {
        self.0.min().y..self.0.max().y
    }

    pub fn cols(&self) -> Range<isize> {
        self.0.min().x..self.0.max().x
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.0.height() as usize, self.0.width() as usize)
    }

    pub fn offset(&self) -> (isize, isize) {
        (self.0.min().y, self.0.min().x)
    }

    pub fn is_empty(&self) -> bool {
        self.0.height() == 0 || self.0.width() == 0
    }
}

impl Intersection for BlockBounds {
    fn intersection(&self, rhs: &Self) -> Result<Self> {
        Ok(BlockBounds(self.0.intersection(&rhs.0)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[(4, 4)], Padding { rows: 2, cols: 2 })]
    #[case(&[(5, 3)], Padding { rows: 3, cols: 2 })]
    #[case(&[(2, 10), (7, 1), (4, 4)], Padding { rows: 4, cols: 5 })]
    #[case(&[], Padding { rows: 0, cols: 0 })]
    fn padding_covers_largest_half_window(
        #[case] windows: &[(usize, usize)],
        #[case] expected: Padding,
    ) {
        let windows: Vec<Window> = windows.iter().copied().map(Window::from).collect();
        assert_eq!(Padding::from_windows(&windows), expected);
    }

    #[rstest]
    fn windows_order_by_rows_then_cols() {
        let mut windows = vec![Window::new(2, 9), Window::new(8, 1), Window::new(8, 4)];
        windows.sort_by(|lhs, rhs| rhs.cmp(lhs));
        assert_eq!(
            windows,
            vec![Window::new(8, 4), Window::new(8, 1), Window::new(2, 9)]
        );
    }

    #[rstest]
    fn block_axes() {
        let block = BlockBounds::new(-2..12, -3..13);
        assert_eq!(block.rows(), -2..12);
        assert_eq!(block.cols(), -3..13);
        assert_eq!(block.shape(), (14, 16));
        assert_eq!(block.offset(), (-2, -3));
    }

    #[rstest]
    fn block_clipped_to_raster() {
        let raster = BlockBounds::from_shape((10, 8));
        let clipped = BlockBounds::new(-2..4, 6..10).intersection(&raster).unwrap();
        assert_eq!(clipped, BlockBounds::new(0..4, 6..8));
    }
}
