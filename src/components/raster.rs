use log::warn;
use ndarray::{s, Array2, ErrorKind, ShapeError};
use num::Num;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    components::{bounds::BlockBounds, transforms::RasterTransform},
    errors::Result,
    intersection::Intersection,
};

/// Element types that can be held in a raster block.
pub trait DataType: Num + Clone + Copy + Send + Sync + Debug + 'static {}
impl<T: Num + Clone + Copy + Send + Sync + Debug + 'static> DataType for T {}

/// Arrays of a materialized block, keyed by layer name.
pub type Layers<T> = HashMap<String, Array2<T>>;

/// Source of raster data a generator reads its blocks from.
pub trait Raster: Debug {
    type Elem: DataType;

    /// (rows, cols) of the full raster.
    fn shape(&self) -> (usize, usize);

    fn crs(&self) -> Arc<str>;

    fn transform(&self) -> RasterTransform;

    /// Transform of a grid whose cells are `step` (rows, cols) pixels.
    fn scaled_transform(&self, step: (usize, usize)) -> RasterTransform {
        self.transform().scaled(step)
    }

    /// Copy `block` out of every layer.
    ///
    /// Returned arrays have the block's shape; areas of the block
    /// outside the raster are zero.
    fn copy_block(&self, block: &BlockBounds) -> Result<Layers<Self::Elem>>;
}

/// Zero filled array of `block`'s shape with the part of `block` that
/// overlaps a raster of `raster_shape` filled in by `read`.
///
/// `read` receives the overlap in raster coordinates and must return an
/// array of exactly that shape. It is not called when there is no overlap.
pub fn read_padded<T: DataType>(
    block: &BlockBounds,
    raster_shape: (usize, usize),
    read: impl FnOnce(&BlockBounds) -> Result<Array2<T>>,
) -> Result<Array2<T>> {
    let mut array = Array2::zeros(block.shape());
    let overlap = match block.intersection(&BlockBounds::from_shape(raster_shape)) {
        Ok(overlap) if !overlap.is_empty() => overlap,
        _ => {
            warn!("block {block:?} lies outside raster of shape {raster_shape:?}");
            return Ok(array);
        }
    };

    let read_array = read(&overlap)?;
    if read_array.dim() != overlap.shape() {
        Err(ShapeError::from_kind(ErrorKind::IncompatibleShape))?
    }

    let (row_offset, col_offset) = block.offset();
    let (rows, cols) = (overlap.rows(), overlap.cols());
    array
        .slice_mut(s![
            rows.start - row_offset..rows.end - row_offset,
            cols.start - col_offset..cols.end - col_offset
        ])
        .assign(&read_array);
    Ok(array)
}
