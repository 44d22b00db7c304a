use log::debug;
use ndarray::{s, Array2};
use std::sync::Arc;

use crate::{
    components::{
        bounds::BlockBounds,
        raster::{read_padded, DataType, Layers, Raster},
        transforms::RasterTransform,
    },
    errors::{Result, WindowError},
};

/// Raster with all of its layers held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRaster<T: DataType> {
    shape: (usize, usize),
    crs: Arc<str>,
    transform: RasterTransform,
    layers: Layers<T>,
}

impl<T: DataType> MemoryRaster<T> {
    /// Raster of `shape` (rows, cols) without layers, identity
    /// transform and empty crs.
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            crs: Arc::from(""),
            transform: RasterTransform::default(),
            layers: Layers::new(),
        }
    }

    pub fn with_crs(mut self, crs: &str) -> Self {
        self.crs = Arc::from(crs);
        self
    }

    pub fn with_transform(mut self, transform: RasterTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Adds (or replaces) layer `name`; it must have the raster's shape.
    pub fn with_layer(mut self, name: &str, array: Array2<T>) -> Result<Self> {
        if array.dim() != self.shape {
            Err(WindowError::BlockShape {
                layer: name.to_string(),
                expected: self.shape,
                found: array.dim(),
            })?
        }
        self.layers.insert(name.to_string(), array);
        Ok(self)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }
}

impl<T: DataType> Raster for MemoryRaster<T> {
    type Elem = T;

    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn crs(&self) -> Arc<str> {
        Arc::clone(&self.crs)
    }

    fn transform(&self) -> RasterTransform {
        self.transform
    }

    fn copy_block(&self, block: &BlockBounds) -> Result<Layers<T>> {
        debug!("copying {block:?} out of {} in-memory layers", self.layers.len());
        self.layers
            .iter()
            .map(|(name, layer)| {
                let array = read_padded(block, self.shape, |overlap| {
                    let (rows, cols) = (overlap.rows(), overlap.cols());
                    Ok(layer.slice(s![rows, cols]).to_owned())
                })?;
                Ok::<_, WindowError>((name.clone(), array))
            })
            .collect()
    }
}
