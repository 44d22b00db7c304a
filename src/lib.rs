//! Padded, windowed access to large rasters.
//!
//! A generator materializes one layer of a raster block once per
//! [`Generator::load`] and hands out `ndarray` views of windows centered
//! on pixel or grid indexes. [`SweepGenerator`] visits every cell of a
//! grid and can be split for parallel processing, [`SampleGenerator`]
//! draws class-balanced random pixels from masks.

mod components;
mod errors;
mod generators;
mod intersection;

pub use components::{
    read_padded, BlockBounds, DataType, Layers, MemoryRaster, Padding, Raster, RasterTransform,
    Window,
};
#[cfg(feature = "gdal")]
pub use components::backends::gdal_backend::GdalRaster;
pub use errors::{Result, WindowError};
pub use generators::{
    ClassMask, Draw, Generator, Grid, Indexing, SampleGenerator, Sampling, SweepGenerator,
    WindowCache,
};
pub use intersection::{Intersection, IntersectionError};
