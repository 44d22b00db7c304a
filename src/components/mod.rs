pub mod backends;
pub mod bounds;
pub mod memory;
pub mod raster;
pub mod transforms;

pub use bounds::{BlockBounds, Padding, Window};
pub use memory::MemoryRaster;
pub use raster::{read_padded, DataType, Layers, Raster};
pub use transforms::RasterTransform;
