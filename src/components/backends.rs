/// Implementations for gdal
#[cfg(feature = "gdal")]
pub mod gdal_backend {
    use gdal::{raster::GdalType, Dataset as GdalDataset, Metadata as GdalMetadata};
    use itertools::Itertools;
    use log::info;
    use ndarray::Array2;
    use std::{marker::PhantomData, path::Path, sync::Arc};

    use crate::{
        components::{
            bounds::BlockBounds,
            raster::{read_padded, DataType, Layers, Raster},
            transforms::RasterTransform,
        },
        errors::{Result, WindowError},
    };

    /// Raster backed by a file gdal can open.
    ///
    /// Each band becomes a layer named after its description,
    /// or `band_<n>` (1-based) when it has none. Names must be unique.
    /// The file is reopened
    /// on every block copy so the handle can be shared between threads.
    #[derive(Debug)]
    pub struct GdalRaster<T: DataType + GdalType> {
        _t: PhantomData<T>,
        path: Arc<Path>,
        shape: (usize, usize),
        crs: Arc<str>,
        transform: RasterTransform,
        layer_names: Box<[String]>,
    }

    impl<T: DataType + GdalType> GdalRaster<T> {
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let dataset = GdalDataset::open(&path)?;
            let (cols, rows) = dataset.raster_size();
            let layer_names: Box<[String]> = (1..=dataset.raster_count())
                .map(|index| {
                    let description = dataset.rasterband(index)?.description()?;
                    Ok::<_, WindowError>(if description.is_empty() {
                        format!("band_{index}")
                    } else {
                        description
                    })
                })
                .collect::<Result<_>>()?;
            if let Some(name) = layer_names.iter().duplicates().next() {
                Err(WindowError::DuplicateLayer(name.clone()))?
            }
            let raster = Self {
                _t: PhantomData,
                path: Arc::from(path.as_ref()),
                shape: (rows, cols),
                crs: Arc::from(dataset.projection()),
                transform: RasterTransform::from_gdal(dataset.geo_transform()?),
                layer_names,
            };
            info!("opened {raster:?}");
            Ok(raster)
        }

        pub fn layer_names(&self) -> impl Iterator<Item = &str> {
            self.layer_names.iter().map(String::as_str)
        }
    }

    impl<T: DataType + GdalType> Raster for GdalRaster<T> {
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
            let dataset = GdalDataset::open(&self.path)?;
            self.layer_names
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    let rasterband = dataset.rasterband(index + 1)?;
                    let array = read_padded(block, self.shape, |overlap| {
                        let (rows, cols) = overlap.shape();
                        let (row_offset, col_offset) = overlap.offset();
                        let buffer = rasterband.read_as::<T>(
                            (col_offset, row_offset),
                            (cols, rows),
                            (cols, rows),
                            None,
                        )?;
                        Ok(Array2::from_shape_vec((rows, cols), buffer.data().to_vec())?)
                    })?;
                    Ok::<_, WindowError>((name.clone(), array))
                })
                .collect()
        }
    }
}
