use log::info;
use ndarray::{s, Array2, ArrayView2};
use std::{ops::Range, sync::Arc};

use crate::{
    components::{BlockBounds, Padding, Raster, RasterTransform, Window},
    errors::{Result, WindowError},
    generators::indexing::{Grid, Indexing},
};

/// Padded block of one layer together with the windows it was loaded for.
#[derive(Debug)]
pub struct WindowCache<T> {
    layer: String,
    /// Sorted largest first.
    windows: Box<[Window]>,
    padding: Padding,
    block: BlockBounds,
    array: Array2<T>,
}

impl<T> WindowCache<T> {
    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn block(&self) -> BlockBounds {
        self.block
    }

    pub fn array(&self) -> ArrayView2<'_, T> {
        self.array.view()
    }

    fn contains(&self, (rows, cols): &(Range<isize>, Range<isize>)) -> bool {
        let (height, width) = self.array.dim();
        rows.start >= 0 && cols.start >= 0 && rows.end <= height as isize && cols.end <= width as isize
    }

    /// Panics if the ranges leave the block.
    fn slice(&self, (rows, cols): (Range<isize>, Range<isize>)) -> ArrayView2<'_, T> {
        self.array.slice(s![rows, cols])
    }

    /// Views of every configured window around `index`, largest first.
    ///
    /// Only valid for indexes inside the logical area the block was
    /// computed for.
    pub(crate) fn windows_at<'a>(
        &'a self,
        indexing: &'a Indexing,
        index: (usize, usize),
    ) -> impl Iterator<Item = ArrayView2<'a, T>> + 'a {
        self.windows
            .iter()
            .map(move |window| self.slice(indexing.slices(index, window, self.padding)))
    }
}

#[derive(Debug)]
enum Lifecycle<T> {
    Unloaded,
    Loaded(WindowCache<T>),
}

/// Windowed access to one layer of a raster.
///
/// Nothing can be read before [Generator::load] materialized a block.
#[derive(Debug)]
pub struct Generator<R: Raster> {
    raster: Arc<R>,
    indexing: Indexing,
    lifecycle: Lifecycle<R::Elem>,
}

impl<R: Raster> Generator<R> {
    pub fn new(raster: Arc<R>, indexing: Indexing) -> Self {
        Self {
            raster,
            indexing,
            lifecycle: Lifecycle::Unloaded,
        }
    }

    /// Generator indexed by raster pixels.
    pub fn pixel(raster: Arc<R>) -> Self {
        Self::new(raster, Indexing::Pixel)
    }

    /// Materialize `layer` with enough padding for every window in
    /// `windows`, replacing whatever was loaded before.
    ///
    /// On error the previous state is kept.
    pub fn load<W: Into<Window>>(
        &mut self,
        layer: &str,
        windows: impl IntoIterator<Item = W>,
    ) -> Result<()> {
        let mut windows: Box<[Window]> = windows.into_iter().map(Into::into).collect();
        if let Some(window) = windows.iter().find(|window| window.rows == 0 || window.cols == 0) {
            Err(WindowError::InvalidWindow(*window))?
        }
        windows.sort_by(|lhs, rhs| rhs.cmp(lhs));

        let padding = Padding::from_windows(windows.iter());
        let block = self.indexing.block(padding, self.raster.shape());
        info!("loading layer {layer:?} as {block:?} with {padding:?} for {windows:?}");

        let array = self
            .raster
            .copy_block(&block)?
            .remove(layer)
            .ok_or_else(|| WindowError::MissingLayer(layer.to_string()))?;
        if array.dim() != block.shape() {
            Err(WindowError::BlockShape {
                layer: layer.to_string(),
                expected: block.shape(),
                found: array.dim(),
            })?
        }

        self.lifecycle = Lifecycle::Loaded(WindowCache {
            layer: layer.to_string(),
            windows,
            padding,
            block,
            array,
        });
        Ok(())
    }

    /// View of `window` centered on `index`.
    pub fn get(
        &self,
        index: (usize, usize),
        window: impl Into<Window>,
    ) -> Result<ArrayView2<'_, R::Elem>> {
        let cache = self.cache()?;
        let window = window.into();
        let slices = self.indexing.slices(index, &window, cache.padding);
        if !cache.contains(&slices) {
            Err(WindowError::WindowOutOfBounds { index, window })?
        }
        Ok(cache.slice(slices))
    }

    pub fn cache(&self) -> Result<&WindowCache<R::Elem>> {
        match &self.lifecycle {
            Lifecycle::Loaded(cache) => Ok(cache),
            Lifecycle::Unloaded => Err(WindowError::Unloaded),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Loaded(_))
    }

    pub fn loaded_layer(&self) -> Option<&str> {
        self.cache().ok().map(WindowCache::layer)
    }

    pub fn windows(&self) -> Result<&[Window]> {
        self.cache().map(WindowCache::windows)
    }

    pub fn padding(&self) -> Result<Padding> {
        self.cache().map(WindowCache::padding)
    }

    pub fn block(&self) -> Result<BlockBounds> {
        self.cache().map(WindowCache::block)
    }

    pub fn raster(&self) -> &Arc<R> {
        &self.raster
    }

    pub fn indexing(&self) -> &Indexing {
        &self.indexing
    }

    pub fn crs(&self) -> Arc<str> {
        self.raster.crs()
    }

    /// Transform from generator indexes to geo space.
    pub fn transform(&self) -> RasterTransform {
        match self.indexing {
            Indexing::Pixel => self.raster.transform(),
            Indexing::Grid(Grid { step, .. }) => self.raster.scaled_transform(step),
        }
    }
}
