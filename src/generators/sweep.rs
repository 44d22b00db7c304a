use itertools::iproduct;
use log::debug;
use ndarray::ArrayView2;
use rayon::prelude::*;
use shrinkwraprs::Shrinkwrap;
use std::sync::Arc;

use crate::{
    components::{Raster, Window},
    errors::{Result, WindowError},
    generators::{
        cache::Generator,
        indexing::{Grid, Indexing},
    },
};

/// Generator visiting every cell of a [Grid] in row-major order.
///
/// Dereferences to [Generator] for `get` and the cache accessors,
/// indexes being grid cells.
#[derive(Shrinkwrap, Debug)]
pub struct SweepGenerator<R: Raster> {
    generator: Generator<R>,
}

impl<R: Raster> SweepGenerator<R> {
    /// Sweep over the whole raster in cells of `step` (rows, cols) pixels.
    pub fn new(raster: Arc<R>, step: (usize, usize)) -> Result<Self> {
        let grid = Grid::new(raster.shape(), step)?;
        Ok(Self::build(raster, grid))
    }

    pub fn from_grid(raster: Arc<R>, grid: Grid) -> Result<Self> {
        Ok(Self::build(raster, grid.validate()?))
    }

    fn build(raster: Arc<R>, grid: Grid) -> Self {
        Self {
            generator: Generator::new(raster, Indexing::Grid(grid)),
        }
    }

    /// Start the sweep `offset` (rows, cols) cells into the raster.
    ///
    /// Returns an unloaded generator.
    pub fn with_offset(self, offset: (usize, usize)) -> Self {
        let grid = Grid {
            offset,
            ..self.grid()
        };
        Self::build(self.generator.raster().clone(), grid)
    }

    /// Restrict the sweep to `shape` (rows, cols) cells.
    ///
    /// Returns an unloaded generator.
    pub fn with_shape(self, shape: (usize, usize)) -> Self {
        let grid = Grid {
            shape,
            ..self.grid()
        };
        Self::build(self.generator.raster().clone(), grid)
    }

    /// See [Generator::load].
    pub fn load<W: Into<Window>>(
        &mut self,
        layer: &str,
        windows: impl IntoIterator<Item = W>,
    ) -> Result<()> {
        self.generator.load(layer, windows)
    }

    pub fn grid(&self) -> Grid {
        match self.generator.indexing() {
            Indexing::Grid(grid) => *grid,
            Indexing::Pixel => unreachable!("sweeps are only built with grid indexing"),
        }
    }

    /// (rows, cols) in cells.
    pub fn shape(&self) -> (usize, usize) {
        self.grid().shape
    }

    /// Cell indexes in the order [SweepGenerator::iter] visits them.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = self.shape();
        iproduct!(0..rows, 0..cols)
    }

    /// Number of arrays a full sweep yields.
    pub fn item_count(&self) -> Result<usize> {
        let (rows, cols) = self.shape();
        Ok(rows * cols * self.windows()?.len())
    }

    /// Every configured window of every cell, largest window first
    /// within a cell. Each call starts over from the first cell.
    pub fn iter(&self) -> Result<impl Iterator<Item = ArrayView2<'_, R::Elem>> + '_> {
        let cache = self.cache()?;
        let indexing = self.indexing();
        Ok(self
            .cells()
            .flat_map(move |index| cache.windows_at(indexing, index)))
    }

    /// Split the rows of the sweep into at most `n_chunks` contiguous
    /// unloaded generators of `ceil(rows / n_chunks)` rows, the last one
    /// possibly shorter.
    pub fn split(&self, n_chunks: usize) -> Result<Vec<Self>> {
        if n_chunks == 0 {
            Err(WindowError::InvalidChunks)?
        }
        let grid = self.grid();
        let chunk_size = grid.shape.0.div_ceil(n_chunks);
        let chunks: Vec<Self> = (0..n_chunks)
            .map_while(|job| {
                let start = job * chunk_size;
                let rows = chunk_size.min(grid.shape.0.saturating_sub(start));
                (rows > 0).then(|| Grid {
                    offset: (grid.offset.0 + start, grid.offset.1),
                    shape: (rows, grid.shape.1),
                    ..grid
                })
            })
            .map(|grid| Self::build(Arc::clone(self.raster()), grid))
            .collect();
        debug!(
            "split {:?} into {} chunks of up to {chunk_size} rows",
            grid,
            chunks.len()
        );
        Ok(chunks)
    }
}

impl<R: Raster + Send + Sync> SweepGenerator<R> {
    /// Split into `n_chunks`, load every chunk with `layer` and
    /// `windows` and run `f` on the chunks in parallel.
    ///
    /// Results are in chunk order.
    pub fn process_split<U, F>(
        &self,
        n_chunks: usize,
        layer: &str,
        windows: &[Window],
        f: F,
    ) -> Result<Vec<U>>
    where
        U: Send,
        F: Fn(&SweepGenerator<R>) -> Result<U> + Send + Sync,
    {
        self.split(n_chunks)?
            .into_par_iter()
            .map(|mut chunk| {
                chunk.load(layer, windows.iter().copied())?;
                f(&chunk)
            })
            .collect()
    }
}
