use either::Either;
use ndarray::{ArrayView2, AsArray, Ix2};
use num::Zero;
use rand::{
    distributions::{Distribution, WeightedError, WeightedIndex},
    rngs::StdRng,
    Rng, SeedableRng,
};
use shrinkwraprs::Shrinkwrap;
use std::{iter, sync::Arc};

use crate::{
    components::{Raster, Window},
    errors::{Result, WindowError},
    generators::cache::Generator,
};

/// Positions of one class, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMask {
    shape: (usize, usize),
    positions: Box<[(usize, usize)]>,
}

impl ClassMask {
    /// Mask of the `true` positions of `mask`.
    pub fn new<'a>(mask: impl AsArray<'a, bool, Ix2>) -> Self {
        let mask: ArrayView2<bool> = mask.into();
        let positions = mask
            .indexed_iter()
            .filter_map(|(index, value)| value.then_some(index))
            .collect();
        Self {
            shape: mask.dim(),
            positions,
        }
    }

    /// Mask of the positions of `indicator` holding a positive value.
    pub fn from_indicator<'a, A>(indicator: impl AsArray<'a, A, Ix2>) -> Self
    where
        A: Zero + PartialOrd + 'a,
    {
        let indicator: ArrayView2<A> = indicator.into();
        let positions = indicator
            .indexed_iter()
            .filter_map(|(index, value)| (*value > A::zero()).then_some(index))
            .collect();
        Self {
            shape: indicator.dim(),
            positions,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn positions(&self) -> &[(usize, usize)] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Sampling parameters of a [SampleGenerator].
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Sampling {
    /// Probability of drawing each class, uniform when missing.
    pub probabilities: Option<Vec<f64>>,
    /// Number of draws, unbounded when missing.
    pub samples: Option<usize>,
    /// Seed for reproducible draws, OS entropy when missing.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
struct ClassWeights {
    probabilities: Box<[f64]>,
    index: WeightedIndex<f64>,
}

/// One sampled pixel and the class it was drawn for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Draw {
    pub index: (usize, usize),
    pub class: usize,
}

/// Generator yielding windows around randomly drawn pixels of class masks.
///
/// Every draw first picks a class, then a position of that class's mask,
/// with replacement. Dereferences to [Generator] for `get` and the cache
/// accessors, indexes being raster pixels.
#[derive(Shrinkwrap, Debug)]
pub struct SampleGenerator<R: Raster> {
    #[shrinkwrap(main_field)]
    generator: Generator<R>,
    masks: Box<[ClassMask]>,
    weights: Option<ClassWeights>,
    samples: Option<usize>,
    seed: Option<u64>,
}

impl<R: Raster> SampleGenerator<R> {
    /// Uniform, unbounded and unseeded sampling of `masks`, one per class.
    ///
    /// Masks must have the raster's shape.
    pub fn new(raster: Arc<R>, masks: impl IntoIterator<Item = ClassMask>) -> Result<Self> {
        let masks: Box<[ClassMask]> = masks.into_iter().collect();
        if masks.is_empty() {
            Err(WindowError::NoMasks)?
        }
        let expected = raster.shape();
        if let Some((class, mask)) = masks
            .iter()
            .enumerate()
            .find(|(_, mask)| mask.shape() != expected)
        {
            Err(WindowError::MaskShape {
                class,
                expected,
                found: mask.shape(),
            })?
        }

        Ok(Self {
            generator: Generator::pixel(raster),
            masks,
            weights: None,
            samples: None,
            seed: None,
        })
    }

    /// Draw classes with the given (unnormalized) probabilities.
    ///
    /// Probabilities must be non-negative with a finite, positive sum.
    pub fn with_probabilities(mut self, probabilities: &[f64]) -> Result<Self> {
        if probabilities.len() != self.masks.len() {
            Err(WindowError::ProbabilityCount {
                expected: self.masks.len(),
                found: probabilities.len(),
            })?
        }
        if !probabilities.iter().sum::<f64>().is_finite() {
            Err(WeightedError::InvalidWeight)?
        }
        self.weights = Some(ClassWeights {
            index: WeightedIndex::new(probabilities)?,
            probabilities: Box::from(probabilities),
        });
        Ok(self)
    }

    /// Stop after `samples` draws.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sampling(self, sampling: Sampling) -> Result<Self> {
        let Sampling {
            probabilities,
            samples,
            seed,
        } = sampling;
        let mut generator = match probabilities {
            Some(probabilities) => self.with_probabilities(&probabilities)?,
            None => self,
        };
        generator.samples = samples;
        generator.seed = seed;
        Ok(generator)
    }

    /// See [Generator::load].
    pub fn load<W: Into<Window>>(
        &mut self,
        layer: &str,
        windows: impl IntoIterator<Item = W>,
    ) -> Result<()> {
        self.generator.load(layer, windows)
    }

    pub fn masks(&self) -> &[ClassMask] {
        &self.masks
    }

    pub fn samples(&self) -> Option<usize> {
        self.samples
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// A class that can be drawn must have positions to draw from.
    fn check_masks(&self) -> Result<()> {
        let empty = match &self.weights {
            Some(ClassWeights { probabilities, .. }) => self
                .masks
                .iter()
                .zip(probabilities.iter())
                .position(|(mask, probability)| mask.is_empty() && *probability > 0.),
            None => self.masks.iter().position(ClassMask::is_empty),
        };
        match empty {
            Some(class) => Err(WindowError::EmptyMask(class)),
            None => Ok(()),
        }
    }

    /// Sampled positions, without reading any data.
    ///
    /// Every call starts a new random generator, so seeded generators
    /// repeat the same draws.
    pub fn draws(&self) -> Result<impl Iterator<Item = Draw> + '_> {
        self.check_masks()?;
        let mut rng = self.rng();
        let draws = iter::repeat_with(move || {
            let class = match &self.weights {
                Some(weights) => weights.index.sample(&mut rng),
                None => rng.gen_range(0..self.masks.len()),
            };
            let positions = self.masks[class].positions();
            let index = positions[rng.gen_range(0..positions.len())];
            Draw { index, class }
        });
        Ok(match self.samples {
            Some(samples) => Either::Left(draws.take(samples)),
            None => Either::Right(draws),
        })
    }

    /// Every configured window around each draw, largest first, paired
    /// with the drawn class.
    pub fn iter(&self) -> Result<impl Iterator<Item = (ArrayView2<'_, R::Elem>, usize)> + '_> {
        let cache = self.cache()?;
        let indexing = self.indexing();
        Ok(self.draws()?.flat_map(move |Draw { index, class }| {
            cache
                .windows_at(indexing, index)
                .map(move |window| (window, class))
        }))
    }
}
