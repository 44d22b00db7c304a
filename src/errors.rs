use crate::{components::Window, intersection::IntersectionError};

pub type Result<T> = std::result::Result<T, WindowError>;

#[derive(thiserror::Error, Debug)]
pub enum WindowError {
    #[error("No layer loaded, call `load` first")]
    Unloaded,
    #[error("Layer {0:?} is not available in the raster block")]
    MissingLayer(String),
    #[error("Layer name {0:?} is used by more than one band")]
    DuplicateLayer(String),
    #[error("Layer {layer:?} has shape {found:?}, expected block shape {expected:?}")]
    BlockShape {
        layer: String,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Window {0:?} must have positive extents")]
    InvalidWindow(Window),
    #[error("Window {window:?} at index {index:?} falls outside the loaded block")]
    WindowOutOfBounds {
        index: (usize, usize),
        window: Window,
    },
    #[error("Step size must be positive, got {0:?}")]
    InvalidStep((usize, usize)),
    #[error("Number of chunks must be positive")]
    InvalidChunks,
    #[error("At least one class mask is required")]
    NoMasks,
    #[error("Mask of class {class} has shape {found:?}, raster has shape {expected:?}")]
    MaskShape {
        class: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Mask of class {0} has no positions to sample from")]
    EmptyMask(usize),
    #[error("Expected {expected} class probabilities, got {found}")]
    ProbabilityCount { expected: usize, found: usize },
    #[error(transparent)]
    InvalidProbabilities(#[from] rand::distributions::WeightedError),
    #[error(transparent)]
    NoIntersection(#[from] IntersectionError),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[cfg(feature = "gdal")]
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
}
