mod cache;
mod indexing;
mod sample;
mod sweep;

pub use cache::{Generator, WindowCache};
pub use indexing::{Grid, Indexing};
pub use sample::{ClassMask, Draw, SampleGenerator, Sampling};
pub use sweep::SweepGenerator;
