use ndarray::{s, Array2};
use rstest::{fixture, rstest};
use std::sync::Arc;
use windowed_raster::{
    BlockBounds, ClassMask, Generator, MemoryRaster, Padding, Raster, RasterTransform,
    SampleGenerator, SweepGenerator, Window, WindowError,
};

/// Two layer raster: `index` holds `row * cols + col`, `ones` is all ones.
fn raster(shape: (usize, usize)) -> Arc<MemoryRaster<f32>> {
    let index = Array2::from_shape_fn(shape, |(row, col)| (row * shape.1 + col) as f32);
    Arc::new(
        MemoryRaster::new(shape)
            .with_crs("EPSG:32633")
            .with_transform(RasterTransform::new(10., 0., 500_000., 0., -10., 4_600_000.))
            .with_layer("index", index)
            .unwrap()
            .with_layer("ones", Array2::ones(shape))
            .unwrap(),
    )
}

#[fixture]
fn square() -> Arc<MemoryRaster<f32>> {
    raster((10, 10))
}

#[rstest]
fn pixel_window_at_origin(square: Arc<MemoryRaster<f32>>) {
    let mut generator = Generator::pixel(square);
    generator.load("ones", [(4, 4)]).unwrap();

    assert_eq!(generator.padding().unwrap(), Padding { rows: 2, cols: 2 });
    assert_eq!(generator.block().unwrap(), BlockBounds::new(-2..12, -2..12));
    let window = generator.get((0, 0), (4, 4)).unwrap();
    assert_eq!(window.dim(), (4, 4));
    assert_eq!(window.slice(s![..2, ..]).sum(), 0.);
    assert_eq!(window.slice(s![2.., 2..]).sum(), 4.);
}

#[rstest]
fn every_window_has_requested_shape(square: Arc<MemoryRaster<f32>>) {
    let windows = [Window::new(1, 1), Window::new(4, 7), Window::new(9, 2), Window::new(6, 6)];
    let mut generator = Generator::pixel(square);
    generator.load("index", windows).unwrap();
    for (row, col) in [(0, 0), (0, 9), (9, 0), (9, 9), (5, 4)] {
        for window in windows {
            let view = generator.get((row, col), window).unwrap();
            assert_eq!(view.dim(), window.shape());
        }
    }
}

#[test_log::test]
fn grid_split_matches_documented_example() {
    let mut sweep = SweepGenerator::new(raster((10, 10)), (2, 2))
        .unwrap()
        .with_shape((5, 5));
    let chunks = sweep.split(2).unwrap();
    let rows: Vec<_> = chunks
        .iter()
        .map(|chunk| (chunk.grid().offset.0, chunk.shape().0))
        .collect();
    assert_eq!(rows, vec![(0, 3), (3, 2)]);

    for mut chunk in chunks {
        assert!(matches!(chunk.iter(), Err(WindowError::Unloaded)));
        chunk.load("index", [(4, 4)]).unwrap();
        assert_eq!(chunk.iter().unwrap().count(), chunk.shape().0 * 5);
    }

    sweep.load("index", [(4, 4)]).unwrap();
    assert_eq!(sweep.iter().unwrap().count(), 25);
}

#[rstest]
fn sweep_transform_is_scaled_by_step(square: Arc<MemoryRaster<f32>>) {
    let sweep = SweepGenerator::new(Arc::clone(&square), (2, 5)).unwrap();
    assert_eq!(sweep.transform(), square.transform().scaled((2, 5)));
    assert_eq!(sweep.transform().a(), 50.);
    assert_eq!(sweep.transform().e(), -20.);
    assert_eq!(&*sweep.crs(), "EPSG:32633");
}

#[rstest]
fn sample_and_sweep_share_windows(square: Arc<MemoryRaster<f32>>) {
    let mut mask = Array2::from_elem((10, 10), false);
    mask[[3, 5]] = true;
    let mut sampler = SampleGenerator::new(Arc::clone(&square), [ClassMask::new(&mask)])
        .unwrap()
        .with_samples(1)
        .with_seed(0);
    sampler.load("index", [(3, 3), (5, 5)]).unwrap();

    let mut sweep = SweepGenerator::new(square, (1, 1)).unwrap();
    sweep.load("index", [(5, 5), (3, 3)]).unwrap();

    let sampled: Vec<_> = sampler.iter().unwrap().map(|(view, _)| view.to_owned()).collect();
    let swept: Vec<_> = sweep
        .iter()
        .unwrap()
        .skip((3 * 10 + 5) * 2)
        .take(2)
        .map(|view| view.to_owned())
        .collect();
    assert_eq!(sampled, swept);
    assert_eq!(sampled[0].dim(), (5, 5));
    assert_eq!(sampled[0][[2, 2]], 35.);
}
