use geo::{Coord, CoordNum, Rect};

use crate::errors::Result;

#[derive(thiserror::Error, Debug)]
pub enum IntersectionError {
    #[error("There is no intersection between bounds")]
    NoIntersection,
}

pub trait Intersection: Sized {
    fn intersection(&self, rhs: &Self) -> Result<Self>;
}

fn select<T: CoordNum>(lhs: Coord<T>, rhs: Coord<T>, pick: fn(T, T) -> T) -> Coord<T> {
    Coord {
        x: pick(lhs.x, rhs.x),
        y: pick(lhs.y, rhs.y),
    }
}

impl<T: CoordNum> Intersection for Rect<T> {
    /// Overlap of two rects. Rects that only touch give an empty rect.
    fn intersection(&self, rhs: &Self) -> Result<Rect<T>> {
        let (lhs_min, lhs_max) = (self.min(), self.max());
        let (rhs_min, rhs_max) = (rhs.min(), rhs.max());
        if (lhs_max.x < rhs_min.x) | (lhs_max.y < rhs_min.y)
            | (lhs_min.x > rhs_max.x) | (lhs_min.y > rhs_max.y)
        {
            Err(IntersectionError::NoIntersection)?
        }

        let min = select(lhs_min, rhs_min, |x, y| if x > y { x } else { y });
        let max = select(lhs_max, rhs_max, |x, y| if x < y { x } else { y });

        Ok(Self::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((-2, -2), (12, 12), ((0, 0), (10, 10)))]
    #[case((4, -3), (8, 5), ((4, 0), (8, 5)))]
    #[case((10, 0), (14, 10), ((10, 0), (10, 10)))]
    fn overlapping_rects(
        #[case] min: (isize, isize),
        #[case] max: (isize, isize),
        #[case] expected: ((isize, isize), (isize, isize)),
    ) {
        let raster = Rect::new((0, 0), (10, 10));
        let overlap = raster.intersection(&Rect::new(min, max)).unwrap();
        assert_eq!(overlap, Rect::new(expected.0, expected.1));
    }

    #[rstest]
    fn disjoint_rects() {
        let raster = Rect::new((0isize, 0), (10, 10));
        let outside = Rect::new((11, 11), (20, 20));
        assert!(raster.intersection(&outside).is_err());
    }
}
