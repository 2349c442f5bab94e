use crate::error::{Error, Result};
use crate::topology::coordinate::Coordinate;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};

/// Drops nodes on a rectangle: the number of points follows
/// Poisson(rate), their positions are uniform on
/// `[0, width] x [0, height]`. One seeded generator drives every draw,
/// so successive samples from the same instance are independent but the
/// whole sequence is reproducible.
pub struct PoissonPointProcessGrid {
    width: f64,
    height: f64,
    counts: Poisson<f64>,
    rng: StdRng,
}

impl PoissonPointProcessGrid {
    pub fn new(rate: f64, seed: u64, width: f64, height: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "point process rate {} is not positive",
                rate
            )));
        }
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "grid {}x{} is not a valid rectangle",
                width, height
            )));
        }
        let counts = Poisson::new(rate)
            .map_err(|_| Error::InvalidArgument(format!("invalid Poisson rate {}", rate)))?;
        Ok(Self {
            width,
            height,
            counts,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// One draw of the process; an empty drop is a legitimate outcome.
    pub fn sample(&mut self) -> Vec<Coordinate> {
        let count = self.counts.sample(&mut self.rng) as usize;
        (0..count)
            .map(|_| {
                Coordinate::new(
                    self.rng.gen_range(0.0..self.width),
                    self.rng.gen_range(0.0..self.height),
                    0.0,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_grid() {
        let width = 1000.0;
        let height = 1.0;
        let mut grid = PoissonPointProcessGrid::new(10.0, 42, width, height).unwrap();

        let drop = grid.sample();
        assert!(!drop.is_empty());
        for point in &drop {
            assert!(
                point.x() >= 0.0 && point.x() <= width,
                "({},{})",
                point.x(),
                point.y()
            );
            assert!(
                point.y() >= 0.0 && point.y() <= height,
                "({},{})",
                point.x(),
                point.y()
            );
            assert_eq!(0.0, point.z());
        }

        let mut drop_sizes = BTreeSet::new();
        for _ in 0..100 {
            drop_sizes.insert(grid.sample().len());
        }
        // no drop with 0 elements, and a wide empirical support
        assert!(*drop_sizes.iter().next().unwrap() > 0);
        assert!(drop_sizes.len() >= 10);
    }

    #[test]
    fn test_same_seed_reproduces_the_drop() {
        let mut a = PoissonPointProcessGrid::new(10.0, 7, 50.0, 50.0).unwrap();
        let mut b = PoissonPointProcessGrid::new(10.0, 7, 50.0, 50.0).unwrap();
        assert_eq!(a.sample(), b.sample());
        assert_eq!(a.sample(), b.sample());
    }

    #[test]
    fn test_rejects_degenerate_parameters() {
        assert!(PoissonPointProcessGrid::new(0.0, 1, 10.0, 10.0).is_err());
        assert!(PoissonPointProcessGrid::new(-1.0, 1, 10.0, 10.0).is_err());
        assert!(PoissonPointProcessGrid::new(10.0, 1, 0.0, 10.0).is_err());
        assert!(PoissonPointProcessGrid::new(10.0, 1, 10.0, -5.0).is_err());
    }
}
