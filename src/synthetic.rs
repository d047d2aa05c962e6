//! Synthetic catalog generator for stress testing and benchmarking.
//!
//! Feature-gated behind `synthetic`, not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use cityscope::synthetic::SyntheticCatalog;
//! use cityscope::{CityCatalog, StateBounds};
//!
//! let scenario = SyntheticCatalog {
//!     city_count: 500,
//!     out_of_bounds_fraction: 0.1,
//!     bounds: StateBounds::default(),
//!     seed: 42,
//! };
//!
//! let records = scenario.generate();
//! assert_eq!(records.len(), 500);
//!
//! let catalog = CityCatalog::load(records, &scenario.bounds).unwrap();
//! assert!(catalog.len() < 500);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{RawCity, StateBounds};

/// Parameters for a reproducible random catalog.
#[derive(Debug, Clone)]
pub struct SyntheticCatalog {
    /// Number of records to generate.
    pub city_count: usize,
    /// Fraction of records placed just outside the bounds (0.0-1.0).
    pub out_of_bounds_fraction: f64,
    /// Box the valid records are spread over.
    pub bounds: StateBounds,
    /// RNG seed; the same seed always yields the same records.
    pub seed: u64,
}

impl Default for SyntheticCatalog {
    fn default() -> Self {
        Self {
            city_count: 1_000,
            out_of_bounds_fraction: 0.0,
            bounds: StateBounds::default(),
            seed: 42,
        }
    }
}

impl SyntheticCatalog {
    /// Generate raw records named `City 0`, `City 1`, ...
    pub fn generate(&self) -> Vec<RawCity> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let b = self.bounds;

        (0..self.city_count)
            .map(|i| {
                let (lat, lng) = if rng.gen_bool(self.out_of_bounds_fraction.clamp(0.0, 1.0)) {
                    // One degree north of the box, longitude anywhere.
                    (b.north + rng.gen_range(0.5..1.5), rng.gen_range(b.west..=b.east))
                } else {
                    (rng.gen_range(b.south..=b.north), rng.gen_range(b.west..=b.east))
                };
                let population = rng.gen_range(0..2_000_000u64);
                RawCity::new(format!("City {i}"), lat, lng, population)
            })
            .collect()
    }
}
