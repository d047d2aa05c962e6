//! Memoized query results keyed by a fingerprint of their inputs.
//!
//! A result is a pure function of the catalog generation and the focus (or
//! rectangle), so it is recomputed only when that fingerprint changes.

use crate::{GeoPoint, Rectangle};

/// Fingerprint of a query's inputs. Floats are compared by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Proximity {
        generation: u64,
        latitude: u64,
        longitude: u64,
        radius_km: u64,
        exclude_name: Option<String>,
    },
    Region {
        generation: u64,
        bounds: [u64; 4],
    },
}

impl QueryKey {
    pub fn proximity(
        generation: u64,
        focus: &GeoPoint,
        radius_km: f64,
        exclude_name: Option<&str>,
    ) -> Self {
        Self::Proximity {
            generation,
            latitude: focus.latitude.to_bits(),
            longitude: focus.longitude.to_bits(),
            radius_km: radius_km.to_bits(),
            exclude_name: exclude_name.map(str::to_string),
        }
    }

    pub fn region(generation: u64, rect: &Rectangle) -> Self {
        Self::Region {
            generation,
            bounds: [
                rect.south.to_bits(),
                rect.west.to_bits(),
                rect.north.to_bits(),
                rect.east.to_bits(),
            ],
        }
    }
}

/// Single-slot cache holding the catalog positions of the current result.
#[derive(Debug, Default)]
pub struct ResultCache {
    key: Option<QueryKey>,
    positions: Vec<usize>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached positions for `key`, computing them on a miss.
    pub fn get_or_compute(
        &mut self,
        key: QueryKey,
        compute: impl FnOnce() -> Vec<usize>,
    ) -> &[usize] {
        if self.key.as_ref() == Some(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.positions = compute();
            self.key = Some(key);
        }
        &self.positions
    }

    /// Drop the current result.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.positions.clear();
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
