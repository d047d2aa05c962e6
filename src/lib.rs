//! # Cityscope
//!
//! Geospatial selection engine for exploring the municipalities of a state
//! on an interactive map.
//!
//! This library provides:
//! - Great-circle distance and rectangle containment primitives
//! - A validated, immutable-per-load city catalog with an R-tree index
//! - Proximity queries (cities within a radius of a focus)
//! - Region queries (cities inside a drawn rectangle)
//! - A two-click rectangle drawing state machine
//! - A selection controller that keeps exactly one selection active
//! - Async catalog loading with caching and a fallback dataset
//!
//! ## Features
//!
//! - **`parallel`** - Parallel proximity scans with rayon
//! - **`persistence`** - SQLite-backed catalog cache
//! - **`http`** - IBGE municipality list + Nominatim geocoding source
//! - **`synthetic`** - Synthetic catalog generator for benchmarks
//! - **`cli`** - The `cityscope-cli` debug tool
//!
//! ## Quick Start
//!
//! ```rust
//! use cityscope::{data, CityCatalog, SelectionController, SelectionConfig, StateBounds};
//!
//! let catalog = CityCatalog::load(data::fallback_cities(), &StateBounds::default()).unwrap();
//! let mut controller = SelectionController::new(catalog, SelectionConfig::default());
//!
//! controller.select_city_by_name("Belo Horizonte");
//! for city in controller.results() {
//!     println!("{} is nearby", city.name);
//! }
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{CatalogError, OptionExt, Result};

// Geographic primitives (distance, containment, rectangle normalization)
pub mod geo_utils;

// Validated city collection
pub mod catalog;
pub use catalog::{CityCatalog, LoadReport, RawCity, RawId, RawValue, StateBounds};

// Radius and rectangle queries
pub mod proximity;
pub use proximity::near;
pub mod region;
pub use region::within;

// Two-click rectangle drawing
pub mod draw;
pub use draw::{DrawSession, DrawState};

// Catalog caches
pub mod cache;
pub use cache::{CatalogCache, JsonFileCache, MemoryCache, CACHE_KEY};
#[cfg(feature = "persistence")]
pub use cache::SqliteCache;

// Static reference data (regional centers, fallback cities)
pub mod data;

// Selection engine with its loader and memoized results
pub mod engine;
pub use engine::{
    CatalogLoader, CatalogOrigin, CatalogSource, LoadOutcome, LoaderConfig, ResultCache,
    Selection, SelectionConfig, SelectionController, StaticSource,
};

// HTTP catalog source backed by IBGE and Nominatim
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::IbgeSource;

// Synthetic catalogs for stress testing
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use cityscope::GeoPoint;
/// let point = GeoPoint::new(-19.9167, -43.9345); // Belo Horizonte
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has finite coordinates inside the valid WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Axis-aligned latitude/longitude rectangle.
///
/// Invariant: `south <= north` and `west <= east`. Use
/// [`Rectangle::from_corners`] to build one from two arbitrary points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Rectangle {
    /// Normalize two arbitrary corner points into a rectangle.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        geo_utils::normalize_rectangle(&a, &b)
    }

    /// Inclusive containment on all four edges.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        geo_utils::contains(self, point)
    }

    /// A rectangle with zero area (zero width or zero height).
    pub fn is_degenerate(&self) -> bool {
        self.south == self.north || self.west == self.east
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// South-west and north-east corners.
    pub fn corners(&self) -> (GeoPoint, GeoPoint) {
        (
            GeoPoint::new(self.south, self.west),
            GeoPoint::new(self.north, self.east),
        )
    }
}

impl From<Rectangle> for geo::Rect<f64> {
    fn from(rect: Rectangle) -> Self {
        geo::Rect::new(
            geo::coord! { x: rect.west, y: rect.south },
            geo::coord! { x: rect.east, y: rect.north },
        )
    }
}

impl From<geo::Rect<f64>> for Rectangle {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        }
    }
}

/// A municipality stored in a [`CityCatalog`].
///
/// The name is the unique key within a catalog. A population of 0 means the
/// population is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub population: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microregion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesoregion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl City {
    /// Create a city with no region metadata.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, population: u64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            population,
            microregion: None,
            mesoregion: None,
            source_id: None,
        }
    }

    /// A city-shaped focus that does not belong to any catalog.
    ///
    /// Used when a regional center's base city is missing from the catalog.
    pub fn transient(name: impl Into<String>, position: GeoPoint) -> Self {
        Self::new(name, position.latitude, position.longitude, 0)
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Population for display, `None` when unknown.
    pub fn population_label(&self) -> Option<u64> {
        (self.population > 0).then_some(self.population)
    }
}

/// A fixed reference point used as an alternate entry into city selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalCenter {
    pub name: String,
    pub base_city_name: String,
    pub coordinates: GeoPoint,
    pub radius_km: f64,
}

impl RegionalCenter {
    /// Cities covered by this regional's own radius, in catalog order.
    pub fn covered_cities<'a>(&self, catalog: &'a CityCatalog) -> Vec<&'a City> {
        near(catalog, &self.coordinates, self.radius_km, None)
    }
}
