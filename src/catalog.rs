//! City catalog: validated, deduplicated city records for one load cycle.
//!
//! Records are checked against the configured state bounding box at
//! ingestion. Individual bad records are dropped and counted in a
//! [`LoadReport`]; only systemic failures (empty input, nothing valid,
//! undecodable input) fail the load.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::{City, GeoPoint, Rectangle};

/// Source of unique catalog generations, used to key memoized results.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// R-tree entry: `[lng, lat]` position tagged with the city's insertion index.
type CityEntry = GeomWithData<[f64; 2], usize>;

// ============================================================================
// Configuration
// ============================================================================

/// Bounding box of the containing state.
///
/// Cities outside this box are rejected at ingestion. The default is the
/// state of Minas Gerais.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Default for StateBounds {
    fn default() -> Self {
        Self {
            south: -23.0,
            north: -14.0,
            west: -51.0,
            east: -39.0,
        }
    }
}

impl StateBounds {
    pub fn as_rectangle(&self) -> Rectangle {
        Rectangle {
            south: self.south,
            west: self.west,
            north: self.north,
            east: self.east,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.as_rectangle().contains(point)
    }
}

// ============================================================================
// Raw Records
// ============================================================================

/// A numeric field that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Parse into a finite float, `None` if the value is not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// An external identifier that may be numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Numeric(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Numeric(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// A city record as delivered by a data source, before validation.
///
/// Field names accept both the English spelling and the Portuguese one used
/// by the census data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCity {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "lat")]
    pub latitude: Option<RawValue>,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<RawValue>,
    #[serde(default, alias = "populacao", skip_serializing_if = "Option::is_none")]
    pub population: Option<RawValue>,
    #[serde(default, alias = "microrregiao", skip_serializing_if = "Option::is_none")]
    pub microregion: Option<String>,
    #[serde(default, alias = "mesorregiao", skip_serializing_if = "Option::is_none")]
    pub mesoregion: Option<String>,
    #[serde(default, alias = "codigo", skip_serializing_if = "Option::is_none")]
    pub source_id: Option<RawId>,
}

impl RawCity {
    /// A record with numeric coordinates and no metadata.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, population: u64) -> Self {
        Self {
            name: name.into(),
            latitude: Some(RawValue::Number(latitude)),
            longitude: Some(RawValue::Number(longitude)),
            population: Some(RawValue::Number(population as f64)),
            microregion: None,
            mesoregion: None,
            source_id: None,
        }
    }

    /// Decode a JSON array, one element at a time.
    ///
    /// Only a payload that is not an array fails; an element that does not
    /// decode as a record (missing name, non-scalar coordinate, not an
    /// object) comes back as `None`.
    pub fn parse_json(json: &str) -> Result<Vec<Option<RawCity>>> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Ok(values
            .into_iter()
            .map(|value| match serde_json::from_value::<RawCity>(value) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    debug!("[CityCatalog] Undecodable record dropped: {}", e);
                    None
                }
            })
            .collect())
    }
}

impl From<&City> for RawCity {
    fn from(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            latitude: Some(RawValue::Number(city.latitude)),
            longitude: Some(RawValue::Number(city.longitude)),
            population: Some(RawValue::Number(city.population as f64)),
            microregion: city.microregion.clone(),
            mesoregion: city.mesoregion.clone(),
            source_id: city.source_id.clone().map(RawId::Text),
        }
    }
}

/// Why a raw record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Invalid,
    OutOfBounds,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate(raw: RawCity, bounds: &StateBounds) -> std::result::Result<City, Rejection> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(Rejection::Invalid);
    }

    let latitude = raw
        .latitude
        .as_ref()
        .and_then(RawValue::as_f64)
        .ok_or(Rejection::Invalid)?;
    let longitude = raw
        .longitude
        .as_ref()
        .and_then(RawValue::as_f64)
        .ok_or(Rejection::Invalid)?;

    if !bounds.contains(&GeoPoint::new(latitude, longitude)) {
        return Err(Rejection::OutOfBounds);
    }

    // Unknown, negative or non-numeric population all mean "unknown".
    let population = raw
        .population
        .as_ref()
        .and_then(RawValue::as_f64)
        .filter(|p| *p >= 0.0)
        .map(|p| p as u64)
        .unwrap_or(0);

    Ok(City {
        name,
        latitude,
        longitude,
        population,
        microregion: non_empty(raw.microregion),
        mesoregion: non_empty(raw.mesoregion),
        source_id: raw.source_id.map(RawId::into_string),
    })
}

// ============================================================================
// Catalog
// ============================================================================

/// Counts collected while loading a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Records received
    pub total: usize,
    /// Records stored in the catalog
    pub accepted: usize,
    /// Undecodable records, or records with a missing name or non-numeric coordinates
    pub rejected_invalid: usize,
    /// Records outside the state bounding box
    pub rejected_out_of_bounds: usize,
    /// Records dropped because an earlier record had the same name
    pub duplicates: usize,
}

impl LoadReport {
    pub fn rejected(&self) -> usize {
        self.rejected_invalid + self.rejected_out_of_bounds
    }
}

/// Immutable collection of validated cities in insertion order.
#[derive(Debug)]
pub struct CityCatalog {
    cities: Vec<City>,
    by_name: HashMap<String, usize>,
    index: RTree<CityEntry>,
    report: LoadReport,
    generation: u64,
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl CityCatalog {
    /// A catalog with no cities, used before the first successful load.
    pub fn empty() -> Self {
        Self {
            cities: Vec::new(),
            by_name: HashMap::new(),
            index: RTree::new(),
            report: LoadReport::default(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Validate and index raw records.
    ///
    /// Records outside `bounds` or with unusable fields are dropped and
    /// counted; duplicate names keep the first occurrence.
    pub fn load(records: impl IntoIterator<Item = RawCity>, bounds: &StateBounds) -> Result<Self> {
        Self::ingest(records.into_iter().map(Some), bounds)
    }

    /// Decode a JSON array of raw records and load it.
    ///
    /// Elements that cannot be decoded are counted as invalid, like any
    /// other rejected record.
    pub fn from_json(json: &str, bounds: &StateBounds) -> Result<Self> {
        Self::ingest(RawCity::parse_json(json)?, bounds)
    }

    fn ingest(
        records: impl IntoIterator<Item = Option<RawCity>>,
        bounds: &StateBounds,
    ) -> Result<Self> {
        let mut report = LoadReport::default();
        let mut cities = Vec::new();
        let mut by_name = HashMap::new();

        for raw in records {
            report.total += 1;
            let Some(raw) = raw else {
                report.rejected_invalid += 1;
                continue;
            };
            let raw_name = raw.name.clone();
            match validate(raw, bounds) {
                Ok(city) => {
                    if by_name.contains_key(&city.name) {
                        debug!("[CityCatalog] Duplicate city dropped: {}", city.name);
                        report.duplicates += 1;
                        continue;
                    }
                    by_name.insert(city.name.clone(), cities.len());
                    cities.push(city);
                }
                Err(Rejection::Invalid) => {
                    debug!("[CityCatalog] Invalid record dropped: {:?}", raw_name);
                    report.rejected_invalid += 1;
                }
                Err(Rejection::OutOfBounds) => {
                    debug!("[CityCatalog] Out-of-bounds city dropped: {}", raw_name);
                    report.rejected_out_of_bounds += 1;
                }
            }
        }

        if report.total == 0 {
            return Err(CatalogError::EmptyInput);
        }
        if cities.is_empty() {
            return Err(CatalogError::NoValidRecords {
                total: report.total,
                rejected: report.rejected(),
            });
        }

        report.accepted = cities.len();
        info!(
            "[CityCatalog] Loaded {} cities ({} invalid, {} out of bounds, {} duplicates)",
            report.accepted,
            report.rejected_invalid,
            report.rejected_out_of_bounds,
            report.duplicates
        );

        let entries: Vec<CityEntry> = cities
            .iter()
            .enumerate()
            .map(|(i, c)| CityEntry::new([c.longitude, c.latitude], i))
            .collect();

        Ok(Self {
            cities,
            by_name,
            index: RTree::bulk_load(entries),
            report,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Exact, case-sensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<&City> {
        self.by_name.get(name).map(|&i| &self.cities[i])
    }

    /// All cities in insertion order.
    pub fn all(&self) -> &[City] {
        &self.cities
    }

    pub fn get(&self, position: usize) -> Option<&City> {
        self.cities.get(position)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Counts from the load that produced this catalog.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Unique identity of this load; a reload always gets a new generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Insertion positions of cities inside `rect` (inclusive), ascending.
    pub(crate) fn positions_within(&self, rect: &Rectangle) -> Vec<usize> {
        if [rect.south, rect.west, rect.north, rect.east]
            .iter()
            .any(|v| v.is_nan())
        {
            return Vec::new();
        }

        let bounds: geo::Rect<f64> = (*rect).into();
        let envelope = AABB::from_corners(
            [bounds.min().x, bounds.min().y],
            [bounds.max().x, bounds.max().y],
        );
        let mut positions: Vec<usize> = self
            .index
            .locate_in_envelope(&envelope)
            .filter(|entry| rect.contains(&GeoPoint::new(entry.geom()[1], entry.geom()[0])))
            .map(|entry| entry.data)
            .collect();
        positions.sort_unstable();
        positions
    }
}
