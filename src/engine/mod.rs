//! # Selection Engine
//!
//! The controller the presentation layer drives. It owns the current
//! catalog and the single active [`Selection`], and exposes the derived
//! proximity or region result.
//!
//! ## Architecture
//!
//! - `SelectionController` - selection state and event handling
//! - `ResultCache` - memoized query results keyed by input fingerprint
//! - `CatalogLoader` - async catalog loading with cache and fallback
//!
//! All selection-mutating calls take `&mut self`; a multi-threaded host must
//! serialize them (e.g. behind a `Mutex`).

pub mod loader;
pub mod result_cache;

pub use loader::{
    CatalogLoader, CatalogOrigin, CatalogSource, LoadOutcome, LoaderConfig, StaticSource,
};
pub use result_cache::{QueryKey, ResultCache};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{CityCatalog, StateBounds};
use crate::draw::DrawSession;
use crate::{data, proximity, City, GeoPoint, Rectangle, RegionalCenter};

/// Label given to rectangles produced by drawing.
pub const DEFAULT_REGION_LABEL: &str = "Área Selecionada";

/// Configuration for the selection controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Radius of the proximity query around a selected city.
    /// Default: 50.0 km
    pub radius_km: f64,
    /// Label attached to drawn regions.
    /// Default: "Área Selecionada"
    pub region_label: String,
    /// Bounding box of the containing state.
    /// Default: Minas Gerais
    pub state_bounds: StateBounds,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            radius_km: 50.0,
            region_label: DEFAULT_REGION_LABEL.to_string(),
            state_bounds: StateBounds::default(),
        }
    }
}

/// The one thing currently selected on the map.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind")]
pub enum Selection {
    #[default]
    None,
    CityFocus {
        city: City,
    },
    RegionFocus {
        rectangle: Rectangle,
        label: String,
    },
    Drawing {
        session: DrawSession,
    },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn city(&self) -> Option<&City> {
        match self {
            Self::CityFocus { city } => Some(city),
            _ => None,
        }
    }

    pub fn rectangle(&self) -> Option<&Rectangle> {
        match self {
            Self::RegionFocus { rectangle, .. } => Some(rectangle),
            _ => None,
        }
    }

    pub fn draw_session(&self) -> Option<&DrawSession> {
        match self {
            Self::Drawing { session } => Some(session),
            _ => None,
        }
    }
}

/// Orchestrates proximity, region and draw interactions over one catalog.
pub struct SelectionController {
    catalog: CityCatalog,
    regionals: Vec<RegionalCenter>,
    config: SelectionConfig,
    selection: Selection,
    results: ResultCache,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(CityCatalog::empty(), SelectionConfig::default())
    }
}

impl SelectionController {
    /// Create a controller over `catalog` with the built-in regional centers.
    pub fn new(catalog: CityCatalog, config: SelectionConfig) -> Self {
        Self {
            catalog,
            regionals: data::regional_centers(),
            config,
            selection: Selection::None,
            results: ResultCache::new(),
        }
    }

    pub fn with_regionals(mut self, regionals: Vec<RegionalCenter>) -> Self {
        self.regionals = regionals;
        self
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn regionals(&self) -> &[RegionalCenter] {
        &self.regionals
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.selection, Selection::Drawing { .. })
    }

    /// Live rectangle between the draw anchor and the cursor.
    pub fn preview_rectangle(&self) -> Option<Rectangle> {
        self.selection.draw_session().and_then(DrawSession::preview)
    }

    /// Cities near the focused city, empty unless a city is focused.
    pub fn proximity_results(&self) -> Vec<&City> {
        match self.selection {
            Selection::CityFocus { .. } => self.cached_cities(),
            _ => Vec::new(),
        }
    }

    /// Cities inside the focused region, empty unless a region is focused.
    pub fn region_results(&self) -> Vec<&City> {
        match self.selection {
            Selection::RegionFocus { .. } => self.cached_cities(),
            _ => Vec::new(),
        }
    }

    /// The list the side panel shows for the current selection.
    pub fn results(&self) -> Vec<&City> {
        match self.selection {
            Selection::CityFocus { .. } | Selection::RegionFocus { .. } => self.cached_cities(),
            _ => Vec::new(),
        }
    }

    /// Heading for the result list.
    pub fn panel_title(&self) -> &'static str {
        match self.selection {
            Selection::RegionFocus { .. } => "Cidades na Área",
            _ => "Cidades Próximas",
        }
    }

    /// Memoization statistics: (hits, misses).
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.results.hits(), self.results.misses())
    }

    /// Current results as a JSON array.
    pub fn results_json(&self) -> String {
        serde_json::to_string(&self.results()).unwrap_or_else(|e| {
            warn!("Failed to serialize results: {}", e);
            "[]".to_string()
        })
    }

    /// Current selection as JSON.
    pub fn selection_json(&self) -> String {
        serde_json::to_string(&self.selection).unwrap_or_else(|e| {
            warn!("Failed to serialize selection: {}", e);
            "{\"kind\":\"None\"}".to_string()
        })
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Focus a city and compute its neighbors within the configured radius.
    ///
    /// Cancels any draw in progress.
    pub fn select_city(&mut self, city: City) {
        debug!("[SelectionController] City selected: {}", city.name);
        self.selection = Selection::CityFocus { city };
        self.refresh_results();
    }

    /// Focus a catalog city by name. Returns false if the name is unknown.
    pub fn select_city_by_name(&mut self, name: &str) -> bool {
        match self.catalog.find_by_name(name) {
            Some(city) => {
                let city = city.clone();
                self.select_city(city);
                true
            }
            None => false,
        }
    }

    /// Focus a regional center's base city.
    ///
    /// When the base city is not in the catalog, a transient city at the
    /// regional's coordinates (population 0) is focused instead.
    pub fn select_regional(&mut self, regional: &RegionalCenter) {
        let city = match self.catalog.find_by_name(&regional.base_city_name) {
            Some(city) => city.clone(),
            None => {
                info!(
                    "[SelectionController] Base city '{}' not in catalog, using coordinates of {}",
                    regional.base_city_name, regional.name
                );
                City::transient(regional.name.clone(), regional.coordinates)
            }
        };
        self.select_city(city);
    }

    /// Focus a regional center by name. Returns false if the name is unknown.
    pub fn select_regional_by_name(&mut self, name: &str) -> bool {
        match self.regionals.iter().find(|r| r.name == name).cloned() {
            Some(regional) => {
                self.select_regional(&regional);
                true
            }
            None => false,
        }
    }

    /// Start drawing a rectangle, clearing any city or region focus.
    pub fn begin_draw(&mut self) {
        debug!("[SelectionController] Draw started");
        self.selection = Selection::Drawing {
            session: DrawSession::armed(),
        };
        self.results.invalidate();
    }

    /// Forward a map click to the draw session.
    ///
    /// On the second click the rectangle becomes the region focus and is
    /// returned. Without an active draw this is a no-op.
    pub fn map_clicked(&mut self, point: GeoPoint) -> Option<Rectangle> {
        let Selection::Drawing { session } = &mut self.selection else {
            return None;
        };

        let rectangle = session.click(point)?;
        self.selection = Selection::RegionFocus {
            rectangle,
            label: self.config.region_label.clone(),
        };
        self.refresh_results();
        Some(rectangle)
    }

    /// Forward pointer movement to the draw session for the preview.
    pub fn map_moved(&mut self, point: GeoPoint) {
        if let Selection::Drawing { session } = &mut self.selection {
            session.move_cursor(point);
        }
    }

    /// Drop any selection and cancel any draw in progress.
    pub fn clear(&mut self) {
        debug!("[SelectionController] Selection cleared");
        self.selection = Selection::None;
        self.results.invalidate();
    }

    /// Swap in a freshly loaded catalog and recompute the current result.
    pub fn replace_catalog(&mut self, catalog: CityCatalog) {
        info!(
            "[SelectionController] Catalog replaced ({} -> {} cities)",
            self.catalog.len(),
            catalog.len()
        );
        self.catalog = catalog;
        self.refresh_results();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn refresh_results(&mut self) {
        let catalog = &self.catalog;
        match &self.selection {
            Selection::CityFocus { city } => {
                let focus = city.position();
                let radius_km = self.config.radius_km;
                let key = QueryKey::proximity(
                    catalog.generation(),
                    &focus,
                    radius_km,
                    Some(&city.name),
                );
                self.results.get_or_compute(key, || {
                    proximity::near_positions(catalog, &focus, radius_km, Some(&city.name))
                });
            }
            Selection::RegionFocus { rectangle, .. } => {
                let key = QueryKey::region(catalog.generation(), rectangle);
                self.results
                    .get_or_compute(key, || catalog.positions_within(rectangle));
            }
            Selection::None | Selection::Drawing { .. } => self.results.invalidate(),
        }
    }

    fn cached_cities(&self) -> Vec<&City> {
        self.results
            .positions()
            .iter()
            .filter_map(|&i| self.catalog.get(i))
            .collect()
    }
}
