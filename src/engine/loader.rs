//! Catalog loading: cache lookup, async fetch and network fallback.
//!
//! Loading is the only asynchronous boundary of the engine. A load or reload
//! requested while another one is still running is ignored and reported as
//! [`LoadOutcome::AlreadyInProgress`]; the caller keeps its current catalog.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cache::{CatalogCache, CACHE_KEY};
use crate::catalog::{CityCatalog, RawCity, StateBounds};
use crate::data;
use crate::error::{CatalogError, Result};

/// External provider of raw city records.
pub trait CatalogSource: Send + Sync {
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<RawCity>>> + Send;
}

/// A source that always returns the same records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawCity>,
}

impl StaticSource {
    pub fn new(records: Vec<RawCity>) -> Self {
        Self { records }
    }
}

impl CatalogSource for StaticSource {
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<RawCity>>> + Send {
        let records = self.records.clone();
        async move { Ok(records) }
    }
}

/// Loader behavior switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Read the cache before fetching and write it after a successful fetch.
    /// Default: true
    pub use_cache: bool,
    /// Serve the fallback dataset when the source fails.
    /// Default: true
    pub fallback_on_error: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            fallback_on_error: true,
        }
    }
}

/// Where a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Cache,
    Source,
    Fallback,
}

/// Result of a load request.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        catalog: CityCatalog,
        origin: CatalogOrigin,
    },
    /// Another load was running; nothing was done.
    AlreadyInProgress,
}

impl LoadOutcome {
    pub fn into_catalog(self) -> Option<CityCatalog> {
        match self {
            Self::Loaded { catalog, .. } => Some(catalog),
            Self::AlreadyInProgress => None,
        }
    }

    pub fn origin(&self) -> Option<CatalogOrigin> {
        match self {
            Self::Loaded { origin, .. } => Some(*origin),
            Self::AlreadyInProgress => None,
        }
    }
}

/// Clears the in-flight flag when a load finishes, even on early return.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builds catalogs from a [`CatalogSource`], an optional cache and a
/// fallback dataset.
pub struct CatalogLoader<S> {
    source: S,
    cache: Option<Box<dyn CatalogCache>>,
    bounds: StateBounds,
    config: LoaderConfig,
    fallback: Vec<RawCity>,
    in_flight: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl<S: CatalogSource> CatalogLoader<S> {
    /// A loader with no cache and the built-in fallback cities.
    pub fn new(source: S, bounds: StateBounds) -> Self {
        Self {
            source,
            cache: None,
            bounds,
            config: LoaderConfig::default(),
            fallback: data::fallback_cities(),
            in_flight: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    pub fn with_cache(mut self, cache: impl CatalogCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the dataset served when the source fails.
    pub fn with_fallback(mut self, records: Vec<RawCity>) -> Self {
        self.fallback = records;
        self
    }

    /// Whether a load is currently running.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Message of the last failed fetch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    /// Load from the cache if possible, otherwise from the source.
    pub async fn load(&self) -> Result<LoadOutcome> {
        self.run(self.config.use_cache).await
    }

    /// Load from the source, bypassing any cached entry.
    pub async fn reload(&self) -> Result<LoadOutcome> {
        self.run(false).await
    }

    /// Remove the cached catalog.
    pub fn clear_cache(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.clear(CACHE_KEY),
            None => Ok(()),
        }
    }

    async fn run(&self, read_cache: bool) -> Result<LoadOutcome> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("[CatalogLoader] Load already in progress, ignoring request");
            return Ok(LoadOutcome::AlreadyInProgress);
        };

        if read_cache {
            if let Some(catalog) = self.cached_catalog() {
                return Ok(LoadOutcome::Loaded {
                    catalog,
                    origin: CatalogOrigin::Cache,
                });
            }
        }

        // Only an unreachable source falls back; validation errors are
        // fatal for this attempt.
        let records = match self.source.fetch_cities().await {
            Ok(records) => records,
            Err(err) if err.is_network() => return self.fall_back(err),
            Err(err) => {
                warn!("[CatalogLoader] Source returned invalid data: {}", err);
                self.set_last_error(Some(err.to_string()));
                return Err(err);
            }
        };

        let catalog = CityCatalog::load(records, &self.bounds)?;
        self.set_last_error(None);
        self.store_in_cache(&catalog);

        Ok(LoadOutcome::Loaded {
            catalog,
            origin: CatalogOrigin::Source,
        })
    }

    fn cached_catalog(&self) -> Option<CityCatalog> {
        let cache = self.cache.as_ref()?;
        let records = match cache.get(CACHE_KEY) {
            Ok(Some(records)) => records,
            Ok(None) => return None,
            Err(e) => {
                warn!("[CatalogLoader] Cache read failed: {}", e);
                return None;
            }
        };

        match CityCatalog::load(records, &self.bounds) {
            Ok(catalog) => {
                info!("[CatalogLoader] Using cached catalog ({} cities)", catalog.len());
                Some(catalog)
            }
            Err(e) => {
                warn!("[CatalogLoader] Discarding unusable cache entry: {}", e);
                None
            }
        }
    }

    fn store_in_cache(&self, catalog: &CityCatalog) {
        if !self.config.use_cache {
            return;
        }
        if let Some(cache) = &self.cache {
            let records: Vec<RawCity> = catalog.all().iter().map(RawCity::from).collect();
            if let Err(e) = cache.put(CACHE_KEY, &records) {
                warn!("[CatalogLoader] Cache write failed: {}", e);
            }
        }
    }

    fn fall_back(&self, err: CatalogError) -> Result<LoadOutcome> {
        warn!("[CatalogLoader] Fetch failed: {}", err);
        self.set_last_error(Some(err.to_string()));

        if !self.config.fallback_on_error {
            return Err(err);
        }

        let catalog = CityCatalog::load(self.fallback.clone(), &self.bounds)?;
        info!(
            "[CatalogLoader] Using fallback dataset with {} cities",
            catalog.len()
        );
        Ok(LoadOutcome::Loaded {
            catalog,
            origin: CatalogOrigin::Fallback,
        })
    }

    fn set_last_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = message;
        }
    }
}
