//! Unified error types for catalog loading.
//!
//! Geometry, queries and the draw session never fail; only loading a
//! catalog (and its cache/network collaborators) produces errors.

use thiserror::Error;

/// Errors raised while building or fetching a city catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The load received no records at all.
    #[error("catalog input is empty")]
    EmptyInput,

    /// Every record was rejected during validation.
    #[error("no valid city records: {rejected} of {total} rejected")]
    NoValidRecords { total: usize, rejected: usize },

    /// The input could not be decoded into raw city records.
    #[error("malformed catalog input: {0}")]
    Malformed(String),

    /// The catalog data source failed.
    #[error("failed to fetch cities: {0}")]
    Network(String),

    /// The cache backend failed.
    #[error("catalog cache error: {0}")]
    Cache(String),

    /// A city lookup by name found nothing.
    #[error("city not found: {0}")]
    CityNotFound(String),
}

impl CatalogError {
    /// Structurally invalid or empty input (fatal for that load attempt).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::NoValidRecords { .. } | Self::Malformed(_)
        )
    }

    /// The data source could not be reached.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Convert lookups that returned nothing into [`CatalogError::CityNotFound`].
pub trait OptionExt<T> {
    fn ok_or_missing(self, name: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing(self, name: &str) -> Result<T> {
        self.ok_or_else(|| CatalogError::CityNotFound(name.to_string()))
    }
}
