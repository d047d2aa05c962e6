//! Catalog source backed by the IBGE localities API and Nominatim.
//!
//! The municipality list comes from IBGE; coordinates come from geocoding
//! each municipality one by one, with a pause between calls. Municipalities
//! that cannot be geocoded are skipped, so the result may be an incomplete
//! subset of the state's cities.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::catalog::{RawCity, RawId, RawValue};
use crate::engine::CatalogSource;
use crate::error::{CatalogError, Result};

/// IBGE code of Minas Gerais.
pub const DEFAULT_STATE_CODE: u32 = 31;

const IBGE_BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades/estados";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("cityscope/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct Municipality {
    id: u64,
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "microrregiao", default)]
    microregion: Option<Microregion>,
}

#[derive(Debug, Deserialize)]
struct Microregion {
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "mesorregiao", default)]
    mesoregion: Option<Mesoregion>,
}

#[derive(Debug, Deserialize)]
struct Mesoregion {
    #[serde(rename = "nome")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// IBGE + Nominatim implementation of [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct IbgeSource {
    client: reqwest::Client,
    state_code: u32,
    state_name: String,
    geocode_delay: Duration,
}

impl IbgeSource {
    /// Source for Minas Gerais with a 100 ms pause between geocoding calls.
    pub fn new() -> Result<Self> {
        Self::for_state(DEFAULT_STATE_CODE, "Minas Gerais")
    }

    pub fn for_state(state_code: u32, state_name: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            state_code,
            state_name: state_name.into(),
            geocode_delay: Duration::from_millis(100),
        })
    }

    pub fn with_geocode_delay(mut self, delay: Duration) -> Self {
        self.geocode_delay = delay;
        self
    }

    async fn fetch_municipalities(&self) -> Result<Vec<Municipality>> {
        let url = format!("{}/{}/municipios", IBGE_BASE_URL, self.state_code);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Network(format!(
                "IBGE returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))
    }

    async fn geocode(&self, name: &str) -> Option<GeocodeHit> {
        let query = format!("{}, {}, Brasil", name, self.state_name);
        let response = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!("[IbgeSource] Geocoding {} returned {}", name, response.status());
            return None;
        }

        let hits: Vec<GeocodeHit> = response.json().await.ok()?;
        hits.into_iter().next()
    }

    async fn fetch_all(&self) -> Result<Vec<RawCity>> {
        let municipalities = self.fetch_municipalities().await?;
        info!(
            "[IbgeSource] {} municipalities listed, geocoding",
            municipalities.len()
        );

        let total = municipalities.len();
        let mut records = Vec::with_capacity(total);

        for (i, municipality) in municipalities.into_iter().enumerate() {
            match self.geocode(&municipality.name).await {
                Some(hit) => {
                    debug!(
                        "[IbgeSource] ({}/{}) {}: {}, {}",
                        i + 1,
                        total,
                        municipality.name,
                        hit.lat,
                        hit.lon
                    );
                    records.push(to_raw(municipality, hit));
                }
                None => warn!("[IbgeSource] Could not geocode {}", municipality.name),
            }

            tokio::time::sleep(self.geocode_delay).await;
        }

        info!("[IbgeSource] Geocoded {} of {} municipalities", records.len(), total);
        Ok(records)
    }
}

/// Combine an IBGE municipality with its geocoded position.
///
/// Coordinates stay textual; the catalog parses and bounds-checks them.
fn to_raw(municipality: Municipality, hit: GeocodeHit) -> RawCity {
    let (microregion, mesoregion) = match municipality.microregion {
        Some(micro) => (Some(micro.name), micro.mesoregion.map(|m| m.name)),
        None => (None, None),
    };
    RawCity {
        name: municipality.name,
        latitude: Some(RawValue::Text(hit.lat)),
        longitude: Some(RawValue::Text(hit.lon)),
        population: None,
        microregion,
        mesoregion,
        source_id: Some(RawId::Numeric(municipality.id)),
    }
}

impl CatalogSource for IbgeSource {
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<RawCity>>> + Send {
        self.fetch_all()
    }
}
