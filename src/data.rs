//! Static reference data for Minas Gerais.

use crate::catalog::RawCity;
use crate::{GeoPoint, RegionalCenter};

/// Radius drawn around every health regional, in kilometers.
pub const REGIONAL_RADIUS_KM: f64 = 70.0;

// (name, base city, latitude, longitude)
const REGIONALS: [(&str, &str, f64, f64); 7] = [
    ("Juiz de Fora", "Juiz de Fora", -21.7605, -43.3434),
    ("Montes Claros", "Montes Claros", -16.7282, -43.8578),
    ("Poços de Caldas", "Poços de Caldas", -21.7857, -46.5646),
    ("Uberaba", "Uberaba", -19.7472, -47.9381),
    ("Uberlândia", "Uberlândia", -18.9141, -48.2749),
    ("Divinópolis", "Divinópolis", -20.1458, -44.8919),
    ("Governador Valadares", "Governador Valadares", -18.8545, -41.9555),
];

// (name, latitude, longitude, population)
const FALLBACK_CITIES: [(&str, f64, f64, u64); 5] = [
    ("Belo Horizonte", -19.9167, -43.9345, 2_521_564),
    ("Uberlândia", -18.9141, -48.2749, 699_097),
    ("Juiz de Fora", -21.7605, -43.3434, 573_285),
    ("Montes Claros", -16.7282, -43.8578, 413_487),
    ("Governador Valadares", -18.8545, -41.9555, 278_685),
];

/// The state's health regional centers.
pub fn regional_centers() -> Vec<RegionalCenter> {
    REGIONALS
        .iter()
        .map(|&(name, base, lat, lng)| RegionalCenter {
            name: name.to_string(),
            base_city_name: base.to_string(),
            coordinates: GeoPoint::new(lat, lng),
            radius_km: REGIONAL_RADIUS_KM,
        })
        .collect()
}

/// Major cities used when the catalog cannot be fetched.
pub fn fallback_cities() -> Vec<RawCity> {
    FALLBACK_CITIES
        .iter()
        .map(|&(name, lat, lng, population)| RawCity::new(name, lat, lng, population))
        .collect()
}
