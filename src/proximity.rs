//! Proximity query: cities within a radius of a focus point.
//!
//! Results keep catalog insertion order; they are not sorted by distance.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::catalog::CityCatalog;
use crate::geo_utils::haversine_distance;
use crate::{City, GeoPoint};

/// Every city within `radius_km` of `focus`, except the one named `exclude_name`.
///
/// A city at exactly `radius_km` is included. Radius 0 matches only cities
/// at the exact focus coordinates; a negative or NaN radius matches nothing.
///
/// # Example
/// ```
/// use cityscope::{near, CityCatalog, GeoPoint, RawCity, StateBounds};
///
/// let catalog = CityCatalog::load(
///     vec![
///         RawCity::new("Belo Horizonte", -19.9167, -43.9345, 2521564),
///         RawCity::new("Betim", -19.9678, -44.1983, 444784),
///     ],
///     &StateBounds::default(),
/// )
/// .unwrap();
///
/// let focus = GeoPoint::new(-19.9167, -43.9345);
/// let nearby = near(&catalog, &focus, 50.0, Some("Belo Horizonte"));
/// assert_eq!(nearby.len(), 1);
/// assert_eq!(nearby[0].name, "Betim");
/// ```
pub fn near<'a>(
    catalog: &'a CityCatalog,
    focus: &GeoPoint,
    radius_km: f64,
    exclude_name: Option<&str>,
) -> Vec<&'a City> {
    near_positions(catalog, focus, radius_km, exclude_name)
        .into_iter()
        .filter_map(|i| catalog.get(i))
        .collect()
}

fn is_near(city: &City, focus: &GeoPoint, radius_m: f64, exclude_name: Option<&str>) -> bool {
    if exclude_name == Some(city.name.as_str()) {
        return false;
    }
    haversine_distance(focus, &city.position()) <= radius_m
}

/// Insertion positions of the cities matched by [`near`], ascending.
#[cfg(not(feature = "parallel"))]
pub(crate) fn near_positions(
    catalog: &CityCatalog,
    focus: &GeoPoint,
    radius_km: f64,
    exclude_name: Option<&str>,
) -> Vec<usize> {
    let radius_m = radius_km * 1000.0;
    catalog
        .all()
        .iter()
        .enumerate()
        .filter(|(_, city)| is_near(city, focus, radius_m, exclude_name))
        .map(|(i, _)| i)
        .collect()
}

/// Insertion positions of the cities matched by [`near`], ascending.
///
/// Collecting a rayon iterator into a `Vec` keeps catalog order.
#[cfg(feature = "parallel")]
pub(crate) fn near_positions(
    catalog: &CityCatalog,
    focus: &GeoPoint,
    radius_km: f64,
    exclude_name: Option<&str>,
) -> Vec<usize> {
    let radius_m = radius_km * 1000.0;
    catalog
        .all()
        .par_iter()
        .enumerate()
        .filter(|(_, city)| is_near(city, focus, radius_m, exclude_name))
        .map(|(i, _)| i)
        .collect()
}

/// Every city within `radius_km` of `focus`, paired with its distance in
/// meters, in catalog order.
pub fn near_with_distance<'a>(
    catalog: &'a CityCatalog,
    focus: &GeoPoint,
    radius_km: f64,
    exclude_name: Option<&str>,
) -> Vec<(&'a City, f64)> {
    near(catalog, focus, radius_km, exclude_name)
        .into_iter()
        .map(|city| (city, haversine_distance(focus, &city.position())))
        .collect()
}
