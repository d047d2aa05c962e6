//! Tests for lib.rs core types

mod common;

use cityscope::{data, City, CityCatalog, GeoPoint, Rectangle, StateBounds};

#[test]
fn test_geo_point_validation() {
    assert!(GeoPoint::new(-19.9167, -43.9345).is_valid());
    assert!(!GeoPoint::new(91.0, 0.0).is_valid());
    assert!(!GeoPoint::new(0.0, 181.0).is_valid());
    assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
}

#[test]
fn test_rectangle_from_corners() {
    let rect = Rectangle::from_corners(GeoPoint::new(-19.0, -43.5), GeoPoint::new(-20.0, -44.5));
    assert_eq!(
        rect,
        Rectangle {
            south: -20.0,
            west: -44.5,
            north: -19.0,
            east: -43.5
        }
    );
    assert!(!rect.is_degenerate());

    let center = rect.center();
    assert_eq!(center, GeoPoint::new(-19.5, -44.0));

    let (sw, ne) = rect.corners();
    assert_eq!(sw, GeoPoint::new(-20.0, -44.5));
    assert_eq!(ne, GeoPoint::new(-19.0, -43.5));
}

#[test]
fn test_rectangle_zero_width_is_degenerate() {
    // A vertical line: the corners differ but the area is zero.
    let line = Rectangle::from_corners(GeoPoint::new(-19.0, -44.0), GeoPoint::new(-20.0, -44.0));
    assert!(line.is_degenerate());
    assert!(line.contains(&GeoPoint::new(-19.5, -44.0)));

    let flat = Rectangle::from_corners(GeoPoint::new(-19.0, -44.5), GeoPoint::new(-19.0, -43.5));
    assert!(flat.is_degenerate());
}

#[test]
fn test_rectangle_geo_conversion() {
    let rect = Rectangle::from_corners(GeoPoint::new(-19.0, -43.5), GeoPoint::new(-20.0, -44.5));
    let geo_rect: geo::Rect<f64> = rect.into();
    assert_eq!(geo_rect.min().x, -44.5);
    assert_eq!(geo_rect.min().y, -20.0);
    assert_eq!(Rectangle::from(geo_rect), rect);
}

#[test]
fn test_city_population_label() {
    let known = City::new("Betim", -19.9678, -44.1983, 444_784);
    assert_eq!(known.population_label(), Some(444_784));

    let unknown = City::new("Somewhere", -19.0, -44.0, 0);
    assert_eq!(unknown.population_label(), None);
}

#[test]
fn test_transient_city() {
    let city = City::transient("Poços de Caldas", GeoPoint::new(-21.7857, -46.5646));
    assert_eq!(city.population, 0);
    assert_eq!(city.position(), GeoPoint::new(-21.7857, -46.5646));
    assert!(city.microregion.is_none());
}

#[test]
fn test_regional_centers() {
    let regionals = data::regional_centers();
    assert_eq!(regionals.len(), 7);
    let bounds = StateBounds::default();
    for regional in &regionals {
        assert_eq!(regional.radius_km, 70.0);
        assert!(bounds.contains(&regional.coordinates), "{}", regional.name);
        assert_eq!(regional.name, regional.base_city_name);
    }
}

#[test]
fn test_regional_covered_cities() {
    let catalog = CityCatalog::load(data::fallback_cities(), &StateBounds::default()).unwrap();
    let regionals = data::regional_centers();
    let juiz_de_fora = regionals.iter().find(|r| r.name == "Juiz de Fora").unwrap();

    // The base city sits at the regional's own coordinates.
    let covered = juiz_de_fora.covered_cities(&catalog);
    assert_eq!(common::names(&covered), vec!["Juiz de Fora"]);
}

#[test]
fn test_fallback_cities_are_valid() {
    let catalog = CityCatalog::load(data::fallback_cities(), &StateBounds::default()).unwrap();
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.report().rejected(), 0);
    assert_eq!(catalog.all()[0].name, "Belo Horizonte");
}
