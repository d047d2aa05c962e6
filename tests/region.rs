//! Tests for region module

mod common;

use cityscope::region::within_scan;
use cityscope::{within, CityCatalog, GeoPoint, RawCity, Rectangle, StateBounds};
use common::{grid_catalog, names, sample_catalog};

#[test]
fn test_belo_horizonte_region() {
    let catalog = sample_catalog();
    let rect = Rectangle {
        south: -20.0,
        west: -44.5,
        north: -19.0,
        east: -43.5,
    };
    assert_eq!(names(&within(&catalog, &rect)), vec!["Belo Horizonte", "Betim"]);
}

#[test]
fn test_boundary_inclusion() {
    let records = vec![
        RawCity::new("On South Edge", -20.0, -44.0, 0),
        RawCity::new("On East Edge", -19.5, -43.5, 0),
        RawCity::new("On Corner", -19.0, -44.5, 0),
        RawCity::new("One Degree South", -21.0, -44.0, 0),
    ];
    let catalog = CityCatalog::load(records, &StateBounds::default()).unwrap();
    let rect = Rectangle {
        south: -20.0,
        west: -44.5,
        north: -19.0,
        east: -43.5,
    };

    let inside = within(&catalog, &rect);
    assert_eq!(names(&inside), vec!["On South Edge", "On East Edge", "On Corner"]);
}

#[test]
fn test_zero_area_rectangle() {
    let records = vec![
        RawCity::new("Exact", -19.5, -44.0, 0),
        RawCity::new("Close", -19.5, -44.0001, 0),
    ];
    let catalog = CityCatalog::load(records, &StateBounds::default()).unwrap();
    let p = GeoPoint::new(-19.5, -44.0);
    let rect = Rectangle::from_corners(p, p);

    assert_eq!(names(&within(&catalog, &rect)), vec!["Exact"]);
}

#[test]
fn test_index_matches_linear_scan() {
    let catalog = grid_catalog();
    let rects = [
        Rectangle::from_corners(GeoPoint::new(-21.0, -45.0), GeoPoint::new(-19.0, -43.0)),
        Rectangle::from_corners(GeoPoint::new(-20.1, -44.9), GeoPoint::new(-20.6, -44.2)),
        Rectangle::from_corners(GeoPoint::new(-22.0, -46.0), GeoPoint::new(-22.0, -46.0)),
        Rectangle::from_corners(GeoPoint::new(-30.0, -60.0), GeoPoint::new(-10.0, -30.0)),
        Rectangle::from_corners(GeoPoint::new(-10.0, -30.0), GeoPoint::new(-9.0, -29.0)),
    ];
    for rect in &rects {
        assert_eq!(within(&catalog, rect), within_scan(&catalog, rect), "{rect:?}");
    }
}

#[test]
fn test_whole_state_returns_catalog_order() {
    let catalog = grid_catalog();
    let everything = within(&catalog, &StateBounds::default().as_rectangle());
    let all: Vec<&cityscope::City> = catalog.all().iter().collect();
    assert_eq!(everything, all);
}

#[test]
fn test_nan_rectangle_matches_nothing() {
    let catalog = sample_catalog();
    let rect = Rectangle {
        south: f64::NAN,
        west: -44.5,
        north: -19.0,
        east: -43.5,
    };
    assert!(within(&catalog, &rect).is_empty());
    assert!(within_scan(&catalog, &rect).is_empty());
}

#[test]
fn test_inverted_rectangle_matches_nothing() {
    let catalog = grid_catalog();
    let inverted = Rectangle {
        south: -19.0,
        west: -43.0,
        north: -21.0,
        east: -45.0,
    };
    assert!(within(&catalog, &inverted).is_empty());
    assert!(within_scan(&catalog, &inverted).is_empty());
}
