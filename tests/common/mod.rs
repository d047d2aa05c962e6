//! Shared fixtures for integration tests.

#![allow(dead_code)]

use cityscope::{CityCatalog, RawCity, StateBounds};

pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Belo Horizonte, Betim and Uberlândia.
pub fn sample_records() -> Vec<RawCity> {
    vec![
        RawCity::new("Belo Horizonte", -19.9167, -43.9345, 2_521_564),
        RawCity::new("Betim", -19.9678, -44.1983, 444_784),
        RawCity::new("Uberlândia", -18.9141, -48.2749, 699_097),
    ]
}

pub fn sample_catalog() -> CityCatalog {
    CityCatalog::load(sample_records(), &StateBounds::default()).unwrap()
}

/// A regular grid of cities every 0.25 degrees around Belo Horizonte.
pub fn grid_catalog() -> CityCatalog {
    let mut records = Vec::new();
    for i in 0..20 {
        for j in 0..20 {
            let lat = -22.0 + i as f64 * 0.25;
            let lng = -46.0 + j as f64 * 0.25;
            records.push(RawCity::new(format!("Grid {i}-{j}"), lat, lng, 0));
        }
    }
    CityCatalog::load(records, &StateBounds::default()).unwrap()
}

pub fn names(cities: &[&cityscope::City]) -> Vec<String> {
    cities.iter().map(|c| c.name.clone()).collect()
}
