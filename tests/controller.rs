//! Tests for the selection controller

mod common;

use cityscope::{
    data, CityCatalog, GeoPoint, RawCity, Rectangle, Selection, SelectionConfig,
    SelectionController, StateBounds,
};
use common::{names, sample_catalog};

fn controller() -> SelectionController {
    SelectionController::new(sample_catalog(), SelectionConfig::default())
}

#[test]
fn test_select_city_scenario() {
    let mut ctl = controller();
    let bh = ctl.catalog().find_by_name("Belo Horizonte").unwrap().clone();
    ctl.select_city(bh.clone());

    assert_eq!(ctl.selection(), &Selection::CityFocus { city: bh });
    assert_eq!(names(&ctl.proximity_results()), vec!["Betim"]);
    assert_eq!(names(&ctl.results()), vec!["Betim"]);
    assert!(ctl.region_results().is_empty());
    assert_eq!(ctl.panel_title(), "Cidades Próximas");
}

#[test]
fn test_select_city_by_name() {
    let mut ctl = controller();
    assert!(ctl.select_city_by_name("Betim"));
    assert_eq!(names(&ctl.results()), vec!["Belo Horizonte"]);

    assert!(!ctl.select_city_by_name("Contagem"));
    // Unknown names leave the selection alone.
    assert_eq!(ctl.selection().city().unwrap().name, "Betim");
}

#[test]
fn test_configured_radius() {
    let config = SelectionConfig {
        radius_km: 10.0,
        ..SelectionConfig::default()
    };
    let mut ctl = SelectionController::new(sample_catalog(), config);
    ctl.select_city_by_name("Belo Horizonte");
    assert!(ctl.results().is_empty());
}

#[test]
fn test_draw_region_scenario() {
    let mut ctl = controller();
    ctl.begin_draw();
    assert!(ctl.is_drawing());

    assert_eq!(ctl.map_clicked(GeoPoint::new(-19.0, -43.5)), None);
    assert!(ctl.is_drawing());

    let rect = ctl.map_clicked(GeoPoint::new(-20.0, -44.5)).unwrap();
    assert_eq!(
        rect,
        Rectangle {
            south: -20.0,
            west: -44.5,
            north: -19.0,
            east: -43.5
        }
    );
    assert!(!ctl.is_drawing());
    assert_eq!(
        ctl.selection(),
        &Selection::RegionFocus {
            rectangle: rect,
            label: "Área Selecionada".to_string()
        }
    );
    assert_eq!(names(&ctl.region_results()), vec!["Belo Horizonte", "Betim"]);
    assert!(ctl.proximity_results().is_empty());
    assert_eq!(ctl.panel_title(), "Cidades na Área");
}

#[test]
fn test_begin_draw_clears_city_focus() {
    let mut ctl = controller();
    ctl.select_city_by_name("Belo Horizonte");
    ctl.begin_draw();

    assert!(ctl.selection().city().is_none());
    assert!(ctl.is_drawing());
    assert!(ctl.results().is_empty());
}

#[test]
fn test_begin_draw_clears_region_focus() {
    let mut ctl = controller();
    ctl.begin_draw();
    ctl.map_clicked(GeoPoint::new(-19.0, -43.5));
    ctl.map_clicked(GeoPoint::new(-20.0, -44.5));
    ctl.begin_draw();

    assert!(ctl.selection().rectangle().is_none());
    assert!(ctl.region_results().is_empty());
}

#[test]
fn test_select_city_cancels_draw() {
    let mut ctl = controller();
    ctl.begin_draw();
    ctl.map_clicked(GeoPoint::new(-19.0, -43.5));
    ctl.select_city_by_name("Betim");

    assert!(!ctl.is_drawing());
    assert_eq!(ctl.preview_rectangle(), None);

    // The pending anchor is gone; a click is now a no-op.
    assert_eq!(ctl.map_clicked(GeoPoint::new(-20.0, -44.5)), None);
    assert_eq!(ctl.selection().city().unwrap().name, "Betim");
}

#[test]
fn test_map_click_without_draw_is_noop() {
    let mut ctl = controller();
    assert_eq!(ctl.map_clicked(GeoPoint::new(-19.0, -43.5)), None);
    assert!(ctl.selection().is_none());

    ctl.select_city_by_name("Betim");
    assert_eq!(ctl.map_clicked(GeoPoint::new(-19.0, -43.5)), None);
    assert_eq!(ctl.selection().city().unwrap().name, "Betim");
}

#[test]
fn test_map_moved_updates_preview_only() {
    let mut ctl = controller();
    ctl.map_moved(GeoPoint::new(-19.0, -43.5));
    assert!(ctl.selection().is_none());

    ctl.begin_draw();
    ctl.map_moved(GeoPoint::new(-19.0, -43.5));
    assert_eq!(ctl.preview_rectangle(), None);

    ctl.map_clicked(GeoPoint::new(-19.0, -43.5));
    ctl.map_moved(GeoPoint::new(-20.0, -44.5));
    assert_eq!(
        ctl.preview_rectangle(),
        Some(Rectangle::from_corners(
            GeoPoint::new(-19.0, -43.5),
            GeoPoint::new(-20.0, -44.5)
        ))
    );
    assert!(ctl.is_drawing());
    assert!(ctl.results().is_empty());
}

#[test]
fn test_clear_resets_everything() {
    let mut ctl = controller();
    ctl.select_city_by_name("Belo Horizonte");
    ctl.clear();
    assert!(ctl.selection().is_none());
    assert!(ctl.results().is_empty());

    ctl.begin_draw();
    ctl.map_clicked(GeoPoint::new(-19.0, -43.5));
    ctl.clear();
    assert!(!ctl.is_drawing());
    assert_eq!(ctl.map_clicked(GeoPoint::new(-20.0, -44.5)), None);
}

#[test]
fn test_select_regional_with_base_city() {
    let catalog = CityCatalog::load(data::fallback_cities(), &StateBounds::default()).unwrap();
    let mut ctl = SelectionController::new(catalog, SelectionConfig::default());

    assert!(ctl.select_regional_by_name("Juiz de Fora"));
    let city = ctl.selection().city().unwrap();
    assert_eq!(city.name, "Juiz de Fora");
    assert_eq!(city.population, 573_285);
}

#[test]
fn test_select_regional_without_base_city() {
    let records = vec![
        RawCity::new("Poços de Caldas Vizinha", -21.8, -46.5, 10_000),
        RawCity::new("Belo Horizonte", -19.9167, -43.9345, 2_521_564),
    ];
    let catalog = CityCatalog::load(records, &StateBounds::default()).unwrap();
    let mut ctl = SelectionController::new(catalog, SelectionConfig::default());

    assert!(ctl.select_regional_by_name("Poços de Caldas"));
    let city = ctl.selection().city().unwrap();
    assert_eq!(city.name, "Poços de Caldas");
    assert_eq!(city.population, 0);
    assert_eq!(city.position(), GeoPoint::new(-21.7857, -46.5646));

    // The proximity query still runs around the regional's coordinates.
    assert_eq!(names(&ctl.results()), vec!["Poços de Caldas Vizinha"]);
}

#[test]
fn test_select_unknown_regional() {
    let mut ctl = controller();
    assert!(!ctl.select_regional_by_name("Atlantis"));
    assert!(ctl.selection().is_none());
}

#[test]
fn test_results_are_memoized() {
    let mut ctl = controller();
    ctl.select_city_by_name("Belo Horizonte");
    assert_eq!(ctl.cache_stats(), (0, 1));

    ctl.select_city_by_name("Belo Horizonte");
    assert_eq!(ctl.cache_stats(), (1, 1));

    ctl.select_city_by_name("Betim");
    assert_eq!(ctl.cache_stats(), (1, 2));
}

#[test]
fn test_replace_catalog_recomputes() {
    let mut ctl = controller();
    ctl.select_city_by_name("Belo Horizonte");
    assert_eq!(names(&ctl.results()), vec!["Betim"]);

    let records = vec![
        RawCity::new("Belo Horizonte", -19.9167, -43.9345, 2_521_564),
        RawCity::new("Nova Lima", -19.9858, -43.8467, 97_000),
        RawCity::new("Betim", -19.9678, -44.1983, 444_784),
    ];
    ctl.replace_catalog(CityCatalog::load(records, &StateBounds::default()).unwrap());

    assert_eq!(names(&ctl.results()), vec!["Nova Lima", "Betim"]);
    assert_eq!(ctl.cache_stats(), (0, 2));
}

#[test]
fn test_replace_catalog_with_empty() {
    let mut ctl = controller();
    ctl.select_city_by_name("Belo Horizonte");
    ctl.replace_catalog(CityCatalog::empty());

    // The focus survives, its result is empty.
    assert_eq!(ctl.selection().city().unwrap().name, "Belo Horizonte");
    assert!(ctl.results().is_empty());
}

#[test]
fn test_custom_region_label() {
    let config = SelectionConfig {
        region_label: "Selected Area".to_string(),
        ..SelectionConfig::default()
    };
    let mut ctl = SelectionController::new(sample_catalog(), config);
    ctl.begin_draw();
    ctl.map_clicked(GeoPoint::new(-19.0, -43.5));
    ctl.map_clicked(GeoPoint::new(-20.0, -44.5));

    match ctl.selection() {
        Selection::RegionFocus { label, .. } => assert_eq!(label, "Selected Area"),
        other => panic!("unexpected selection {other:?}"),
    }
}

#[test]
fn test_json_views() {
    let mut ctl = controller();
    assert!(ctl.selection_json().contains("\"kind\":\"None\""));
    assert_eq!(ctl.results_json(), "[]");

    ctl.select_city_by_name("Belo Horizonte");
    assert!(ctl.selection_json().contains("\"kind\":\"CityFocus\""));
    assert!(ctl.results_json().contains("Betim"));
}

#[test]
fn test_config_from_json() {
    let config: SelectionConfig = serde_json::from_str(r#"{"radius_km": 25.0}"#).unwrap();
    assert_eq!(config.radius_km, 25.0);
    assert_eq!(config.region_label, "Área Selecionada");
    assert_eq!(config.state_bounds, StateBounds::default());
}
