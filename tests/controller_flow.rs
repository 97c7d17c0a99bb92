use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use zigzag_map::geo::{Layer, MarkerKey, MarkerLayers};
use zigzag_map::io::MemoryStore;
use zigzag_map::model::{Category, Interval, Point, PointerEvent, SliderGeometry};
use zigzag_map::{MapController, Settings};

fn wednesday() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn at(day: u32, hour: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2025, 1, day).and_then(|d| d.and_hms_opt(hour, 0, 0))
}

fn paris() -> Vec<Point> {
    vec![
        Point::project("concert", 48.8566, 2.3522).with_dates(at(15, 20), at(15, 23)),
        Point::project("market", 48.8566, 2.3523).with_dates(at(17, 18), at(19, 23)),
        Point::project("expo", 48.8606, 2.3376).with_dates(at(28, 10), at(30, 18)),
        Point::location("home", 48.8570, 2.3530),
        Point::location("office", 48.8738, 2.2950),
    ]
}

fn key(category: Category, id: &str) -> MarkerKey {
    MarkerKey {
        category,
        id: id.to_string(),
    }
}

#[test]
fn drag_narrows_the_map_and_survives_a_restart() {
    let mut controller = MapController::new(Settings::default(), MemoryStore::new(), wednesday());
    controller.set_points(paris());

    let mut layers = MarkerLayers::new();
    let diff = layers.reconcile(&controller.partition());
    assert_eq!(diff.added.len(), 5);
    assert_eq!(
        layers.get(&key(Category::Project, "concert")).unwrap().layer,
        Layer::CloseCluster(Category::Project)
    );
    // Home sits on the concert spot and is nudged north-east.
    assert!((layers.get(&key(Category::Location, "home")).unwrap().coord.lat - 48.862).abs() < 1e-9);

    // 31 days on 310 px: pull the right edge from day 31 back to day 10.
    let slider = SliderGeometry::new(50.0, 310.0);
    let t0 = Instant::now();
    controller.pointer(PointerEvent::Down { x: 358.0 }, &slider, t0);
    controller.pointer(PointerEvent::Move { x: 300.0 }, &slider, t0);
    controller.pointer(PointerEvent::Move { x: 150.0 }, &slider, t0 + Duration::from_millis(16));
    assert!(controller.pointer(PointerEvent::Up, &slider, t0 + Duration::from_millis(32)));
    assert_eq!(controller.range().interval(), Interval::new(0, 10));

    let diff = layers.reconcile(&controller.partition());
    assert_eq!(diff.removed, vec![key(Category::Project, "expo")]);
    assert!(diff.added.is_empty());

    // A reload within the freshness window restores the range and the flag.
    let store = controller.persistence().store().clone();
    let restored = MapController::new(Settings::default(), store, wednesday());
    assert_eq!(restored.range().interval(), Interval::new(0, 10));
    assert!(restored.range().user_adjusted());
}

#[test]
fn single_category_clustering() {
    let mut controller = MapController::new(Settings::default(), MemoryStore::new(), wednesday());
    controller.set_points(paris());

    assert!(!controller.set_cluster_toggle(true));
    controller.set_shown(Category::Location, false);
    assert!(controller.set_cluster_toggle(true));

    let partition = controller.partition();
    assert!(partition.cluster_normal);
    assert_eq!(partition.count_in(Category::Location), 0);
    assert!(partition
        .placements()
        .iter()
        .all(|p| p.layer == Layer::MainCluster(Category::Project)));

    // Showing locations again switches clustering back off.
    controller.set_shown(Category::Location, true);
    assert!(!controller.filters().cluster_toggle());
    assert!(!controller.partition().cluster_normal);
}

#[test]
fn all_time_then_week_returns_to_one_month_range() {
    let mut controller = MapController::new(Settings::default(), MemoryStore::new(), wednesday());
    controller.set_all_time();
    assert_eq!(controller.range().max_range_days(), 3650);
    assert_eq!(controller.range().interval(), Interval::new(0, 3650));

    controller.set_this_week();
    assert_eq!(controller.range().max_range_days(), 31);
    assert_eq!(controller.range().interval(), Interval::new(0, 4));
    let window = controller.active_window();
    assert_eq!(window.end.date(), NaiveDate::from_ymd_opt(2025, 1, 19).unwrap());
}
