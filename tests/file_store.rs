use chrono::{NaiveDate, Utc};
use zigzag_map::config::ConfigPaths;
use zigzag_map::io::{FileStore, KeyValueStore, RangePersistence};
use zigzag_map::model::Interval;
use zigzag_map::{MapController, Settings};

#[test]
fn range_is_restored_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConfigPaths::in_dir(dir.path());
    let reference = NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    {
        let mut controller = MapController::new(Settings::default(), FileStore::open(&paths.state), reference);
        controller.set_explicit(3, 12);
    }

    let store = FileStore::open(&paths.state);
    assert_eq!(store.get("timelineUserMoved").as_deref(), Some("true"));
    assert_eq!(store.get("timelineProcessedInitial").as_deref(), Some("true"));

    let controller = MapController::new(Settings::default(), store, reference);
    assert_eq!(controller.range().interval(), Interval::new(3, 12));
}

#[test]
fn stale_range_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConfigPaths::in_dir(dir.path());
    let settings = Settings::default();

    let mut persistence = RangePersistence::new(FileStore::open(&paths.state), settings.freshness());
    let six_minutes_ago = Utc::now().timestamp_millis() - 6 * 60 * 1000;
    persistence.save(Interval::new(3, 12), six_minutes_ago).unwrap();
    persistence.set_user_moved(true).unwrap();
    assert!(persistence.load().is_none());

    let reference = NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let controller = MapController::new(settings, FileStore::open(&paths.state), reference);
    assert_eq!(controller.range().interval(), Interval::new(0, 31));
    assert!(!controller.range().user_adjusted());
}

#[test]
fn settings_round_trip_through_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConfigPaths::in_dir(&dir.path().join("cfg"));
    let settings = Settings {
        edge_zone_px: 12.0,
        ..Settings::default()
    };
    settings.save(&paths.settings).unwrap();
    assert_eq!(Settings::load(&paths.settings), settings);
}
