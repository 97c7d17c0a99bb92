//! The single owner of map state: points, filters, the selected range, the
//! slider gesture and range persistence.

use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::config::Settings;
use crate::geo::{FilterState, MarkerPipeline, RenderPartition};
use crate::io::{KeyValueStore, RangePersistence};
use crate::model::{
    Category, DragMode, DragModeStateMachine, Point, PointerEvent, RangeIntervalModel, SliderGeometry, Throttle,
    TimeWindow,
};

/// Drives the marker pipeline from user input.
///
/// Interval changes coming from a drag reach the timeframe filter through a
/// [`Throttle`]; named presets, explicit dates and external hints apply at
/// once. Every interval change is written through [`RangePersistence`].
pub struct MapController<S: KeyValueStore> {
    settings: Settings,
    points: Vec<Point>,
    filters: FilterState,
    range: RangeIntervalModel,
    drag: DragModeStateMachine,
    throttle: Throttle,
    persistence: RangePersistence<S>,
    pipeline: MarkerPipeline,
    /// The window the filter currently uses; lags `range` while throttled.
    active_window: TimeWindow,
}

impl<S: KeyValueStore> MapController<S> {
    /// Start a session at `reference`, restoring a fresh persisted range when
    /// one exists.
    pub fn new(settings: Settings, store: S, reference: NaiveDateTime) -> Self {
        let mut persistence = RangePersistence::new(store, settings.freshness());
        let mut range = RangeIntervalModel::new(reference, &settings);
        match persistence.load() {
            Some(snapshot) => {
                log::info!(
                    "Restored range [{}, {}]",
                    snapshot.interval.start_offset_days,
                    snapshot.interval.end_offset_days
                );
                range.restore(snapshot.interval, persistence.user_moved());
            }
            None => {
                log::debug!("No restorable range, using the default");
                if let Err(e) = persistence.clear() {
                    log::warn!("Failed to discard stale range: {}", e);
                }
            }
        }
        if let Err(e) = persistence.set_processed_initial(true) {
            log::warn!("Failed to record initial range: {}", e);
        }

        let active_window = range.window();
        Self {
            drag: DragModeStateMachine::new(settings.edge_zone_px),
            throttle: Throttle::new(settings.throttle()),
            pipeline: MarkerPipeline::new(&settings),
            settings,
            points: Vec::new(),
            filters: FilterState::default(),
            range,
            persistence,
            active_window,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn range(&self) -> &RangeIntervalModel {
        &self.range
    }

    pub fn persistence(&self) -> &RangePersistence<S> {
        &self.persistence
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.mode()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn active_window(&self) -> &TimeWindow {
        &self.active_window
    }

    /// Current render partition for the sink.
    pub fn partition(&self) -> RenderPartition {
        self.pipeline
            .run(&self.points, Some(&self.active_window), &self.filters)
    }

    // ── Points and filters ──────────────────────────────────────

    pub fn set_points(&mut self, points: Vec<Point>) {
        log::info!("Loaded {} points", points.len());
        self.points = points;
    }

    pub fn set_shown(&mut self, category: Category, show: bool) {
        self.filters.set_shown(category, show);
    }

    /// Returns the resulting toggle value.
    pub fn set_cluster_toggle(&mut self, on: bool) -> bool {
        self.filters.set_cluster_toggle(on)
    }

    // ── Range ───────────────────────────────────────────────────

    pub fn set_this_week(&mut self) {
        self.range.set_this_week();
        self.commit_now();
    }

    pub fn set_one_period(&mut self) {
        self.range.set_one_period();
        self.commit_now();
    }

    pub fn set_all_time(&mut self) {
        self.range.set_all_time();
        self.commit_now();
    }

    pub fn set_explicit(&mut self, start_offset_days: i64, end_offset_days: i64) {
        self.range.set_explicit(start_offset_days, end_offset_days);
        self.commit_now();
    }

    /// Select the whole days `start..=end`.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        let interval = self.range.from_dates(start, end);
        self.set_explicit(interval.start_offset_days, interval.end_offset_days);
    }

    /// Click on the bare track at screen `x`.
    pub fn recenter_at_x(&mut self, x: f32, slider: &SliderGeometry) {
        let day = slider.x_to_day(x - slider.left, self.range.max_range_days());
        self.range.recenter_at(day);
        self.commit_now();
    }

    /// Range supplied by the surrounding screen. Ignored once the user has
    /// moved the slider; returns whether it was taken.
    pub fn apply_external_hint(&mut self, start: NaiveDate, end: NaiveDate) -> bool {
        if !self.range.apply_external_hint(start, end) {
            return false;
        }
        self.commit_now();
        true
    }

    pub fn reset_user_adjusted(&mut self) {
        self.range.reset_user_adjusted();
        if let Err(e) = self.persistence.set_user_moved(false) {
            log::warn!("Failed to persist range flag: {}", e);
        }
    }

    /// Feed one slider pointer event. Returns `true` when the active window
    /// changed and the partition should be rebuilt.
    pub fn pointer(&mut self, event: PointerEvent, slider: &SliderGeometry, now: Instant) -> bool {
        let changed = self.drag.handle(event, slider, &mut self.range);
        if changed {
            self.persist();
            if self.throttle.offer(now) {
                return self.publish();
            }
        }
        if event == PointerEvent::Up && self.throttle.flush(now) {
            return self.publish();
        }
        false
    }

    /// Deliver a throttled interval once its quiet period has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.throttle.poll(now) {
            self.publish()
        } else {
            false
        }
    }

    fn commit_now(&mut self) {
        self.persist();
        self.publish();
    }

    fn publish(&mut self) -> bool {
        let window = self.range.window();
        if window == self.active_window {
            return false;
        }
        self.active_window = window;
        true
    }

    fn persist(&mut self) {
        let now_ms = Utc::now().timestamp_millis();
        let result = self
            .persistence
            .save(self.range.interval(), now_ms)
            .and_then(|()| self.persistence.set_user_moved(self.range.user_adjusted()));
        if let Err(e) = result {
            log::warn!("Failed to persist range: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;
    use crate::model::{Interval, RangePreset};
    use std::time::Duration;

    fn wednesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn controller() -> MapController<MemoryStore> {
        MapController::new(Settings::default(), MemoryStore::new(), wednesday())
    }

    #[test]
    fn starts_with_default_and_marks_initial_processed() {
        let c = controller();
        assert_eq!(c.range().interval(), Interval::new(0, 31));
        assert!(!c.range().user_adjusted());
        assert!(c.persistence().processed_initial());
        assert!(c.persistence().load().is_none());
    }

    #[test]
    fn stale_range_is_discarded_on_start() {
        let mut store = MemoryStore::new();
        store
            .set("timelineState", r#"{"timeRange":[3,8],"timestamp":0}"#)
            .unwrap();
        let c = MapController::new(Settings::default(), store, wednesday());
        assert_eq!(c.range().interval(), Interval::new(0, 31));
        assert!(c.persistence().store().get("timelineState").is_none());
    }

    #[test]
    fn preset_applies_and_persists_immediately() {
        let mut c = controller();
        c.set_this_week();
        assert_eq!(c.range().preset(), RangePreset::Week);
        assert_eq!(c.active_window(), &c.range().window());
        assert_eq!(c.persistence().load().unwrap().interval, Interval::new(0, 4));
        assert!(c.persistence().user_moved());
    }

    #[test]
    fn drag_is_throttled_and_flushed_on_release() {
        let mut c = controller();
        let slider = SliderGeometry::new(0.0, 310.0);
        let t0 = Instant::now();

        // Grab the right edge (day 31 at x = 310) and pull it in.
        assert!(!c.pointer(PointerEvent::Down { x: 305.0 }, &slider, t0));
        assert_eq!(c.drag_mode(), Some(DragMode::Right));
        assert!(c.pointer(PointerEvent::Move { x: 295.0 }, &slider, t0));
        let first = *c.active_window();

        let t1 = t0 + Duration::from_millis(10);
        assert!(!c.pointer(PointerEvent::Move { x: 255.0 }, &slider, t1));
        assert_eq!(c.active_window(), &first);
        assert_eq!(c.range().interval(), Interval::new(0, 26));

        assert!(c.pointer(PointerEvent::Up, &slider, t1));
        assert!(!c.is_dragging());
        assert_eq!(c.active_window(), &c.range().window());
        assert_eq!(c.persistence().load().unwrap().interval, Interval::new(0, 26));
    }

    #[test]
    fn tick_delivers_pending_interval() {
        let mut c = controller();
        let slider = SliderGeometry::new(0.0, 310.0);
        let t0 = Instant::now();
        c.pointer(PointerEvent::Down { x: 5.0 }, &slider, t0);
        c.pointer(PointerEvent::Move { x: 25.0 }, &slider, t0);
        c.pointer(PointerEvent::Move { x: 45.0 }, &slider, t0 + Duration::from_millis(5));
        assert!(!c.tick(t0 + Duration::from_millis(20)));
        assert!(c.tick(t0 + Duration::from_millis(60)));
        assert_eq!(c.range().interval(), Interval::new(4, 31));
    }

    #[test]
    fn external_hint_respects_user_adjustment() {
        let mut c = controller();
        let start = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 25).unwrap();
        assert!(c.apply_external_hint(start, end));
        assert_eq!(c.range().interval(), Interval::new(5, 10));

        c.set_all_time();
        assert!(!c.apply_external_hint(start, end));
        c.reset_user_adjusted();
        assert!(!c.persistence().user_moved());
        assert!(c.apply_external_hint(start, end));
    }

    #[test]
    fn partition_follows_active_window() {
        let mut c = controller();
        let at = |d: u32| NaiveDate::from_ymd_opt(2025, 1, d).and_then(|d| d.and_hms_opt(20, 0, 0));
        c.set_points(vec![
            Point::project("tonight", 48.85, 2.35).with_dates(at(15), at(15)),
            Point::project("next-week", 45.76, 4.83).with_dates(at(22), at(22)),
            Point::location("home", 43.29, 5.36),
        ]);
        assert_eq!(c.partition().len(), 3);
        c.set_this_week();
        let partition = c.partition();
        assert_eq!(partition.len(), 2);
        assert!(partition.normal_points.iter().all(|p| p.id != "next-week"));

        c.set_shown(Category::Location, false);
        assert_eq!(c.partition().len(), 1);
    }

    #[test]
    fn recenter_keeps_width() {
        let mut c = controller();
        c.set_explicit(0, 6);
        c.recenter_at_x(200.0, &SliderGeometry::new(0.0, 310.0));
        assert_eq!(c.range().interval(), Interval::new(17, 23));
    }
}
