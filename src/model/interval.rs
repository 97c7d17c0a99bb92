use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timeframe::TimeWindow;
use crate::config::Settings;

/// Fallback length of the one-month period when calendar arithmetic overflows.
const FALLBACK_PERIOD_DAYS: i64 = 30;
/// Week ticks shown on the slider, the current partial week included.
const MAX_WEEK_MARKERS: usize = 8;

/// Selected range as day offsets from the model's reference day.
///
/// Both offsets are inclusive: `[0, 4]` covers today and the four days after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start_offset_days: i64,
    pub end_offset_days: i64,
}

impl Interval {
    pub fn new(start_offset_days: i64, end_offset_days: i64) -> Self {
        Self {
            start_offset_days,
            end_offset_days,
        }
    }

    pub fn len_days(&self) -> i64 {
        self.end_offset_days - self.start_offset_days
    }

    /// Bring both offsets into `[0, max_range_days]` and order them.
    pub fn clamped(self, max_range_days: i64) -> Self {
        let max = max_range_days.max(0);
        let a = self.start_offset_days.clamp(0, max);
        let b = self.end_offset_days.clamp(0, max);
        Self::new(a.min(b), a.max(b))
    }
}

/// Which named adjustment produced the current interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePreset {
    Default,
    Week,
    Month,
    AllTime,
    Custom,
}

/// One tick span on the slider, in day offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSpan {
    pub start_offset_days: i64,
    pub end_offset_days: i64,
}

/// The selected date interval and the slider range it lives in.
#[derive(Debug, Clone)]
pub struct RangeIntervalModel {
    reference: NaiveDateTime,
    interval: Interval,
    max_range_days: i64,
    period_days: i64,
    default_max_days: i64,
    all_time_days: i64,
    preset: RangePreset,
    user_adjusted: bool,
}

impl RangeIntervalModel {
    /// Start a session at `reference` ("now") with the one-month default.
    pub fn new(reference: NaiveDateTime, settings: &Settings) -> Self {
        let period_days = one_period_days(reference.date());
        let default_max_days = period_days.max(settings.min_range_days);
        Self {
            reference,
            interval: Interval::new(0, period_days),
            max_range_days: default_max_days,
            period_days,
            default_max_days,
            all_time_days: settings.all_time_days,
            preset: RangePreset::Default,
            user_adjusted: false,
        }
    }

    // ── Getters ─────────────────────────────────────────────────

    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    pub fn today(&self) -> NaiveDate {
        self.reference.date()
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn max_range_days(&self) -> i64 {
        self.max_range_days
    }

    pub fn preset(&self) -> RangePreset {
        self.preset
    }

    pub fn user_adjusted(&self) -> bool {
        self.user_adjusted
    }

    // ── Named adjustments ───────────────────────────────────────

    /// Today through the coming Sunday.
    pub fn set_this_week(&mut self) {
        if self.max_range_days >= self.all_time_days {
            self.max_range_days = self.default_max_days;
        }
        let days_to_sunday = days_until_sunday(self.today());
        self.commit(Interval::new(0, days_to_sunday), RangePreset::Week);
    }

    /// Today through the same date next month (clamped to that month's
    /// last day), not through the end of next month.
    pub fn set_one_period(&mut self) {
        self.max_range_days = self.default_max_days;
        self.commit(Interval::new(0, self.period_days), RangePreset::Month);
    }

    /// Ten years ahead; the slider range grows to match.
    pub fn set_all_time(&mut self) {
        self.max_range_days = self.all_time_days;
        self.commit(Interval::new(0, self.all_time_days), RangePreset::AllTime);
    }

    /// Arbitrary offsets, clamped into the slider range and ordered.
    pub fn set_explicit(&mut self, start_offset_days: i64, end_offset_days: i64) {
        self.commit(
            Interval::new(start_offset_days, end_offset_days),
            RangePreset::Custom,
        );
    }

    /// Centre the interval on `day` (a click on the bare track), keeping its
    /// width and shifting it back inside the range when it would overflow.
    pub fn recenter_at(&mut self, day: f64) {
        let half = self.interval.len_days() as f64 / 2.0;
        let mut start = (day - half).round() as i64;
        let mut end = (day + half).round() as i64;
        if start < 0 {
            end -= start;
            start = 0;
        }
        if end > self.max_range_days {
            start -= end - self.max_range_days;
            end = self.max_range_days;
        }
        self.commit(Interval::new(start.max(0), end), RangePreset::Custom);
    }

    fn commit(&mut self, interval: Interval, preset: RangePreset) {
        self.interval = interval.clamped(self.max_range_days);
        self.preset = preset;
        self.user_adjusted = true;
    }

    // ── External sync ───────────────────────────────────────────

    /// Follow a range supplied by the surrounding screen, unless the user
    /// already moved the slider. Returns whether the hint was taken.
    pub fn apply_external_hint(&mut self, start: NaiveDate, end: NaiveDate) -> bool {
        if self.user_adjusted {
            log::debug!("Ignoring external range hint {} → {}: user adjusted", start, end);
            return false;
        }
        let hint = self.from_dates(start, end);
        if hint.end_offset_days > self.max_range_days {
            self.max_range_days = hint.end_offset_days.min(self.all_time_days);
        }
        self.interval = hint.clamped(self.max_range_days);
        self.preset = RangePreset::Default;
        true
    }

    /// Allow external hints again.
    pub fn reset_user_adjusted(&mut self) {
        self.user_adjusted = false;
    }

    /// Reinstate a persisted interval and its adjusted flag.
    pub fn restore(&mut self, interval: Interval, user_adjusted: bool) {
        let interval = interval.clamped(self.all_time_days);
        if interval.end_offset_days > self.max_range_days {
            self.max_range_days = interval.end_offset_days;
        }
        self.interval = interval;
        self.preset = if interval == Interval::new(0, self.all_time_days) {
            RangePreset::AllTime
        } else {
            RangePreset::Custom
        };
        self.user_adjusted = user_adjusted;
    }

    // ── Date conversion ─────────────────────────────────────────

    pub fn date_at(&self, offset_days: i64) -> NaiveDate {
        self.today() + Duration::days(offset_days)
    }

    /// Absolute first and last day of the interval.
    pub fn to_dates(&self) -> (NaiveDate, NaiveDate) {
        (
            self.date_at(self.interval.start_offset_days),
            self.date_at(self.interval.end_offset_days),
        )
    }

    /// Offsets for absolute dates, relative to the reference day (unclamped).
    pub fn from_dates(&self, start: NaiveDate, end: NaiveDate) -> Interval {
        let today = self.today();
        Interval::new((start - today).num_days(), (end - today).num_days())
    }

    /// Whole-day window covered by the interval.
    pub fn window(&self) -> TimeWindow {
        let (start, end) = self.to_dates();
        TimeWindow::from_dates(start, end)
    }

    /// Label dates for the left and right thumbs.
    pub fn thumb_labels(&self) -> (String, String) {
        let (start, end) = self.to_dates();
        (
            start.format("%d %b %Y").to_string(),
            end.format("%d %b %Y").to_string(),
        )
    }

    /// The current partial week, then whole Monday–Sunday weeks inside the range.
    pub fn week_markers(&self) -> Vec<WeekSpan> {
        let days_to_sunday = days_until_sunday(self.today());
        let mut weeks = vec![WeekSpan {
            start_offset_days: 0,
            end_offset_days: days_to_sunday,
        }];
        let max_weeks = (self.max_range_days + 6) / 7;
        for week_index in 1..max_weeks {
            if weeks.len() >= MAX_WEEK_MARKERS {
                break;
            }
            let monday = days_to_sunday + 1 + (week_index - 1) * 7;
            if monday < self.max_range_days {
                weeks.push(WeekSpan {
                    start_offset_days: monday,
                    end_offset_days: monday + 6,
                });
            }
        }
        weeks
    }
}

/// Days from `date` to the next Sunday; zero on a Sunday.
pub fn days_until_sunday(date: NaiveDate) -> i64 {
    let from_sunday = date.weekday().num_days_from_sunday() as i64;
    if from_sunday == 0 {
        0
    } else {
        7 - from_sunday
    }
}

/// Days from `date` to the same date next month (clamped to that month's end).
pub fn one_period_days(date: NaiveDate) -> i64 {
    date.checked_add_months(Months::new(1))
        .map(|next| (next - date).num_days())
        .unwrap_or(FALLBACK_PERIOD_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2025-01-15 is a Wednesday.
    fn wednesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn model() -> RangeIntervalModel {
        RangeIntervalModel::new(wednesday(), &Settings::default())
    }

    #[test]
    fn default_is_one_month_and_not_adjusted() {
        let m = model();
        assert_eq!(m.interval(), Interval::new(0, 31));
        assert_eq!(m.max_range_days(), 31);
        assert_eq!(m.preset(), RangePreset::Default);
        assert!(!m.user_adjusted());
    }

    #[test]
    fn one_period_stops_at_the_same_date_next_month() {
        let mut m = model();
        m.set_all_time();
        m.set_one_period();
        assert_eq!(m.to_dates().1, NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
        let jan_31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(one_period_days(jan_31), 28);
    }

    #[test]
    fn short_month_keeps_minimum_slider_range() {
        let feb = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let m = RangeIntervalModel::new(feb, &Settings::default());
        assert_eq!(m.interval(), Interval::new(0, 28));
        assert_eq!(m.max_range_days(), 30);
    }

    #[test]
    fn this_week_on_wednesday_runs_to_sunday() {
        let mut m = model();
        m.set_this_week();
        assert_eq!(m.interval(), Interval::new(0, 4));
        assert_eq!(m.preset(), RangePreset::Week);
        assert!(m.user_adjusted());
        let (_, end) = m.to_dates();
        assert_eq!(end.weekday(), chrono::Weekday::Sun);
    }

    #[test]
    fn this_week_on_sunday_is_just_today() {
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut m = RangeIntervalModel::new(sunday, &Settings::default());
        m.set_this_week();
        assert_eq!(m.interval(), Interval::new(0, 0));
    }

    #[test]
    fn all_time_expands_range_and_week_restores_it() {
        let mut m = model();
        m.set_all_time();
        assert_eq!(m.interval(), Interval::new(0, 3650));
        assert_eq!(m.max_range_days(), 3650);
        m.set_this_week();
        assert_eq!(m.max_range_days(), 31);
        assert_eq!(m.interval(), Interval::new(0, 4));
    }

    #[test]
    fn one_period_resets_from_all_time() {
        let mut m = model();
        m.set_all_time();
        m.set_one_period();
        assert_eq!(m.interval(), Interval::new(0, 31));
        assert_eq!(m.max_range_days(), 31);
        assert_eq!(m.preset(), RangePreset::Month);
    }

    #[test]
    fn explicit_is_clamped_and_swapped() {
        let mut m = model();
        m.set_explicit(20, 5);
        assert_eq!(m.interval(), Interval::new(5, 20));
        m.set_explicit(-4, 400);
        assert_eq!(m.interval(), Interval::new(0, 31));
        assert_eq!(m.preset(), RangePreset::Custom);
    }

    #[test]
    fn external_hint_respected_until_user_adjusts() {
        let mut m = model();
        let today = m.today();
        assert!(m.apply_external_hint(today + Duration::days(2), today + Duration::days(9)));
        assert_eq!(m.interval(), Interval::new(2, 9));
        assert!(!m.user_adjusted());

        m.set_explicit(1, 3);
        assert!(!m.apply_external_hint(today, today + Duration::days(20)));
        assert_eq!(m.interval(), Interval::new(1, 3));

        m.reset_user_adjusted();
        assert!(m.apply_external_hint(today, today + Duration::days(20)));
        assert_eq!(m.interval(), Interval::new(0, 20));
    }

    #[test]
    fn window_covers_whole_days() {
        let mut m = model();
        m.set_this_week();
        let w = m.window();
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(w.end.date(), NaiveDate::from_ymd_opt(2025, 1, 19).unwrap());
        assert!(w.end > NaiveDate::from_ymd_opt(2025, 1, 19).unwrap().and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn dates_round_trip_through_offsets() {
        let m = model();
        let start = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let interval = m.from_dates(start, end);
        assert_eq!(interval, Interval::new(5, 17));
        assert_eq!(m.date_at(interval.start_offset_days), start);
    }

    #[test]
    fn recenter_keeps_width_and_stays_inside() {
        let mut m = model();
        m.set_explicit(0, 10);
        m.recenter_at(15.0);
        assert_eq!(m.interval(), Interval::new(10, 20));
        m.recenter_at(30.0);
        assert_eq!(m.interval(), Interval::new(21, 31));
        m.recenter_at(1.0);
        assert_eq!(m.interval(), Interval::new(0, 10));
    }

    #[test]
    fn restore_reinstates_all_time_range() {
        let mut m = model();
        m.restore(Interval::new(0, 3650), true);
        assert_eq!(m.max_range_days(), 3650);
        assert_eq!(m.preset(), RangePreset::AllTime);
        assert!(m.user_adjusted());
    }

    #[test]
    fn week_markers_start_with_partial_week() {
        let m = model();
        let weeks = m.week_markers();
        assert_eq!(weeks[0], WeekSpan { start_offset_days: 0, end_offset_days: 4 });
        assert_eq!(weeks[1], WeekSpan { start_offset_days: 5, end_offset_days: 11 });
        assert!(weeks.iter().all(|w| w.start_offset_days < m.max_range_days()));
        assert!(weeks.len() <= MAX_WEEK_MARKERS);
    }
}
