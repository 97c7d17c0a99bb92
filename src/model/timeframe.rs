use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::point::{Category, Point};

/// A closed date-time window used to filter dated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whole-day window from the first instant of `start` to the last of `end`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start_of_day(start),
            end: end_of_day(end),
        }
    }

    /// Widen both bounds to full days.
    pub fn normalized(&self) -> Self {
        Self::from_dates(self.start.date(), self.end.date())
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Whether an entity dated `[start, end]` overlaps `window`.
///
/// The window is widened to whole days first. An entity without any date is
/// always visible; one with a single date behaves as an instant on that date.
pub fn overlaps(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>, window: &TimeWindow) -> bool {
    let (start, end) = match (start, end) {
        (None, None) => return true,
        (Some(s), None) => (s, s),
        (None, Some(e)) => (e, e),
        (Some(s), Some(e)) => (s, e),
    };
    let w = window.normalized();

    let starts_inside = w.contains(start);
    let ends_inside = w.contains(end);
    let spans_window = start <= w.start && end >= w.end;
    let within_window = start >= w.start && end <= w.end;

    starts_inside || ends_inside || spans_window || within_window
}

pub fn point_overlaps(point: &Point, window: &TimeWindow) -> bool {
    overlaps(point.start_date, point.end_date, window)
}

/// Keep the points visible in `window`. Locations carry no real dates and
/// always pass.
pub fn filter_points(points: &[Point], window: &TimeWindow) -> Vec<Point> {
    points
        .iter()
        .filter(|p| p.category == Category::Location || point_overlaps(p, window))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn at(d: u32, h: u32) -> Option<NaiveDateTime> {
        day(d).and_hms_opt(h, 0, 0)
    }

    fn window(from: u32, to: u32) -> TimeWindow {
        TimeWindow::from_dates(day(from), day(to))
    }

    #[test]
    fn entity_ending_inside_window() {
        assert!(overlaps(at(1, 9), at(5, 18), &window(3, 10)));
    }

    #[test]
    fn entity_containing_window() {
        assert!(overlaps(at(1, 9), at(20, 18), &window(5, 10)));
    }

    #[test]
    fn entity_after_window() {
        assert!(!overlaps(at(15, 9), at(16, 18), &window(1, 10)));
    }

    #[test]
    fn entity_before_window() {
        assert!(!overlaps(at(1, 9), at(2, 18), &window(3, 10)));
    }

    #[test]
    fn entity_inside_window() {
        assert!(overlaps(at(4, 9), at(6, 18), &window(3, 10)));
    }

    #[test]
    fn window_bounds_are_widened_to_whole_days() {
        // Window given as noon-to-noon still covers late evening on its last day.
        let w = TimeWindow::new(day(3).and_hms_opt(12, 0, 0).unwrap(), day(10).and_hms_opt(12, 0, 0).unwrap());
        assert!(overlaps(at(10, 23), at(11, 1), &w));
        assert!(overlaps(at(2, 22), at(3, 0), &w));
    }

    #[test]
    fn undated_entity_always_passes() {
        assert!(overlaps(None, None, &window(1, 2)));
    }

    #[test]
    fn single_date_behaves_as_instant() {
        assert!(overlaps(at(5, 8), None, &window(3, 10)));
        assert!(!overlaps(None, at(12, 8), &window(3, 10)));
    }

    #[test]
    fn locations_pass_regardless_of_dates() {
        let points = vec![
            Point::project("p-in", 1.0, 1.0).with_dates(at(4, 9), at(4, 10)),
            Point::project("p-out", 1.0, 1.0).with_dates(at(20, 9), at(21, 10)),
            Point::location("home", 1.0, 1.0).with_dates(at(20, 9), at(21, 10)),
        ];
        let kept: Vec<_> = filter_points(&points, &window(3, 10))
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(kept, vec!["p-in", "home"]);
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let end = end_of_day(day(3));
        assert_eq!(end.date(), day(3));
        assert_eq!(end + Duration::milliseconds(1), start_of_day(day(4)));
    }
}
