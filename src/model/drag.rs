use super::interval::{Interval, RangeIntervalModel};

/// Which part of the selected range a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Start edge only.
    Left,
    /// End edge only.
    Right,
    /// The whole interval.
    Center,
}

/// Snapshot taken on pointer-down; every move is computed against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub mode: DragMode,
    pub anchor_interval: Interval,
    pub anchor_pointer_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Mouse, touch and pen input reduced to what the slider needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32 },
    Move { x: f32 },
    Up,
}

/// Horizontal placement of the slider track on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderGeometry {
    /// Screen x of the track's left end.
    pub left: f32,
    /// Track width in pixels.
    pub width: f32,
}

impl SliderGeometry {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Pixel offset of `day` from the track's left end.
    pub fn day_to_x(&self, day: i64, max_range_days: i64) -> f32 {
        if max_range_days <= 0 {
            return 0.0;
        }
        day as f32 / max_range_days as f32 * self.width
    }

    /// Fractional day under a pixel offset from the track's left end.
    pub fn x_to_day(&self, x: f32, max_range_days: i64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (x / self.width) as f64 * max_range_days as f64
    }

    /// Whole days covered by a pointer movement of `delta_x` pixels.
    pub fn delta_days(&self, delta_x: f32, max_range_days: i64) -> i64 {
        if self.width <= 0.0 {
            return 0;
        }
        (delta_x / self.width * max_range_days as f32).round() as i64
    }
}

/// Pick the drag mode for a press at `click_x` (relative to the track).
///
/// A press within `edge_zone_px` of exactly one edge grabs that edge;
/// anything else, including a press near both edges of a narrow range,
/// moves the whole interval.
pub fn detect_mode(
    click_x: f32,
    interval: Interval,
    max_range_days: i64,
    slider: &SliderGeometry,
    edge_zone_px: f32,
) -> DragMode {
    let left_x = slider.day_to_x(interval.start_offset_days, max_range_days);
    let right_x = slider.day_to_x(interval.end_offset_days, max_range_days);
    let near_left = (click_x - left_x).abs() <= edge_zone_px;
    let near_right = (click_x - right_x).abs() <= edge_zone_px;

    let mode = match (near_left, near_right) {
        (true, false) => DragMode::Left,
        (false, true) => DragMode::Right,
        _ => DragMode::Center,
    };
    log::debug!(
        "Drag mode {:?}: click {:.1}px, edges {:.1}px / {:.1}px",
        mode,
        click_x,
        left_x,
        right_x
    );
    mode
}

/// Apply a day delta to `anchor` according to `mode`.
///
/// Edge drags never let the edges meet or cross; a centre drag that would
/// leave `[0, max_range_days]` is shifted back whole, not truncated.
pub fn resolve(mode: DragMode, anchor: Interval, delta_days: i64, max_range_days: i64) -> Interval {
    let Interval {
        start_offset_days: start,
        end_offset_days: end,
    } = anchor;
    match mode {
        DragMode::Left => {
            let new_start = (start + delta_days).min(end - 1).max(0);
            Interval::new(new_start, end)
        }
        DragMode::Right => {
            let new_end = (end + delta_days).max(start + 1).min(max_range_days);
            Interval::new(start, new_end)
        }
        DragMode::Center => {
            let mut new_start = start + delta_days;
            let mut new_end = end + delta_days;
            if new_start < 0 {
                new_end -= new_start;
                new_start = 0;
            }
            if new_end > max_range_days {
                new_start -= new_end - max_range_days;
                new_end = max_range_days;
            }
            Interval::new(new_start.max(0), new_end)
        }
    }
}

/// Turns pointer input on the range slider into interval changes.
#[derive(Debug, Clone)]
pub struct DragModeStateMachine {
    state: DragState,
    edge_zone_px: f32,
}

impl DragModeStateMachine {
    pub fn new(edge_zone_px: f32) -> Self {
        Self {
            state: DragState::Idle,
            edge_zone_px,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn mode(&self) -> Option<DragMode> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session.mode),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Feed one pointer event. Returns `true` when the interval changed.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        slider: &SliderGeometry,
        model: &mut RangeIntervalModel,
    ) -> bool {
        match event {
            PointerEvent::Down { x } => {
                let anchor = model.interval();
                let mode = detect_mode(
                    x - slider.left,
                    anchor,
                    model.max_range_days(),
                    slider,
                    self.edge_zone_px,
                );
                self.state = DragState::Dragging(DragSession {
                    mode,
                    anchor_interval: anchor,
                    anchor_pointer_x: x,
                });
                false
            }
            PointerEvent::Move { x } => {
                let DragState::Dragging(session) = self.state else {
                    return false;
                };
                let max = model.max_range_days();
                let delta = slider.delta_days(x - session.anchor_pointer_x, max);
                let next = resolve(session.mode, session.anchor_interval, delta, max);
                if next == model.interval() {
                    return false;
                }
                model.set_explicit(next.start_offset_days, next.end_offset_days);
                true
            }
            PointerEvent::Up => {
                self.state = DragState::Idle;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// A 31-day slider, 310 px wide, so one day is 10 px.
    fn slider() -> SliderGeometry {
        SliderGeometry::new(100.0, 310.0)
    }

    fn model_with(start: i64, end: i64) -> RangeIntervalModel {
        let reference = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let mut m = RangeIntervalModel::new(reference, &Settings::default());
        m.set_explicit(start, end);
        m.reset_user_adjusted();
        m
    }

    #[test]
    fn press_near_left_thumb_grabs_start() {
        let mode = detect_mode(52.0, Interval::new(5, 20), 31, &slider(), 20.0);
        assert_eq!(mode, DragMode::Left);
        let mode = detect_mode(31.0, Interval::new(5, 20), 31, &slider(), 20.0);
        assert_eq!(mode, DragMode::Left);
    }

    #[test]
    fn press_near_right_thumb_grabs_end() {
        let mode = detect_mode(215.0, Interval::new(5, 20), 31, &slider(), 20.0);
        assert_eq!(mode, DragMode::Right);
    }

    #[test]
    fn press_in_middle_or_near_both_moves_whole_range() {
        assert_eq!(detect_mode(125.0, Interval::new(5, 20), 31, &slider(), 20.0), DragMode::Center);
        assert_eq!(detect_mode(55.0, Interval::new(5, 6), 31, &slider(), 20.0), DragMode::Center);
    }

    #[test]
    fn left_drag_moves_start_only() {
        assert_eq!(resolve(DragMode::Left, Interval::new(5, 20), 10, 31), Interval::new(15, 20));
    }

    #[test]
    fn left_drag_stops_one_day_before_end() {
        assert_eq!(resolve(DragMode::Left, Interval::new(5, 20), 40, 31), Interval::new(19, 20));
        assert_eq!(resolve(DragMode::Left, Interval::new(5, 20), -40, 31), Interval::new(0, 20));
    }

    #[test]
    fn right_drag_stops_one_day_after_start() {
        assert_eq!(resolve(DragMode::Right, Interval::new(5, 20), -40, 31), Interval::new(5, 6));
        assert_eq!(resolve(DragMode::Right, Interval::new(5, 20), 40, 31), Interval::new(5, 31));
    }

    #[test]
    fn center_drag_shifts_back_instead_of_truncating() {
        assert_eq!(resolve(DragMode::Center, Interval::new(5, 20), 20, 31), Interval::new(16, 31));
        assert_eq!(resolve(DragMode::Center, Interval::new(5, 20), -9, 31), Interval::new(0, 15));
    }

    #[test]
    fn full_gesture_on_left_edge() {
        let mut m = model_with(5, 20);
        let mut machine = DragModeStateMachine::new(20.0);
        let s = slider();

        assert!(!machine.handle(PointerEvent::Down { x: 150.0 }, &s, &mut m));
        assert_eq!(machine.mode(), Some(DragMode::Left));

        // +100 px is +10 days.
        assert!(machine.handle(PointerEvent::Move { x: 250.0 }, &s, &mut m));
        assert_eq!(m.interval(), Interval::new(15, 20));
        assert!(m.user_adjusted());

        // Moves are relative to the anchor, not cumulative.
        assert!(machine.handle(PointerEvent::Move { x: 170.0 }, &s, &mut m));
        assert_eq!(m.interval(), Interval::new(7, 20));

        assert!(!machine.handle(PointerEvent::Up, &s, &mut m));
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut m = model_with(5, 20);
        let mut machine = DragModeStateMachine::new(20.0);
        assert!(!machine.handle(PointerEvent::Move { x: 300.0 }, &slider(), &mut m));
        assert_eq!(m.interval(), Interval::new(5, 20));
        assert!(!m.user_adjusted());
    }

    #[test]
    fn sub_day_jitter_is_not_a_change() {
        let mut m = model_with(5, 20);
        let mut machine = DragModeStateMachine::new(20.0);
        let s = slider();
        machine.handle(PointerEvent::Down { x: 225.0 }, &s, &mut m);
        assert!(!machine.handle(PointerEvent::Move { x: 228.0 }, &s, &mut m));
        assert!(!m.user_adjusted());
    }

    #[test]
    fn zero_width_slider_never_moves() {
        let s = SliderGeometry::new(0.0, 0.0);
        assert_eq!(s.delta_days(500.0, 31), 0);
        assert_eq!(s.x_to_day(10.0, 31), 0.0);
    }

    proptest! {
        #[test]
        fn prop_resolve_stays_valid(
            start in 0i64..30,
            len in 1i64..30,
            delta in -100i64..100,
            mode in prop_oneof![Just(DragMode::Left), Just(DragMode::Right), Just(DragMode::Center)],
        ) {
            let max = 31;
            let end = (start + len).min(max);
            prop_assume!(start < end);
            let out = resolve(mode, Interval::new(start, end), delta, max);
            prop_assert!(out.start_offset_days >= 0);
            prop_assert!(out.end_offset_days <= max);
            prop_assert!(out.start_offset_days < out.end_offset_days);
            match mode {
                DragMode::Left => prop_assert_eq!(out.end_offset_days, end),
                DragMode::Right => prop_assert_eq!(out.start_offset_days, start),
                DragMode::Center => prop_assert_eq!(out.len_days(), end - start),
            }
        }
    }
}
