use std::time::Instant;

use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use zigzag_map::io::KeyValueStore;
use zigzag_map::model::drag::detect_mode;
use zigzag_map::model::{DragMode, PointerEvent, RangePreset, SliderGeometry};
use zigzag_map::MapController;

use crate::ui::theme;

const TRACK_MARGIN: f32 = 18.0;

/// Result details from interactions with the timeline bar.
#[derive(Debug, Clone, Default)]
pub struct TimelineInteraction {
    /// The active window moved; the partition must be rebuilt.
    pub changed: bool,
    pub open_custom_range: bool,
}

/// Render the preset buttons and the range slider (bottom panel).
pub fn show_timeline_bar<S: KeyValueStore>(controller: &mut MapController<S>, ui: &mut Ui) -> TimelineInteraction {
    let mut interaction = TimelineInteraction::default();

    ui.horizontal_centered(|ui| {
        let preset = controller.range().preset();
        if ui
            .selectable_label(preset == RangePreset::Week, "This week")
            .clicked()
        {
            controller.set_this_week();
            interaction.changed = true;
        }
        if ui
            .selectable_label(matches!(preset, RangePreset::Month | RangePreset::Default), "One month")
            .clicked()
        {
            controller.set_one_period();
            interaction.changed = true;
        }
        if ui
            .selectable_label(preset == RangePreset::AllTime, "All time")
            .clicked()
        {
            controller.set_all_time();
            interaction.changed = true;
        }
        let custom = ui
            .selectable_label(
                preset == RangePreset::Custom,
                format!("{} Custom", egui_phosphor::regular::CALENDAR_BLANK),
            )
            .on_hover_text("Pick start and end dates");
        if custom.clicked() {
            interaction.open_custom_range = true;
        }
        ui.separator();

        interaction.changed |= show_slider(controller, ui);
    });

    interaction
}

fn show_slider<S: KeyValueStore>(controller: &mut MapController<S>, ui: &mut Ui) -> bool {
    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), theme::TIMELINE_HEIGHT),
        Sense::hover(),
    );
    let track = Rect::from_min_size(
        Pos2::new(rect.left() + TRACK_MARGIN, rect.center().y + 4.0),
        Vec2::new((rect.width() - TRACK_MARGIN * 2.0).max(1.0), theme::TRACK_HEIGHT),
    );
    let slider = SliderGeometry::new(track.left(), track.width());

    let response = ui.interact(
        track.expand2(Vec2::new(theme::HANDLE_WIDTH, 10.0)),
        ui.make_persistent_id("range-slider"),
        Sense::click_and_drag(),
    );

    let now = Instant::now();
    let mut changed = false;
    if response.drag_started() {
        let x = ui
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos())
            .map(|p| p.x)
            .unwrap_or(track.left());
        changed |= controller.pointer(PointerEvent::Down { x }, &slider, now);
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            changed |= controller.pointer(PointerEvent::Move { x: pos.x }, &slider, now);
        }
    }
    if response.drag_stopped() {
        changed |= controller.pointer(PointerEvent::Up, &slider, now);
    }

    let range = controller.range();
    let max = range.max_range_days();
    let interval = range.interval();
    let x_start = track.left() + slider.day_to_x(interval.start_offset_days, max);
    let x_end = track.left() + slider.day_to_x(interval.end_offset_days, max);

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if pos.x < x_start || pos.x > x_end {
                controller.recenter_at_x(pos.x, &slider);
                changed = true;
            }
        }
    }

    if controller.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    } else if let Some(pos) = response.hover_pos() {
        let mode = detect_mode(
            pos.x - track.left(),
            controller.range().interval(),
            controller.range().max_range_days(),
            &slider,
            controller.settings().edge_zone_px,
        );
        let icon = match mode {
            DragMode::Left | DragMode::Right => egui::CursorIcon::ResizeHorizontal,
            DragMode::Center => egui::CursorIcon::Grab,
        };
        ui.ctx().set_cursor_icon(icon);
    }

    draw_slider(ui.painter(), controller, &slider, track);
    changed
}

fn draw_slider<S: KeyValueStore>(
    painter: &egui::Painter,
    controller: &MapController<S>,
    slider: &SliderGeometry,
    track: Rect,
) {
    let range = controller.range();
    let max = range.max_range_days();
    let x_of = |day: i64| track.left() + slider.day_to_x(day, max);

    painter.rect_filled(track, Rounding::same(4.0), theme::BG_FIELD);

    // Week ticks, alternating shade
    for (i, week) in range.week_markers().iter().enumerate() {
        let left = x_of(week.start_offset_days);
        let right = x_of((week.end_offset_days + 1).min(max));
        if i % 2 == 0 {
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(left, track.top()), Pos2::new(right, track.bottom())),
                0.0,
                theme::WEEK_SHADE,
            );
        }
        painter.line_segment(
            [Pos2::new(left, track.top() - 3.0), Pos2::new(left, track.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }

    let interval = range.interval();
    let x_start = x_of(interval.start_offset_days);
    let x_end = x_of(interval.end_offset_days);
    painter.rect_filled(
        Rect::from_min_max(Pos2::new(x_start, track.top()), Pos2::new(x_end.max(x_start + 2.0), track.bottom())),
        Rounding::same(3.0),
        theme::RANGE_FILL,
    );

    // Today marker at offset zero
    painter.line_segment(
        [Pos2::new(track.left(), track.top() - 4.0), Pos2::new(track.left(), track.bottom() + 4.0)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let (start_label, end_label) = range.thumb_labels();
    for (x, label) in [(x_start, start_label), (x_end, end_label)] {
        let handle = Rect::from_center_size(
            Pos2::new(x, track.center().y),
            Vec2::new(theme::HANDLE_WIDTH, theme::TRACK_HEIGHT + 8.0),
        );
        painter.rect_filled(handle, Rounding::same(2.0), theme::HANDLE_COLOR);
        painter.rect_stroke(handle, Rounding::same(2.0), Stroke::new(1.0, Color32::from_black_alpha(80)));
        painter.text(
            Pos2::new(x, track.top() - 8.0),
            Align2::CENTER_BOTTOM,
            label,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
    }

    painter.text(
        Pos2::new(track.right(), track.bottom() + 3.0),
        Align2::RIGHT_TOP,
        format!("{} days", max),
        theme::font_small(),
        theme::TEXT_DIM,
    );
}
