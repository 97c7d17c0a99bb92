use egui::{Color32, FontId, Rounding, Stroke, Visuals};
use zigzag_map::model::Category;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_FIELD: Color32 = Color32::from_rgb(20, 20, 28);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 255, 255);

pub const PROJECT_COLOR: Color32 = Color32::from_rgb(251, 140, 0);
pub const LOCATION_COLOR: Color32 = Color32::from_rgb(52, 168, 83);

pub const WEEK_SHADE: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 8);
pub const RANGE_FILL: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 90);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const TIMELINE_HEIGHT: f32 = 64.0;
pub const TRACK_HEIGHT: f32 = 14.0;
pub const HANDLE_WIDTH: f32 = 7.0;
pub const PIN_RADIUS: f32 = 6.0;
pub const CLUSTER_RADIUS: f32 = 15.0;
pub const CLOSE_CLUSTER_RADIUS: f32 = 10.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_badge() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Project => PROJECT_COLOR,
        Category::Location => LOCATION_COLOR,
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

/// Dark visuals with the accent on hovered and pressed controls. Menus,
/// toggles and the date pickers are the only widgets, so the remaining
/// states keep the egui defaults.
fn viewer_visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);

    for (state, fill) in [
        (&mut visuals.widgets.hovered, Color32::from_rgb(52, 54, 68)),
        (&mut visuals.widgets.active, Color32::from_rgb(60, 62, 76)),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.bg_stroke = Stroke::new(1.0, ACCENT);
        state.rounding = Rounding::same(4.0);
    }

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals
}

pub fn apply_theme(ctx: &egui::Context) {
    ctx.set_visuals(viewer_visuals());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_marks_hovered_and_pressed_controls() {
        let visuals = viewer_visuals();
        assert_eq!(visuals.widgets.hovered.bg_stroke.color, ACCENT);
        assert_eq!(visuals.widgets.active.bg_stroke.color, ACCENT);
        assert_eq!(visuals.widgets.inactive, Visuals::dark().widgets.inactive);
    }

    #[test]
    fn categories_are_told_apart() {
        assert_ne!(category_color(Category::Project), category_color(Category::Location));
    }
}
