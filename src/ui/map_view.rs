use std::collections::BTreeMap;

use egui::{Align2, Color32, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};
use zigzag_map::geo::{Coord, Layer, MarkerKey, MarkerLayers};
use zigzag_map::model::Category;

use crate::ui::theme;

const MIN_PIXELS_PER_DEGREE: f32 = 2.0;
const MAX_PIXELS_PER_DEGREE: f32 = 400_000.0;
/// Screen cell size used to merge main-layer markers into clusters.
const CLUSTER_CELL_PX: f32 = 56.0;
const GRID_STEPS_DEG: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0];

/// Pan and zoom of the equirectangular canvas.
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    pub center: Coord,
    pub pixels_per_degree: f32,
    last_size: Vec2,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Coord::new(46.5, 2.5),
            pixels_per_degree: 40.0,
            last_size: Vec2::new(900.0, 560.0),
        }
    }
}

impl MapView {
    fn project(&self, coord: Coord, rect: Rect) -> Pos2 {
        let ppd = self.pixels_per_degree as f64;
        Pos2::new(
            rect.center().x + ((coord.lng - self.center.lng) * ppd) as f32,
            rect.center().y - ((coord.lat - self.center.lat) * ppd) as f32,
        )
    }

    fn unproject(&self, pos: Pos2, rect: Rect) -> Coord {
        let ppd = self.pixels_per_degree as f64;
        Coord::new(
            self.center.lat - (pos.y - rect.center().y) as f64 / ppd,
            self.center.lng + (pos.x - rect.center().x) as f64 / ppd,
        )
    }

    /// Zoom by `factor`, keeping the coordinate under `anchor` in place.
    fn zoom_at(&mut self, factor: f32, anchor: Pos2, rect: Rect) {
        let before = self.unproject(anchor, rect);
        self.pixels_per_degree =
            (self.pixels_per_degree * factor).clamp(MIN_PIXELS_PER_DEGREE, MAX_PIXELS_PER_DEGREE);
        let after = self.unproject(anchor, rect);
        self.center.lat += before.lat - after.lat;
        self.center.lng += before.lng - after.lng;
    }

    /// Frame all `coords`, or leave the view alone when there are none.
    pub fn fit(&mut self, coords: impl IntoIterator<Item = Coord>) {
        let mut bounds: Option<(Coord, Coord)> = None;
        for c in coords.into_iter().filter(Coord::is_finite) {
            bounds = Some(match bounds {
                None => (c, c),
                Some((lo, hi)) => (
                    Coord::new(lo.lat.min(c.lat), lo.lng.min(c.lng)),
                    Coord::new(hi.lat.max(c.lat), hi.lng.max(c.lng)),
                ),
            });
        }
        let Some((lo, hi)) = bounds else {
            return;
        };
        self.center = Coord::new((lo.lat + hi.lat) / 2.0, (lo.lng + hi.lng) / 2.0);
        let span_lat = (hi.lat - lo.lat).max(0.01) as f32;
        let span_lng = (hi.lng - lo.lng).max(0.01) as f32;
        let ppd = (self.last_size.x / span_lng).min(self.last_size.y / span_lat) * 0.8;
        self.pixels_per_degree = ppd.clamp(MIN_PIXELS_PER_DEGREE, MAX_PIXELS_PER_DEGREE);
    }
}

/// Result details from interactions on the map.
#[derive(Debug, Clone, Default)]
pub struct MapInteraction {
    pub selected: Option<MarkerKey>,
}

enum Mark {
    Pin {
        key: MarkerKey,
        pos: Pos2,
        category: Category,
        title: String,
    },
    Cluster {
        pos: Pos2,
        count: usize,
        category: Category,
        close: bool,
    },
}

impl Mark {
    fn pos(&self) -> Pos2 {
        match self {
            Mark::Pin { pos, .. } | Mark::Cluster { pos, .. } => *pos,
        }
    }

    fn radius(&self) -> f32 {
        match self {
            Mark::Pin { .. } => theme::PIN_RADIUS,
            Mark::Cluster { close: true, .. } => theme::CLOSE_CLUSTER_RADIUS,
            Mark::Cluster { close: false, .. } => theme::CLUSTER_RADIUS,
        }
    }
}

/// Render the marker canvas (central panel).
pub fn show_map(layers: &MarkerLayers, view: &mut MapView, ui: &mut Ui) -> MapInteraction {
    let mut interaction = MapInteraction::default();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    view.last_size = rect.size();

    if response.dragged() {
        let delta = response.drag_delta();
        let ppd = view.pixels_per_degree as f64;
        view.center.lng -= delta.x as f64 / ppd;
        view.center.lat += delta.y as f64 / ppd;
    }
    if let Some(hover) = response.hover_pos() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            view.zoom_at((scroll * 0.003).exp(), hover, rect);
        }
    }

    painter.rect_filled(rect, 0.0, theme::BG_DARK);
    draw_graticule(&painter, view, rect);

    let marks = build_marks(layers, view, rect);
    for mark in &marks {
        draw_mark(&painter, mark);
    }

    let hovered = response
        .hover_pos()
        .and_then(|pointer| {
            marks
                .iter()
                .rev()
                .find(|m| m.pos().distance(pointer) <= m.radius() + 2.0)
        });
    if let Some(mark) = hovered {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), egui::Id::new("map-marker-tip"), |ui| match mark {
            Mark::Pin { title, category, .. } => {
                ui.strong(if title.is_empty() { "(untitled)" } else { title.as_str() });
                ui.label(category.label());
            }
            Mark::Cluster { count, category, close, .. } => {
                let kind = if *close { "at the same spot" } else { "nearby" };
                ui.label(format!("{} {}s {}", count, category.label().to_lowercase(), kind));
            }
        });
        if response.clicked() {
            match mark {
                Mark::Pin { key, .. } => interaction.selected = Some(key.clone()),
                Mark::Cluster { pos, .. } => view.zoom_at(2.0, *pos, rect),
            }
        }
    }

    interaction
}

fn build_marks(layers: &MarkerLayers, view: &MapView, rect: Rect) -> Vec<Mark> {
    let mut marks = Vec::new();
    let mut close_groups: BTreeMap<(Category, usize), Vec<Pos2>> = BTreeMap::new();
    let mut cells: BTreeMap<(Category, i64, i64), Vec<(&MarkerKey, Pos2, &str)>> = BTreeMap::new();

    for (key, placement) in layers.iter() {
        let pos = view.project(placement.coord, rect);
        match placement.layer {
            Layer::Individual => marks.push(Mark::Pin {
                key: key.clone(),
                pos,
                category: placement.category,
                title: placement.title.clone(),
            }),
            Layer::CloseCluster(category) => {
                let group = placement.close_group.unwrap_or(usize::MAX);
                close_groups.entry((category, group)).or_default().push(pos);
            }
            Layer::MainCluster(category) => {
                let cell = (
                    category,
                    (pos.x / CLUSTER_CELL_PX).floor() as i64,
                    (pos.y / CLUSTER_CELL_PX).floor() as i64,
                );
                cells.entry(cell).or_default().push((key, pos, placement.title.as_str()));
            }
        }
    }

    for ((category, _), positions) in close_groups {
        marks.push(Mark::Cluster {
            pos: centroid(&positions),
            count: positions.len(),
            category,
            close: true,
        });
    }
    for ((category, _, _), members) in cells {
        if let [(key, pos, title)] = members.as_slice() {
            marks.push(Mark::Pin {
                key: (*key).clone(),
                pos: *pos,
                category,
                title: title.to_string(),
            });
        } else {
            let positions: Vec<Pos2> = members.iter().map(|(_, pos, _)| *pos).collect();
            marks.push(Mark::Cluster {
                pos: centroid(&positions),
                count: positions.len(),
                category,
                close: false,
            });
        }
    }
    marks
}

fn centroid(positions: &[Pos2]) -> Pos2 {
    let n = positions.len().max(1) as f32;
    let sum = positions.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / n).to_pos2()
}

fn draw_mark(painter: &egui::Painter, mark: &Mark) {
    match mark {
        Mark::Pin { pos, category, .. } => {
            let color = theme::category_color(*category);
            let r = theme::PIN_RADIUS;
            let tip = *pos + Vec2::new(0.0, r * 1.8);
            painter.add(Shape::convex_polygon(
                vec![*pos + Vec2::new(-r * 0.7, r * 0.5), *pos + Vec2::new(r * 0.7, r * 0.5), tip],
                color,
                Stroke::NONE,
            ));
            painter.circle_filled(*pos, r, color);
            painter.circle_filled(*pos, r * 0.4, Color32::WHITE);
        }
        Mark::Cluster { pos, count, category, close } => {
            let color = theme::category_color(*category);
            let r = mark.radius();
            painter.circle_filled(*pos, r + 3.0, color.gamma_multiply(0.35));
            painter.circle_filled(*pos, r, color);
            if *close {
                painter.circle_stroke(*pos, r, Stroke::new(1.5, Color32::WHITE));
            }
            painter.text(*pos, Align2::CENTER_CENTER, count.to_string(), theme::font_badge(), Color32::WHITE);
        }
    }
}

fn draw_graticule(painter: &egui::Painter, view: &MapView, rect: Rect) {
    let ppd = view.pixels_per_degree as f64;
    let step = GRID_STEPS_DEG
        .iter()
        .copied()
        .find(|step| step * ppd >= 80.0)
        .unwrap_or(90.0);

    let top_left = view.unproject(rect.left_top(), rect);
    let bottom_right = view.unproject(rect.right_bottom(), rect);
    let stroke = Stroke::new(0.5, theme::GRID_LINE);

    let mut lng = (top_left.lng / step).floor() * step;
    while lng <= bottom_right.lng {
        let x = view.project(Coord::new(view.center.lat, lng), rect).x;
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        painter.text(
            Pos2::new(x + 3.0, rect.bottom() - 4.0),
            Align2::LEFT_BOTTOM,
            format!("{:.3}°", lng),
            theme::font_small(),
            theme::TEXT_DIM,
        );
        lng += step;
    }

    let mut lat = (bottom_right.lat / step).floor() * step;
    while lat <= top_left.lat {
        let y = view.project(Coord::new(lat, view.center.lng), rect).y;
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        painter.text(
            Pos2::new(rect.left() + 4.0, y - 2.0),
            Align2::LEFT_BOTTOM,
            format!("{:.3}°", lat),
            theme::font_small(),
            theme::TEXT_DIM,
        );
        lat += step;
    }
}
