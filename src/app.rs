use std::path::PathBuf;
use std::time::Instant;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use zigzag_map::config::ConfigPaths;
use zigzag_map::geo::{MarkerKey, MarkerLayers};
use zigzag_map::io::{FileStore, PointSet};
use zigzag_map::model::{Category, Point};
use zigzag_map::{MapController, Settings};

use crate::ui;
use crate::ui::map_view::MapView;

/// Main application state.
pub struct ZigzagApp {
    pub controller: MapController<FileStore>,
    pub layers: MarkerLayers,
    pub view: MapView,
    pub set_name: String,
    pub file_path: Option<PathBuf>,
    pub selected: Option<MarkerKey>,

    // Dialog state
    pub show_about: bool,
    pub show_csv_help: bool,
    pub show_custom_range: bool,
    pub custom_start: NaiveDate,
    pub custom_end: NaiveDate,

    // Status message
    pub status_message: String,

    /// The partition must be rebuilt before the next draw.
    dirty: bool,
}

impl ZigzagApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let paths = ConfigPaths::discover();
        let settings = Settings::load(&paths.settings);
        let store = FileStore::open(&paths.state);
        let now = chrono::Local::now().naive_local();
        log::info!("Config directory: {:?}", paths.settings.parent());

        let mut controller = MapController::new(settings, store, now);
        let sample = Self::sample_points(now);
        controller.set_points(sample.points);
        let (custom_start, custom_end) = controller.range().to_dates();

        let mut app = Self {
            controller,
            layers: MarkerLayers::new(),
            view: MapView::default(),
            set_name: sample.name,
            file_path: None,
            selected: None,
            show_about: false,
            show_csv_help: false,
            show_custom_range: false,
            custom_start,
            custom_end,
            status_message: "Ready".to_string(),
            dirty: true,
        };
        app.fit_to_points();
        app
    }

    /// A few Paris events and places for a first look.
    fn sample_points(now: NaiveDateTime) -> PointSet {
        let day = |offset: i64, hour: u32| {
            (now.date() + Duration::days(offset)).and_hms_opt(hour, 0, 0)
        };
        PointSet::new(
            "Sample",
            vec![
                Point::project("concert", 48.8566, 2.3522)
                    .with_title("Open-air concert")
                    .with_dates(day(0, 20), day(0, 23)),
                Point::project("market", 48.8566, 2.3523)
                    .with_title("Night market")
                    .with_dates(day(2, 18), day(4, 23)),
                Point::project("expo", 48.8606, 2.3376)
                    .with_title("Photo exhibition")
                    .with_dates(day(5, 10), day(40, 18)),
                Point::project("lyon", 45.7640, 4.8357)
                    .with_title("Lyon food festival")
                    .with_dates(day(12, 11), day(14, 22)),
                Point::project("marseille", 43.2965, 5.3698)
                    .with_title("Harbour regatta")
                    .with_dates(day(90, 9), day(90, 17)),
                Point::location("home", 48.8570, 2.3530).with_title("Home"),
                Point::location("office", 48.8738, 2.2950).with_title("Office"),
                Point::location("friend", 45.7600, 4.8400).with_title("Camille's place"),
            ],
        )
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuild the partition and update the marker layers.
    fn refresh(&mut self) {
        let partition = self.controller.partition();
        let diff = self.layers.reconcile(&partition);
        if let Some(key) = &self.selected {
            if diff.removed.contains(key) {
                self.selected = None;
            }
        }
        self.dirty = false;
    }

    // --- File operations ---

    pub fn open_points(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Point File", &["json"])
            .pick_file()
        {
            match zigzag_map::io::load_points(&path) {
                Ok(set) => {
                    let count = set.points.len();
                    self.load_set(set);
                    self.file_path = Some(path);
                    self.status_message = format!("Loaded {} points", count);
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_points_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Point File", &["json"])
            .set_file_name(format!("{}.json", self.set_name))
            .save_file()
        {
            let set = PointSet::new(self.set_name.clone(), self.controller.points().to_vec());
            match zigzag_map::io::save_points(&set, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.status_message = "Points saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match zigzag_map::io::import_csv(&path) {
                Ok((points, skipped)) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("Imported")
                        .to_string();
                    let count = points.len();
                    self.load_set(PointSet::new(name, points));
                    self.file_path = None;

                    if skipped > 0 {
                        self.status_message = format!("Imported {} points ({} rows skipped)", count, skipped);
                    } else {
                        self.status_message = format!("Imported {} points", count);
                    }
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    fn load_set(&mut self, set: PointSet) {
        self.set_name = set.name;
        self.controller.set_points(set.points);
        if let Some(range) = set.range {
            if !self.controller.apply_external_hint(range.start, range.end) {
                log::info!("Keeping the manually selected range over the file's suggestion");
            }
        }
        self.selected = None;
        self.layers.clear();
        self.fit_to_points();
        self.mark_dirty();
    }

    // --- Filters and range ---

    pub fn set_shown(&mut self, category: Category, show: bool) {
        self.controller.set_shown(category, show);
        self.mark_dirty();
    }

    pub fn set_cluster_toggle(&mut self, on: bool) {
        if !self.controller.set_cluster_toggle(on) && on {
            self.status_message = "Clustering needs a single category".to_string();
        }
        self.mark_dirty();
    }

    pub fn open_custom_range(&mut self) {
        let (start, end) = self.controller.range().to_dates();
        self.custom_start = start;
        self.custom_end = end;
        self.show_custom_range = true;
    }

    pub fn apply_custom_range(&mut self) {
        self.controller.set_dates(self.custom_start, self.custom_end);
        let (start, end) = self.controller.range().to_dates();
        self.status_message = format!("Range {} → {}", start.format("%d %b %Y"), end.format("%d %b %Y"));
        self.mark_dirty();
    }

    pub fn fit_to_points(&mut self) {
        self.view.fit(self.controller.points().iter().filter(|p| p.has_valid_coordinates()).map(Point::coord));
    }

    fn selected_title(&self) -> Option<String> {
        let key = self.selected.as_ref()?;
        let placement = self.layers.get(key)?;
        let point = self
            .controller
            .points()
            .iter()
            .find(|p| p.id == key.id && p.category == key.category)?;
        let when = match (point.start_date, point.end_date) {
            (Some(start), Some(end)) if start.date() != end.date() => {
                format!(" · {} → {}", start.format("%d %b"), end.format("%d %b %Y"))
            }
            (Some(at), _) | (None, Some(at)) => format!(" · {}", at.format("%d %b %Y %H:%M")),
            (None, None) => String::new(),
        };
        Some(format!("{} ({}){}", placement.title, placement.category.label(), when))
    }
}

impl eframe::App for ZigzagApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if self.controller.tick(Instant::now()) {
            self.mark_dirty();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        let partition_len = self.layers.len();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_DARK)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Shown: {} of {}",
                                partition_len,
                                self.controller.points().len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                        if self.controller.range().user_adjusted() {
                            ui.label(egui::RichText::new(" · range set by you").size(10.5).color(ui::theme::TEXT_DIM));
                        }
                    });
                });
            });

        // Bottom panel: timeline
        egui::TopBottomPanel::bottom("timeline")
            .exact_height(ui::theme::TIMELINE_HEIGHT + 8.0)
            .show(ctx, |ui| {
                let interaction = ui::timeline_bar::show_timeline_bar(&mut self.controller, ui);
                if interaction.changed {
                    self.dirty = true;
                }
                if interaction.open_custom_range {
                    self.open_custom_range();
                }
            });

        if self.dirty {
            self.refresh();
        }

        // Central panel: map
        let map_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(map_frame).show(ctx, |ui| {
            let interaction = ui::map_view::show_map(&self.layers, &mut self.view, ui);
            if let Some(key) = interaction.selected {
                self.selected = Some(key);
                if let Some(title) = self.selected_title() {
                    self.status_message = title;
                }
            }
        });

        // Pending throttled interval during a drag
        if self.controller.is_dragging() {
            ctx.request_repaint_after(self.controller.settings().throttle());
        }

        // Dialogs
        if self.show_custom_range {
            ui::dialogs::show_custom_range_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
    }
}
