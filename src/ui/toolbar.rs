use crate::app::ZigzagApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use zigzag_map::model::Category;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut ZigzagApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Points...").clicked() {
                app.open_points();
                ui.close_menu();
            }
            if ui.button("  Save Points As...").clicked() {
                app.save_points_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  CSV Format...").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            let filters = *app.controller.filters();

            let mut show_projects = filters.show_projects();
            if ui.checkbox(&mut show_projects, "Projects").changed() {
                app.set_shown(Category::Project, show_projects);
            }
            let mut show_locations = filters.show_locations();
            if ui.checkbox(&mut show_locations, "Locations").changed() {
                app.set_shown(Category::Location, show_locations);
            }
            ui.separator();
            let mut cluster = filters.cluster_toggle();
            let resp = ui
                .add_enabled(
                    filters.clustering_available(),
                    egui::Checkbox::new(&mut cluster, "Cluster markers"),
                )
                .on_disabled_hover_text("Available when a single category is shown");
            if resp.changed() {
                app.set_cluster_toggle(cluster);
            }
            ui.separator();
            if ui.button("  Fit to Points").clicked() {
                app.fit_to_points();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Range  ").font(theme::font_menu()), |ui| {
            if ui.button("  This Week").clicked() {
                app.controller.set_this_week();
                app.mark_dirty();
                ui.close_menu();
            }
            if ui.button("  One Month").clicked() {
                app.controller.set_one_period();
                app.mark_dirty();
                ui.close_menu();
            }
            if ui.button("  All Time").clicked() {
                app.controller.set_all_time();
                app.mark_dirty();
                ui.close_menu();
            }
            if ui.button("  Custom...").clicked() {
                app.open_custom_range();
                ui.close_menu();
            }
            ui.separator();
            let adjusted = app.controller.range().user_adjusted();
            if ui
                .add_enabled(adjusted, egui::Button::new("  Follow Suggested Range"))
                .on_hover_text("Let an externally suggested range replace your selection again")
                .clicked()
            {
                app.controller.reset_user_adjusted();
                app.status_message = "Range will follow suggestions".to_string();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned point set name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = if app.file_path.is_some() { "" } else { " (not saved)" };
            ui.label(
                RichText::new(format!(
                    "{} {}{}",
                    egui_phosphor::regular::MAP_TRIFOLD,
                    app.set_name,
                    source
                ))
                .size(11.0)
                .weak(),
            );
        });
    });
}
